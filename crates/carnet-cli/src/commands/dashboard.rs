//! Dashboard summary: cache counts, recent activity, monthly spending.

use anyhow::Result;
use serde_json::json;

use carnet_store::{AppState, monthly_totals, spending_by_vehicle};

use crate::format::{format_date, format_money, print_json, print_table};

pub async fn run(state: &AppState, json: bool) -> Result<()> {
    state.refresh_all().await?;

    let vehicles = state.vehicles().await;
    let purchases = state.fuel_purchases().await;
    let charges = state.electric_charges().await;
    let totals = monthly_totals(&purchases, &charges);
    let spending = spending_by_vehicle(&purchases, &charges);

    if json {
        return print_json(&json!({
            "vehicles": vehicles.len(),
            "fuel_purchases": purchases.len(),
            "electric_charges": charges.len(),
            "gas_stations": state.gas_stations().await.len(),
            "charging_stations": state.charging_stations().await.len(),
            "stores": state.stores().await.len(),
            "monthly_totals": totals,
            "spending_by_vehicle": spending,
        }));
    }

    println!(
        "{} vehicles, {} fuel purchases, {} charging sessions",
        vehicles.len(),
        purchases.len(),
        charges.len()
    );
    println!();

    if !vehicles.is_empty() {
        let rows: Vec<Vec<String>> = vehicles
            .iter()
            .map(|v| {
                let summary = spending.get(&v.id).cloned().unwrap_or_default();
                vec![
                    v.name.clone(),
                    format!("{} {}", v.make, v.model),
                    format!("{}", summary.fill_ups + summary.charge_sessions),
                    format_money(summary.total()),
                ]
            })
            .collect();
        print_table(&["Vehicle", "Model", "Entries", "Total spent"], &rows);
        println!();
    }

    // Purchases are cached most recent first.
    if !purchases.is_empty() {
        println!("Recent purchases:");
        for purchase in purchases.iter().take(5) {
            println!(
                "  {}  {:>8}  {:.2} L at '{}'",
                format_date(purchase.date),
                format_money(purchase.total_price),
                purchase.quantity,
                purchase.station
            );
        }
        println!();
    }

    if let Some(current) = totals.last() {
        println!(
            "This month ({}): {} fuel, {} electric, {} total",
            current.month,
            format_money(current.fuel),
            format_money(current.electric),
            format_money(current.total)
        );
    }

    Ok(())
}
