//! Statistics: monthly totals, consumption, distance, per-vehicle spending.

use anyhow::Result;
use serde_json::json;

use carnet_store::{
    AppState, distance_driven, monthly_totals, spending_by_vehicle, vehicle_consumption,
};

use crate::commands::resolve_vehicle;
use crate::format::{format_money, print_json, print_table};

pub async fn run(state: &AppState, vehicle: Option<String>, json: bool) -> Result<()> {
    state.refresh_vehicles().await?;
    state.refresh_fuel_purchases().await?;
    state.refresh_electric_charges().await?;

    let mut vehicles = state.vehicles().await;
    let mut purchases = state.fuel_purchases().await;
    let mut charges = state.electric_charges().await;

    if let Some(needle) = vehicle {
        let selected = resolve_vehicle(state, &needle).await?;
        purchases.retain(|p| p.vehicle_id == selected.id);
        charges.retain(|c| c.vehicle_id == selected.id);
        vehicles.retain(|v| v.id == selected.id);
    }

    let totals = monthly_totals(&purchases, &charges);
    let spending = spending_by_vehicle(&purchases, &charges);
    let distance = distance_driven(&purchases);

    if json {
        let consumption: Vec<_> = vehicles
            .iter()
            .map(|v| {
                json!({
                    "vehicle_id": v.id,
                    "name": v.name,
                    "consumption_l_per_100km": vehicle_consumption(v, &purchases),
                })
            })
            .collect();
        return print_json(&json!({
            "monthly_totals": totals,
            "spending_by_vehicle": spending,
            "distance_driven_km": distance,
            "consumption": consumption,
        }));
    }

    if totals.is_empty() {
        println!("Not enough data to compute statistics.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|t| {
            vec![
                t.month.clone(),
                format_money(t.fuel),
                format_money(t.electric),
                format_money(t.total),
            ]
        })
        .collect();
    print_table(&["Month", "Fuel", "Electric", "Total"], &rows);
    println!();

    let vehicle_rows: Vec<Vec<String>> = vehicles
        .iter()
        .map(|v| {
            let summary = spending.get(&v.id).cloned().unwrap_or_default();
            let consumption = vehicle_consumption(v, &purchases);
            vec![
                v.name.clone(),
                format!("{}", summary.fill_ups),
                format!("{}", summary.charge_sessions),
                format_money(summary.total()),
                if consumption > 0.0 {
                    format!("{consumption:.1} L/100km")
                } else {
                    "-".to_string()
                },
            ]
        })
        .collect();
    if !vehicle_rows.is_empty() {
        print_table(
            &["Vehicle", "Fill-ups", "Charges", "Total spent", "Consumption"],
            &vehicle_rows,
        );
        println!();
    }

    if distance > 0.0 {
        println!("Estimated distance driven: {distance:.0} km");
    }

    Ok(())
}
