//! Fuel-purchase subcommands.

use anyhow::Result;
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use carnet_store::AppState;
use carnet_types::{FuelPurchase, PurchaseLocation};

use crate::cli::PurchaseAction;
use crate::commands::{parse_date, resolve_prices, resolve_vehicle};
use crate::format::{format_date, format_money, print_json, print_table};

pub async fn run(state: &AppState, action: PurchaseAction, json: bool) -> Result<()> {
    match action {
        PurchaseAction::List { vehicle } => {
            state.refresh_vehicles().await?;
            state.refresh_fuel_purchases().await?;

            let mut purchases = state.fuel_purchases().await;
            if let Some(needle) = vehicle {
                let vehicle = resolve_vehicle(state, &needle).await?;
                purchases.retain(|p| p.vehicle_id == vehicle.id);
            }
            if json {
                return print_json(&purchases);
            }
            if purchases.is_empty() {
                println!("No fuel purchases recorded.");
                return Ok(());
            }

            let vehicles = state.vehicles().await;
            let vehicle_name = |id: &str| {
                vehicles
                    .iter()
                    .find(|v| v.id == id)
                    .map(|v| v.name.clone())
                    .unwrap_or_else(|| id.to_string())
            };

            let rows: Vec<Vec<String>> = purchases
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        format_date(p.date),
                        vehicle_name(&p.vehicle_id),
                        p.station.clone(),
                        format!("{:.2} L", p.quantity),
                        format!("{:.3} €/L", p.price_per_liter),
                        format_money(p.total_price),
                    ]
                })
                .collect();
            print_table(
                &["ID", "Date", "Vehicle", "Station", "Quantity", "Unit price", "Total"],
                &rows,
            );
        }

        PurchaseAction::Add {
            vehicle,
            date,
            quantity,
            price,
            total,
            station,
            mileage,
            fuel,
            payment,
            notes,
        } => {
            state.refresh_vehicles().await?;
            let vehicle = resolve_vehicle(state, &vehicle).await?;
            let (price_per_liter, total_price) = resolve_prices(quantity, price, total)?;

            let purchase = FuelPurchase {
                id: String::new(),
                date: parse_date(date.as_deref())?,
                quantity,
                price_per_liter,
                total_price,
                station,
                location: PurchaseLocation::default(),
                vehicle_id: vehicle.id,
                payment: payment.into(),
                mileage: mileage.unwrap_or(0.0),
                fuel_kind: fuel.into(),
                notes,
            };
            let created = state.add_fuel_purchase(purchase).await?;
            if json {
                return print_json(&created);
            }
            println!(
                "Logged purchase of {:.2} L at '{}' for {} ({})",
                created.quantity,
                created.station,
                format_money(created.total_price),
                created.id
            );
        }

        PurchaseAction::Update {
            id,
            date,
            quantity,
            price,
            total,
            station,
            mileage,
            fuel,
            payment,
            notes,
        } => {
            let mut patch = serde_json::Map::new();
            if let Some(date) = date {
                let parsed = parse_date(Some(&date))?;
                patch.insert("date".into(), json!(parsed.format(&Rfc3339)?));
            }
            if let Some(quantity) = quantity {
                patch.insert("quantity".into(), json!(quantity));
            }
            if let Some(price) = price {
                patch.insert("price_per_liter".into(), json!(price));
            }
            if let Some(total) = total {
                patch.insert("total_price".into(), json!(total));
            }
            if let Some(station) = station {
                patch.insert("station".into(), json!(station));
            }
            if let Some(mileage) = mileage {
                patch.insert("mileage".into(), json!(mileage));
            }
            if let Some(fuel) = fuel {
                patch.insert("fuel_kind".into(), json!(carnet_types::FuelKind::from(fuel)));
            }
            if let Some(payment) = payment {
                patch.insert(
                    "payment".into(),
                    json!(carnet_types::PaymentMethod::from(payment)),
                );
            }
            if let Some(notes) = notes {
                patch.insert("notes".into(), json!(notes));
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update");
            }

            state.refresh_fuel_purchases().await?;
            let updated = state.update_fuel_purchase(&id, patch.into()).await?;
            if json {
                return print_json(&updated);
            }
            println!("Updated purchase {}", updated.id);
        }

        PurchaseAction::Remove { id } => {
            state.refresh_fuel_purchases().await?;
            state.remove_fuel_purchase(&id).await?;
            if !json {
                println!("Deleted purchase {id}");
            }
        }
    }
    Ok(())
}
