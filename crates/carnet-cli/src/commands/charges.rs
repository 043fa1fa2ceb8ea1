//! Charging-session subcommands.

use anyhow::Result;
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use carnet_store::AppState;
use carnet_types::ElectricCharge;

use crate::cli::ChargeAction;
use crate::commands::{parse_date, resolve_prices, resolve_vehicle};
use crate::format::{format_date, format_money, print_json, print_table};

pub async fn run(state: &AppState, action: ChargeAction, json: bool) -> Result<()> {
    match action {
        ChargeAction::List { vehicle } => {
            state.refresh_vehicles().await?;
            state.refresh_electric_charges().await?;

            let mut charges = state.electric_charges().await;
            if let Some(needle) = vehicle {
                let vehicle = resolve_vehicle(state, &needle).await?;
                charges.retain(|c| c.vehicle_id == vehicle.id);
            }
            if json {
                return print_json(&charges);
            }
            if charges.is_empty() {
                println!("No charging sessions recorded.");
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

            let rows: Vec<Vec<String>> = charges
                .iter()
                .map(|c| {
                    vec![
                        c.id.clone(),
                        format_date(c.date),
                        vehicle_name(&c.vehicle_id),
                        c.station.clone(),
                        format!("{:.2} kWh", c.energy_kwh),
                        format!("{:.3} €/kWh", c.price_per_kwh),
                        format_money(c.total_price),
                    ]
                })
                .collect();
            print_table(
                &["ID", "Date", "Vehicle", "Station", "Energy", "Unit price", "Total"],
                &rows,
            );
        }

        ChargeAction::Add {
            vehicle,
            date,
            energy,
            price,
            total,
            station,
            mileage,
            power,
            duration,
            battery_start,
            battery_end,
            payment,
            notes,
        } => {
            state.refresh_vehicles().await?;
            let vehicle = resolve_vehicle(state, &vehicle).await?;
            let (price_per_kwh, total_price) = resolve_prices(energy, price, total)?;

            let charge = ElectricCharge {
                id: String::new(),
                date: parse_date(date.as_deref())?,
                vehicle_id: vehicle.id,
                station,
                energy_kwh: energy,
                price_per_kwh,
                total_price,
                mileage: mileage.unwrap_or(0.0),
                power_kw: power,
                duration_min: duration,
                battery_start_pct: battery_start,
                battery_end_pct: battery_end,
                meter_start_kwh: None,
                meter_end_kwh: None,
                payment: payment.into(),
                notes,
            };
            let created = state.add_electric_charge(charge).await?;
            if json {
                return print_json(&created);
            }
            println!(
                "Logged charge of {:.2} kWh at '{}' for {} ({})",
                created.energy_kwh,
                created.station,
                format_money(created.total_price),
                created.id
            );
        }

        ChargeAction::Update {
            id,
            date,
            energy,
            price,
            total,
            station,
            mileage,
            power,
            duration,
            battery_start,
            battery_end,
            payment,
            notes,
        } => {
            let mut patch = serde_json::Map::new();
            if let Some(date) = date {
                let parsed = parse_date(Some(&date))?;
                patch.insert("date".into(), json!(parsed.format(&Rfc3339)?));
            }
            if let Some(energy) = energy {
                patch.insert("energy_kwh".into(), json!(energy));
            }
            if let Some(price) = price {
                patch.insert("price_per_kwh".into(), json!(price));
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
            if let Some(power) = power {
                patch.insert("power_kw".into(), json!(power));
            }
            if let Some(duration) = duration {
                patch.insert("duration_min".into(), json!(duration));
            }
            if let Some(pct) = battery_start {
                patch.insert("battery_start_pct".into(), json!(pct));
            }
            if let Some(pct) = battery_end {
                patch.insert("battery_end_pct".into(), json!(pct));
            }
            if let Some(payment) = payment {
                let method: carnet_types::PaymentMethod = payment.into();
                patch.insert("payment".into(), json!(method));
            }
            if let Some(notes) = notes {
                patch.insert("notes".into(), json!(notes));
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update");
            }

            state.refresh_electric_charges().await?;
            let updated = state.update_electric_charge(&id, patch.into()).await?;
            if json {
                return print_json(&updated);
            }
            println!("Updated charge {}", updated.id);
        }

        ChargeAction::Remove { id } => {
            state.refresh_electric_charges().await?;
            state.remove_electric_charge(&id).await?;
            if !json {
                println!("Deleted charge {id}");
            }
        }
    }
    Ok(())
}
