//! Vehicle subcommands.

use anyhow::Result;
use serde_json::json;

use carnet_store::AppState;
use carnet_types::Vehicle;

use crate::cli::VehicleAction;
use crate::format::{print_json, print_table};

pub async fn run(state: &AppState, action: VehicleAction, json: bool) -> Result<()> {
    match action {
        VehicleAction::List => {
            state.refresh_vehicles().await?;
            let vehicles = state.vehicles().await;
            if json {
                return print_json(&vehicles);
            }
            if vehicles.is_empty() {
                println!("No vehicles registered.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = vehicles
                .iter()
                .map(|v| {
                    vec![
                        v.id.clone(),
                        v.name.clone(),
                        format!("{} {} ({})", v.make, v.model, v.year),
                        v.license_plate.clone(),
                        v.fuel_kind.label().to_string(),
                        v.average_consumption
                            .map(|c| format!("{c:.1} L/100km"))
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            print_table(
                &["ID", "Name", "Model", "Plate", "Fuel", "Avg. consumption"],
                &rows,
            );
        }

        VehicleAction::Add {
            name,
            make,
            model,
            year,
            plate,
            fuel,
            consumption,
            tank,
            notes,
        } => {
            let vehicle = Vehicle {
                id: String::new(),
                name,
                make,
                model,
                year,
                license_plate: plate,
                fuel_kind: fuel.into(),
                average_consumption: consumption,
                tank_capacity: tank,
                notes,
            };
            let created = state.add_vehicle(vehicle).await?;
            if json {
                return print_json(&created);
            }
            println!("Registered vehicle '{}' ({})", created.name, created.id);
        }

        VehicleAction::Update {
            id,
            name,
            make,
            model,
            year,
            plate,
            fuel,
            consumption,
            tank,
            notes,
        } => {
            let mut patch = serde_json::Map::new();
            if let Some(name) = name {
                patch.insert("name".into(), json!(name));
            }
            if let Some(make) = make {
                patch.insert("make".into(), json!(make));
            }
            if let Some(model) = model {
                patch.insert("model".into(), json!(model));
            }
            if let Some(year) = year {
                patch.insert("year".into(), json!(year));
            }
            if let Some(plate) = plate {
                patch.insert("license_plate".into(), json!(plate));
            }
            if let Some(fuel) = fuel {
                patch.insert("fuel_kind".into(), json!(carnet_types::FuelKind::from(fuel)));
            }
            if let Some(consumption) = consumption {
                patch.insert("average_consumption".into(), json!(consumption));
            }
            if let Some(tank) = tank {
                patch.insert("tank_capacity".into(), json!(tank));
            }
            if let Some(notes) = notes {
                patch.insert("notes".into(), json!(notes));
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update");
            }

            state.refresh_vehicles().await?;
            let updated = state.update_vehicle(&id, patch.into()).await?;
            if json {
                return print_json(&updated);
            }
            println!("Updated vehicle '{}' ({})", updated.name, updated.id);
        }

        VehicleAction::Remove { id } => {
            state.refresh_vehicles().await?;
            state.refresh_fuel_purchases().await?;
            state.refresh_electric_charges().await?;
            state.remove_vehicle(&id).await?;
            if !json {
                println!("Deleted vehicle {id}");
            }
        }
    }
    Ok(())
}
