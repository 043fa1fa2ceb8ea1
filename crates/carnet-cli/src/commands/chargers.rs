//! Charging-station subcommands.

use anyhow::Result;
use serde_json::json;

use carnet_store::AppState;
use carnet_types::{ChargingStation, GeoPoint};

use crate::cli::ChargerAction;
use crate::format::{or_dash, print_json, print_table};

pub async fn run(state: &AppState, action: ChargerAction, json: bool) -> Result<()> {
    match action {
        ChargerAction::List { all } => {
            state.refresh_charging_stations().await?;
            let mut stations = state.charging_stations().await;
            if !all {
                stations.retain(|s| s.active);
            }
            if json {
                return print_json(&stations);
            }
            if stations.is_empty() {
                println!("No favorite charging stations.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = stations
                .iter()
                .map(|s| {
                    vec![
                        s.id.clone(),
                        s.name.clone(),
                        s.address.clone(),
                        or_dash(s.operator.as_deref()),
                        s.max_power_kw
                            .map(|p| format!("{p:.0} kW"))
                            .unwrap_or_else(|| "-".to_string()),
                        if s.fast_charging { "fast" } else { "-" }.to_string(),
                        if s.active { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(
                &["ID", "Name", "Address", "Operator", "Power", "Fast", "Active"],
                &rows,
            );
        }

        ChargerAction::Add {
            name,
            address,
            city,
            postal_code,
            operator,
            connectors,
            max_power,
            price,
            chargers,
            fast,
            lat,
            lng,
            notes,
        } => {
            let location = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
                _ => None,
            };
            let station = ChargingStation {
                id: String::new(),
                name,
                address,
                city: city.unwrap_or_default(),
                postal_code: postal_code.unwrap_or_default(),
                operator,
                connectors: connectors.into_iter().map(Into::into).collect(),
                max_power_kw: max_power,
                price_per_kwh: price,
                charger_count: chargers,
                fast_charging: fast,
                active: true,
                location,
                notes,
            };
            let created = state.add_charging_station(station).await?;
            if json {
                return print_json(&created);
            }
            println!("Saved charging station '{}' ({})", created.name, created.id);
        }

        ChargerAction::Update {
            id,
            name,
            address,
            operator,
            max_power,
            price,
            active,
            notes,
        } => {
            let mut patch = serde_json::Map::new();
            if let Some(name) = name {
                patch.insert("name".into(), json!(name));
            }
            if let Some(address) = address {
                patch.insert("address".into(), json!(address));
            }
            if let Some(operator) = operator {
                patch.insert("operator".into(), json!(operator));
            }
            if let Some(max_power) = max_power {
                patch.insert("max_power_kw".into(), json!(max_power));
            }
            if let Some(price) = price {
                patch.insert("price_per_kwh".into(), json!(price));
            }
            if let Some(active) = active {
                patch.insert("active".into(), json!(active));
            }
            if let Some(notes) = notes {
                patch.insert("notes".into(), json!(notes));
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update");
            }

            state.refresh_charging_stations().await?;
            let updated = state.update_charging_station(&id, patch.into()).await?;
            if json {
                return print_json(&updated);
            }
            println!("Updated charging station '{}' ({})", updated.name, updated.id);
        }

        ChargerAction::Remove { id } => {
            state.refresh_charging_stations().await?;
            state.remove_charging_station(&id).await?;
            if !json {
                println!("Deleted charging station {id}");
            }
        }
    }
    Ok(())
}
