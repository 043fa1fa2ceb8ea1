//! Store subcommands.

use anyhow::Result;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use carnet_store::AppState;
use carnet_types::Store;

use crate::cli::StoreAction;
use crate::format::{or_dash, print_json, print_table};

pub async fn run(state: &AppState, action: StoreAction, json: bool) -> Result<()> {
    match action {
        StoreAction::List => {
            state.refresh_stores().await?;
            let stores = state.stores().await;
            if json {
                return print_json(&stores);
            }
            if stores.is_empty() {
                println!("No favorite stores.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = stores
                .iter()
                .map(|s| {
                    vec![
                        s.id.clone(),
                        s.name.clone(),
                        s.address.clone(),
                        or_dash(s.chain.as_deref()),
                        if s.has_gas_station {
                            or_dash(s.gas_station_id.as_deref())
                        } else {
                            "-".to_string()
                        },
                    ]
                })
                .collect();
            print_table(&["ID", "Name", "Address", "Chain", "Gas station"], &rows);
        }

        StoreAction::Add {
            name,
            address,
            chain,
            gas_station,
            hours,
            notes,
        } => {
            let now = OffsetDateTime::now_utc();
            let store = Store {
                id: String::new(),
                name,
                address,
                chain,
                has_gas_station: gas_station.is_some(),
                gas_station_id: gas_station,
                opening_hours: hours,
                notes,
                created_at: now,
                updated_at: now,
            };
            let created = state.add_store(store).await?;
            if json {
                return print_json(&created);
            }
            println!("Saved store '{}' ({})", created.name, created.id);
        }

        StoreAction::Update {
            id,
            name,
            address,
            chain,
            gas_station,
            hours,
            notes,
        } => {
            let mut patch = serde_json::Map::new();
            if let Some(name) = name {
                patch.insert("name".into(), json!(name));
            }
            if let Some(address) = address {
                patch.insert("address".into(), json!(address));
            }
            if let Some(chain) = chain {
                patch.insert("chain".into(), json!(chain));
            }
            if let Some(gas_station) = gas_station {
                patch.insert("has_gas_station".into(), json!(true));
                patch.insert("gas_station_id".into(), json!(gas_station));
            }
            if let Some(hours) = hours {
                patch.insert("opening_hours".into(), json!(hours));
            }
            if let Some(notes) = notes {
                patch.insert("notes".into(), json!(notes));
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update");
            }
            patch.insert(
                "updated_at".into(),
                json!(OffsetDateTime::now_utc().format(&Rfc3339)?),
            );

            state.refresh_stores().await?;
            let updated = state.update_store(&id, patch.into()).await?;
            if json {
                return print_json(&updated);
            }
            println!("Updated store '{}' ({})", updated.name, updated.id);
        }

        StoreAction::Remove { id } => {
            state.refresh_stores().await?;
            state.remove_store(&id).await?;
            if !json {
                println!("Deleted store {id}");
            }
        }
    }
    Ok(())
}
