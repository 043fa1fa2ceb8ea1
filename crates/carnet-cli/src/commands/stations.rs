//! Gas-station subcommands, including nearby search and discovery.

use anyhow::{Context, Result};
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use carnet_remote::PlacesClient;
use carnet_store::{AppState, stations_within};
use carnet_types::{GasStation, GeoPoint};

use crate::cli::StationAction;
use crate::config::Config;
use crate::format::{or_dash, print_json, print_table};

pub async fn run(
    state: &AppState,
    config: &Config,
    action: StationAction,
    json: bool,
) -> Result<()> {
    match action {
        StationAction::List => {
            state.refresh_gas_stations().await?;
            let stations = state.gas_stations().await;
            if json {
                return print_json(&stations);
            }
            if stations.is_empty() {
                println!("No favorite gas stations.");
                return Ok(());
            }
            print_table(
                &["ID", "Name", "Address", "Brand", "Prices"],
                &station_rows(&stations),
            );
        }

        StationAction::Add {
            name,
            address,
            lat,
            lng,
            brand,
            notes,
        } => {
            let station = GasStation {
                id: String::new(),
                name,
                address,
                location: GeoPoint::new(lat.unwrap_or(0.0), lng.unwrap_or(0.0)),
                brand,
                fuel_prices: Default::default(),
                last_updated: OffsetDateTime::now_utc(),
                notes,
            };
            let created = state.add_gas_station(station).await?;
            if json {
                return print_json(&created);
            }
            println!("Saved station '{}' ({})", created.name, created.id);
        }

        StationAction::Update {
            id,
            name,
            address,
            lat,
            lng,
            brand,
            fuel,
            price,
            notes,
        } => {
            state.refresh_gas_stations().await?;

            let mut patch = serde_json::Map::new();
            if let Some(name) = name {
                patch.insert("name".into(), json!(name));
            }
            if let Some(address) = address {
                patch.insert("address".into(), json!(address));
            }
            if lat.is_some() || lng.is_some() {
                let current = state
                    .gas_stations()
                    .await
                    .into_iter()
                    .find(|s| s.id == id)
                    .with_context(|| format!("no station '{id}'"))?;
                let location = GeoPoint::new(
                    lat.unwrap_or(current.location.lat),
                    lng.unwrap_or(current.location.lng),
                );
                patch.insert("location".into(), json!(location));
            }
            if let Some(brand) = brand {
                patch.insert("brand".into(), json!(brand));
            }
            if let (Some(fuel), Some(price)) = (fuel, price) {
                // Price observations replace the whole map entry-wise; the
                // store merges top-level fields only.
                let current = state
                    .gas_stations()
                    .await
                    .into_iter()
                    .find(|s| s.id == id)
                    .with_context(|| format!("no station '{id}'"))?;
                let mut prices = current.fuel_prices;
                prices.insert(fuel.into(), price);
                patch.insert("fuel_prices".into(), json!(prices));
                patch.insert(
                    "last_updated".into(),
                    json!(OffsetDateTime::now_utc().format(&Rfc3339)?),
                );
            }
            if let Some(notes) = notes {
                patch.insert("notes".into(), json!(notes));
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update");
            }

            let updated = state.update_gas_station(&id, patch.into()).await?;
            if json {
                return print_json(&updated);
            }
            println!("Updated station '{}' ({})", updated.name, updated.id);
        }

        StationAction::Remove { id } => {
            state.refresh_gas_stations().await?;
            state.refresh_stores().await?;
            state.remove_gas_station(&id).await?;
            if !json {
                println!("Deleted station {id}");
            }
        }

        StationAction::Nearby { lat, lng, radius } => {
            state.refresh_gas_stations().await?;
            let stations = state.gas_stations().await;
            let center = GeoPoint::new(lat, lng);
            let hits = stations_within(&stations, center, radius);

            if json {
                let payload: Vec<_> = hits
                    .iter()
                    .map(|(distance, station)| {
                        json!({"distance_km": distance, "station": station})
                    })
                    .collect();
                return print_json(&payload);
            }
            if hits.is_empty() {
                println!("No favorite stations within {radius} km.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = hits
                .iter()
                .map(|(distance, s)| {
                    vec![
                        format!("{distance:.1} km"),
                        s.name.clone(),
                        s.address.clone(),
                        or_dash(s.brand.as_deref()),
                    ]
                })
                .collect();
            print_table(&["Distance", "Name", "Address", "Brand"], &rows);
        }

        StationAction::Discover {
            lat,
            lng,
            radius,
            query,
            save,
        } => {
            let places_url = config
                .places_url
                .as_deref()
                .context("no places-url configured; set it with `carnet config set places-url <url>`")?;
            let places = PlacesClient::new(places_url)?;
            let center = GeoPoint::new(lat, lng);
            let results = places
                .search_stations(query.as_deref(), center, radius)
                .await?;

            if results.is_empty() {
                if !json {
                    println!("No stations found within {radius} km.");
                }
                return Ok(());
            }

            if save {
                for result in &results {
                    state.add_gas_station(result.clone().into_station()).await?;
                }
                if !json {
                    println!("Saved {} stations as favorites.", results.len());
                }
            }

            if json {
                return print_json(&results.iter().map(|r| json!({
                    "name": r.name,
                    "address": r.address,
                    "location": r.location,
                })).collect::<Vec<_>>());
            }
            let rows: Vec<Vec<String>> = results
                .iter()
                .map(|r| {
                    vec![
                        r.name.clone(),
                        r.address.clone(),
                        format!("{:.4}, {:.4}", r.location.lat, r.location.lng),
                    ]
                })
                .collect();
            print_table(&["Name", "Address", "Location"], &rows);
        }
    }
    Ok(())
}

fn station_rows(stations: &[GasStation]) -> Vec<Vec<String>> {
    stations
        .iter()
        .map(|s| {
            let prices = if s.fuel_prices.is_empty() {
                "-".to_string()
            } else {
                s.fuel_prices
                    .iter()
                    .map(|(kind, price)| format!("{} {price:.3}", kind.label()))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            vec![
                s.id.clone(),
                s.name.clone(),
                s.address.clone(),
                or_dash(s.brand.as_deref()),
                prices,
            ]
        })
        .collect()
}
