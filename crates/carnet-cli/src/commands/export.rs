//! CSV export command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use time::OffsetDateTime;

use carnet_store::{AppState, export_csv, export_filename};

pub async fn run(state: &AppState, output: Option<PathBuf>, quiet: bool) -> Result<()> {
    state.refresh_vehicles().await?;
    state.refresh_fuel_purchases().await?;
    state.refresh_electric_charges().await?;

    let vehicles = state.vehicles().await;
    let purchases = state.fuel_purchases().await;
    let charges = state.electric_charges().await;

    let csv = export_csv(&vehicles, &purchases, &charges)?;
    let path = output
        .unwrap_or_else(|| PathBuf::from(export_filename(OffsetDateTime::now_utc().date())));

    fs::write(&path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    if !quiet {
        println!(
            "Exported {} records to {}",
            purchases.len() + charges.len(),
            path.display()
        );
    }
    Ok(())
}
