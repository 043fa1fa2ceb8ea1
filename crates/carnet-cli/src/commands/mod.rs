//! Command implementations, one module per subcommand group.

pub mod charges;
pub mod chargers;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod purchases;
pub mod stations;
pub mod stats;
pub mod stores;
pub mod vehicles;

use anyhow::{Context, Result, bail};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, format_description};

use carnet_store::AppState;
use carnet_types::Vehicle;
use carnet_types::validate::{total_from_quantity, unit_price_from_total};

/// Parse a date argument: RFC3339, or a bare `YYYY-MM-DD` taken as midnight
/// UTC. `None` means now.
pub fn parse_date(input: Option<&str>) -> Result<OffsetDateTime> {
    let Some(input) = input else {
        return Ok(OffsetDateTime::now_utc());
    };

    if let Ok(date) = OffsetDateTime::parse(input, &Rfc3339) {
        return Ok(date);
    }

    let day_format = format_description::parse("[year]-[month]-[day]")?;
    let date = Date::parse(input, &day_format)
        .with_context(|| format!("'{input}' is not an RFC3339 or YYYY-MM-DD date"))?;
    Ok(date.midnight().assume_utc())
}

/// Resolve a vehicle by identifier or by exact name.
pub async fn resolve_vehicle(state: &AppState, needle: &str) -> Result<Vehicle> {
    let vehicles = state.vehicles().await;
    vehicles
        .into_iter()
        .find(|v| v.id == needle || v.name == needle)
        .with_context(|| format!("no vehicle matching '{needle}'"))
}

/// Resolve the unit-price/total pair: either may be given, the other is
/// derived; giving both keeps both as entered.
pub fn resolve_prices(
    quantity: f64,
    unit_price: Option<f64>,
    total: Option<f64>,
) -> Result<(f64, f64)> {
    match (unit_price, total) {
        (Some(unit), Some(total)) => Ok((unit, total)),
        (Some(unit), None) => Ok((unit, total_from_quantity(quantity, unit))),
        (None, Some(total)) => Ok((unit_price_from_total(total, quantity), total)),
        (None, None) => bail!("either --price or --total is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn bare_date_is_midnight_utc() {
        let parsed = parse_date(Some("2024-03-15")).unwrap();
        assert_eq!(parsed, datetime!(2024-03-15 00:00 UTC));
    }

    #[test]
    fn rfc3339_is_accepted() {
        let parsed = parse_date(Some("2024-03-15T10:30:00Z")).unwrap();
        assert_eq!(parsed, datetime!(2024-03-15 10:30 UTC));
    }

    #[test]
    fn garbage_dates_are_refused() {
        assert!(parse_date(Some("15/03/2024")).is_err());
    }

    #[test]
    fn prices_derive_in_both_directions() {
        // 40 L at 1.859/L
        assert_eq!(resolve_prices(40.0, Some(1.859), None).unwrap(), (1.859, 74.36));
        assert_eq!(resolve_prices(40.0, None, Some(74.36)).unwrap(), (1.859, 74.36));
        assert!(resolve_prices(40.0, None, None).is_err());
    }
}
