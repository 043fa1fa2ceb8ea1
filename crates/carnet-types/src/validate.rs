//! Form-level validation applied before any write reaches the remote store.
//!
//! Failing checks name the offending field so the presentation layer can
//! report it inline; the write action is never invoked on failure.

use thiserror::Error;
use time::OffsetDateTime;

use crate::types::{ElectricCharge, FuelPurchase, Vehicle};

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field '{field}': {message}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for validation checks.
pub type ValidationResult = Result<(), ValidationError>;

/// Round a value to the given number of decimal places.
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Total price derived from quantity and unit price, rounded to cents.
pub fn total_from_quantity(quantity: f64, price_per_unit: f64) -> f64 {
    round_to(quantity * price_per_unit, 2)
}

/// Unit price derived from total and quantity, rounded to three decimals.
///
/// Used by the "unlock unit price" entry mode. Returns 0 for a zero
/// quantity rather than propagating a division by zero.
pub fn unit_price_from_total(total: f64, quantity: f64) -> f64 {
    if quantity == 0.0 {
        return 0.0;
    }
    round_to(total / quantity, 3)
}

fn require(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "required"));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> ValidationResult {
    if !(value > 0.0) {
        return Err(ValidationError::new(field, "must be a positive number"));
    }
    Ok(())
}

fn not_in_future(field: &'static str, date: OffsetDateTime) -> ValidationResult {
    if date > OffsetDateTime::now_utc() {
        return Err(ValidationError::new(field, "must not be in the future"));
    }
    Ok(())
}

/// Validate a vehicle before create/update.
pub fn validate_vehicle(vehicle: &Vehicle) -> ValidationResult {
    require("name", &vehicle.name)?;
    require("make", &vehicle.make)?;
    require("model", &vehicle.model)?;
    if !(1900..=2100).contains(&vehicle.year) {
        return Err(ValidationError::new("year", "must be between 1900 and 2100"));
    }
    if let Some(consumption) = vehicle.average_consumption {
        positive("average_consumption", consumption)?;
    }
    if let Some(capacity) = vehicle.tank_capacity {
        positive("tank_capacity", capacity)?;
    }
    Ok(())
}

/// Validate a fuel purchase before create/update.
pub fn validate_purchase(purchase: &FuelPurchase) -> ValidationResult {
    require("vehicle_id", &purchase.vehicle_id)?;
    require("station", &purchase.station)?;
    positive("quantity", purchase.quantity)?;
    positive("price_per_liter", purchase.price_per_liter)?;
    positive("total_price", purchase.total_price)?;
    not_in_future("date", purchase.date)?;
    if purchase.mileage < 0.0 {
        return Err(ValidationError::new("mileage", "must not be negative"));
    }
    Ok(())
}

/// Validate a charging session before create/update.
pub fn validate_charge(charge: &ElectricCharge) -> ValidationResult {
    require("vehicle_id", &charge.vehicle_id)?;
    require("station", &charge.station)?;
    positive("energy_kwh", charge.energy_kwh)?;
    positive("price_per_kwh", charge.price_per_kwh)?;
    positive("total_price", charge.total_price)?;
    not_in_future("date", charge.date)?;
    for (field, pct) in [
        ("battery_start_pct", charge.battery_start_pct),
        ("battery_end_pct", charge.battery_end_pct),
    ] {
        if let Some(pct) = pct {
            if pct > 100 {
                return Err(ValidationError::new(field, "must be between 0 and 100"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FuelKind, PaymentMethod, PurchaseLocation};
    use time::Duration;
    use time::macros::datetime;

    fn valid_purchase() -> FuelPurchase {
        FuelPurchase {
            id: String::new(),
            date: datetime!(2024-02-10 09:00 UTC),
            quantity: 40.0,
            price_per_liter: 1.859,
            total_price: 74.36,
            station: "Carrefour".to_string(),
            location: PurchaseLocation::default(),
            vehicle_id: "v1".to_string(),
            payment: PaymentMethod::Card,
            mileage: 10_000.0,
            fuel_kind: FuelKind::Gasoline,
            notes: None,
        }
    }

    #[test]
    fn total_rounds_to_cents() {
        // 40 L at 1.859/L = 74.36
        assert_eq!(total_from_quantity(40.0, 1.859), 74.36);
        assert_eq!(total_from_quantity(33.33, 1.666), 55.53);
    }

    #[test]
    fn unit_price_rounds_to_three_decimals() {
        assert_eq!(unit_price_from_total(74.36, 40.0), 1.859);
        assert_eq!(unit_price_from_total(50.0, 27.0), 1.852);
    }

    #[test]
    fn unit_price_of_zero_quantity_is_zero() {
        assert_eq!(unit_price_from_total(50.0, 0.0), 0.0);
    }

    #[test]
    fn price_relations_are_mutually_consistent() {
        let quantity = 38.2;
        let unit = 1.724;
        let total = total_from_quantity(quantity, unit);
        assert_eq!(unit_price_from_total(total, quantity), unit);
    }

    #[test]
    fn valid_purchase_passes() {
        assert!(validate_purchase(&valid_purchase()).is_ok());
    }

    #[test]
    fn purchase_with_zero_quantity_is_refused() {
        let mut purchase = valid_purchase();
        purchase.quantity = 0.0;
        let err = validate_purchase(&purchase).unwrap_err();
        assert_eq!(err.field, "quantity");
    }

    #[test]
    fn purchase_with_future_date_is_refused() {
        let mut purchase = valid_purchase();
        purchase.date = OffsetDateTime::now_utc() + Duration::days(2);
        let err = validate_purchase(&purchase).unwrap_err();
        assert_eq!(err.field, "date");
    }

    #[test]
    fn purchase_without_vehicle_is_refused() {
        let mut purchase = valid_purchase();
        purchase.vehicle_id = "  ".to_string();
        let err = validate_purchase(&purchase).unwrap_err();
        assert_eq!(err.field, "vehicle_id");
    }

    #[test]
    fn vehicle_year_bounds_are_checked() {
        let vehicle = Vehicle {
            id: String::new(),
            name: "Clio".to_string(),
            make: "Renault".to_string(),
            model: "Clio V".to_string(),
            year: 1850,
            license_plate: "AB-123-CD".to_string(),
            fuel_kind: FuelKind::Gasoline,
            average_consumption: None,
            tank_capacity: None,
            notes: None,
        };
        let err = validate_vehicle(&vehicle).unwrap_err();
        assert_eq!(err.field, "year");
    }

    #[test]
    fn charge_battery_percent_bounds_are_checked() {
        let charge = ElectricCharge {
            id: String::new(),
            date: datetime!(2024-02-10 09:00 UTC),
            vehicle_id: "v1".to_string(),
            station: "Ionity".to_string(),
            energy_kwh: 35.0,
            price_per_kwh: 0.59,
            total_price: 20.65,
            mileage: 0.0,
            power_kw: None,
            duration_min: None,
            battery_start_pct: Some(20),
            battery_end_pct: Some(120),
            meter_start_kwh: None,
            meter_end_kwh: None,
            payment: PaymentMethod::App,
            notes: None,
        };
        let err = validate_charge(&charge).unwrap_err();
        assert_eq!(err.field, "battery_end_pct");
    }
}
