//! Core record types mirrored from the hosted document store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Fuel/energy category tag used by vehicles, purchases and station prices.
///
/// Serialized in lowercase on the wire (`"gasoline"`, `"diesel"`, ...),
/// matching the document-store representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelKind {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
    Lpg,
    Other,
}

impl FuelKind {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            FuelKind::Gasoline => "Gasoline",
            FuelKind::Diesel => "Diesel",
            FuelKind::Electric => "Electric",
            FuelKind::Hybrid => "Hybrid",
            FuelKind::Lpg => "LPG",
            FuelKind::Other => "Other",
        }
    }
}

/// Payment method tag on purchases and charges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    App,
    Other,
}

/// Connector-type tag on charging stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    Type2,
    Ccs,
    Chademo,
    Domestic,
    Other,
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Nested location object on a fuel purchase.
///
/// Historically recorded but largely unused; documents missing it on the
/// wire are normalized to the zeroed default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLocation {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub address: String,
}

/// A registered vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Document identifier, assigned by the store.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub fuel_kind: FuelKind,
    /// Stored average consumption in L/100km, used as a fallback when no
    /// consumption can be derived from purchase history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_consumption: Option<f64>,
    /// Tank capacity in liters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A logged fuel purchase.
///
/// The price fields carry a soft invariant maintained by the entry form:
/// `total_price ≈ round(quantity × price_per_liter, 2)`. It is not enforced
/// on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelPurchase {
    #[serde(default)]
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Quantity in liters.
    pub quantity: f64,
    pub price_per_liter: f64,
    pub total_price: f64,
    /// Station name as free text; not a reference to a [`GasStation`].
    pub station: String,
    #[serde(default)]
    pub location: PurchaseLocation,
    /// Identifier of the vehicle this purchase belongs to.
    pub vehicle_id: String,
    #[serde(default)]
    pub payment: PaymentMethod,
    /// Odometer reading in km at purchase time; 0 when not recorded.
    #[serde(default)]
    pub mileage: f64,
    pub fuel_kind: FuelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A logged electric charging session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricCharge {
    #[serde(default)]
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub vehicle_id: String,
    pub station: String,
    /// Delivered energy in kWh.
    pub energy_kwh: f64,
    pub price_per_kwh: f64,
    pub total_price: f64,
    /// Odometer reading in km; 0 when not recorded.
    #[serde(default)]
    pub mileage: f64,
    /// Charging power in kW.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_kw: Option<f64>,
    /// Session duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    /// Battery level at session start, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_start_pct: Option<u8>,
    /// Battery level at session end, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_end_pct: Option<u8>,
    /// Charger meter reading before the session, kWh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_start_kwh: Option<f64>,
    /// Charger meter reading after the session, kWh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_end_kwh: Option<f64>,
    #[serde(default)]
    pub payment: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A favorite gas station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasStation {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Last observed price per liter, keyed by fuel kind.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fuel_prices: BTreeMap<FuelKind, f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A favorite charging station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargingStation {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default)]
    pub connectors: Vec<ConnectorType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_power_kw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charger_count: Option<u32>,
    #[serde(default)]
    pub fast_charging: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

/// A favorite store, optionally linked to a gas station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(default)]
    pub has_gas_station: bool,
    /// Identifier of the linked [`GasStation`], when `has_gas_station` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_station_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_purchase() -> FuelPurchase {
        FuelPurchase {
            id: "p1".to_string(),
            date: datetime!(2024-03-15 10:30 UTC),
            quantity: 42.5,
            price_per_liter: 1.85,
            total_price: 78.63,
            station: "Total Access".to_string(),
            location: PurchaseLocation::default(),
            vehicle_id: "v1".to_string(),
            payment: PaymentMethod::Card,
            mileage: 12_500.0,
            fuel_kind: FuelKind::Diesel,
            notes: None,
        }
    }

    #[test]
    fn fuel_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FuelKind::Gasoline).unwrap(),
            "\"gasoline\""
        );
        assert_eq!(serde_json::to_string(&FuelKind::Lpg).unwrap(), "\"lpg\"");
        let parsed: FuelKind = serde_json::from_str("\"diesel\"").unwrap();
        assert_eq!(parsed, FuelKind::Diesel);
    }

    #[test]
    fn purchase_roundtrips_with_rfc3339_date() {
        let purchase = sample_purchase();
        let json = serde_json::to_string(&purchase).unwrap();
        assert!(json.contains("2024-03-15T10:30:00Z"));

        let parsed: FuelPurchase = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.date, purchase.date);
        assert_eq!(parsed.quantity, 42.5);
        assert_eq!(parsed.payment, PaymentMethod::Card);
    }

    #[test]
    fn purchase_missing_location_defaults_to_zeroed() {
        let json = r#"{
            "date": "2024-01-02T08:00:00Z",
            "quantity": 30.0,
            "price_per_liter": 1.70,
            "total_price": 51.0,
            "station": "Esso",
            "vehicle_id": "v1",
            "fuel_kind": "gasoline"
        }"#;

        let parsed: FuelPurchase = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.location, PurchaseLocation::default());
        assert_eq!(parsed.location.lat, 0.0);
        assert_eq!(parsed.mileage, 0.0);
        assert!(parsed.id.is_empty());
    }

    #[test]
    fn purchase_none_fields_are_omitted_on_the_wire() {
        let purchase = sample_purchase();
        let value = serde_json::to_value(&purchase).unwrap();
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn charging_station_active_defaults_true() {
        let json = r#"{"name": "Ionity Aire de Beaune", "address": "A6"}"#;
        let station: ChargingStation = serde_json::from_str(json).unwrap();
        assert!(station.active);
        assert!(!station.fast_charging);
        assert!(station.connectors.is_empty());
    }

    #[test]
    fn gas_station_prices_keyed_by_fuel_kind() {
        let mut prices = BTreeMap::new();
        prices.insert(FuelKind::Diesel, 1.79);
        prices.insert(FuelKind::Gasoline, 1.92);

        let station = GasStation {
            id: "g1".to_string(),
            name: "Leclerc".to_string(),
            address: "12 rue du Port".to_string(),
            location: GeoPoint::new(47.32, 5.04),
            brand: Some("Leclerc".to_string()),
            fuel_prices: prices,
            last_updated: datetime!(2024-03-01 00:00 UTC),
            notes: None,
        };

        let json = serde_json::to_string(&station).unwrap();
        assert!(json.contains("\"diesel\":1.79"));

        let parsed: GasStation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.fuel_prices.get(&FuelKind::Gasoline), Some(&1.92));
    }
}
