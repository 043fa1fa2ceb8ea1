//! Record types for the carnet fuel/EV expense tracker.
//!
//! This crate provides the shared entity types mirrored from the hosted
//! document store, plus the form-level validation helpers applied before
//! any write reaches the remote boundary.
//!
//! # Entities
//!
//! | Record | Collection |
//! |--------|------------|
//! | [`Vehicle`] | `vehicles` |
//! | [`FuelPurchase`] | `fuelPurchases` |
//! | [`ElectricCharge`] | `electricCharges` |
//! | [`GasStation`] | `gasStations` |
//! | [`ChargingStation`] | `chargingStations` |
//! | [`Store`] | `stores` |
//!
//! Relations between records are opaque string identifiers; the store
//! enforces no referential integrity of its own.

pub mod types;
pub mod validate;

pub use types::{
    ChargingStation, ConnectorType, ElectricCharge, FuelKind, FuelPurchase, GasStation, GeoPoint,
    PaymentMethod, PurchaseLocation, Store, Vehicle,
};
pub use validate::{
    ValidationError, ValidationResult, total_from_quantity, unit_price_from_total,
};
