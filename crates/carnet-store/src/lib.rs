//! Client state container and aggregation layer for the carnet expense
//! tracker.
//!
//! [`AppState`] mirrors the six remote collections into local caches and
//! exposes every CRUD action behind validation and referential-integrity
//! guards. The [`stats`], [`geo`] and [`export`] modules are pure functions
//! over those caches; they never touch the network.
//!
//! The vehicle and fuel-purchase slices are additionally persisted to a
//! local JSON [`snapshot`](crate::snapshot) so a restart shows data before
//! the first refresh completes.

pub mod error;
pub mod export;
pub mod geo;
pub mod snapshot;
pub mod state;
pub mod stats;

pub use error::{Error, Result};
pub use export::{export_csv, export_filename};
pub use geo::{haversine_km, stations_within};
pub use snapshot::{Snapshot, default_snapshot_path};
pub use state::AppState;
pub use stats::{
    MonthlyTotal, VehicleSpending, distance_driven, monthly_totals, spending_by_vehicle,
    vehicle_consumption,
};
