//! Remote document-store client for the carnet expense tracker.
//!
//! The hosted store exposes six named collections (`vehicles`,
//! `fuelPurchases`, `electricCharges`, `gasStations`, `chargingStations`,
//! `stores`), each reachable through four operations: list, insert, patch
//! and remove, keyed by an opaque document identifier.
//!
//! This crate provides:
//!
//! - [`DocumentBackend`]: the transport seam, with an HTTP implementation
//!   ([`HttpBackend`]) and an in-memory implementation for tests
//!   ([`MemoryBackend`])
//! - [`CollectionClient`]: the typed per-collection adapter translating
//!   between wire documents and the record types of `carnet-types`
//! - [`PlacesClient`]: the third-party map/places lookup used to discover
//!   nearby fuel stations
//!
//! No operation retries, no versioning is used: a call resolves or rejects
//! once and the last writer wins.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use carnet_remote::{CollectionClient, HttpBackend};
//! use carnet_types::Vehicle;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(HttpBackend::new("http://localhost:8080")?);
//! let vehicles: CollectionClient<Vehicle> = CollectionClient::new(backend);
//! for vehicle in vehicles.fetch_all().await? {
//!     println!("{} ({})", vehicle.name, vehicle.license_plate);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod memory;
pub mod places;

pub use backend::{DocumentBackend, HttpBackend};
pub use collection::{CollectionClient, CollectionRecord};
pub use document::Document;
pub use error::{Error, Result};
pub use memory::MemoryBackend;
pub use places::{PlaceResult, PlacesClient};
