//! Typed per-collection adapters.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::backend::DocumentBackend;
use crate::document::{Document, encode_fields, strip_nulls};
use crate::error::Result;

use carnet_types::{ChargingStation, ElectricCharge, FuelPurchase, GasStation, Store, Vehicle};

/// A record type that lives in a named remote collection.
pub trait CollectionRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the remote collection holding this record type.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Natural presentation order for this record type.
    fn natural_cmp(&self, other: &Self) -> Ordering;
}

impl CollectionRecord for Vehicle {
    const COLLECTION: &'static str = "vehicles";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl CollectionRecord for FuelPurchase {
    const COLLECTION: &'static str = "fuelPurchases";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    // Most recent first.
    fn natural_cmp(&self, other: &Self) -> Ordering {
        other.date.cmp(&self.date)
    }
}

impl CollectionRecord for ElectricCharge {
    const COLLECTION: &'static str = "electricCharges";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    // Most recent first.
    fn natural_cmp(&self, other: &Self) -> Ordering {
        other.date.cmp(&self.date)
    }
}

impl CollectionRecord for GasStation {
    const COLLECTION: &'static str = "gasStations";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl CollectionRecord for ChargingStation {
    const COLLECTION: &'static str = "chargingStations";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl CollectionRecord for Store {
    const COLLECTION: &'static str = "stores";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// Typed adapter over one remote collection.
///
/// Translates between wire documents and `carnet-types` records, and applies
/// the record type's natural ordering on fetch. Cheap to clone; the backend
/// is shared behind an [`Arc`].
pub struct CollectionClient<R: CollectionRecord> {
    backend: Arc<dyn DocumentBackend>,
    _record: PhantomData<fn() -> R>,
}

impl<R: CollectionRecord> Clone for CollectionClient<R> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _record: PhantomData,
        }
    }
}

impl<R: CollectionRecord> CollectionClient<R> {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            _record: PhantomData,
        }
    }

    /// Fetch every record in the collection, sorted in natural order.
    pub async fn fetch_all(&self) -> Result<Vec<R>> {
        let documents = self.backend.list(R::COLLECTION).await?;
        debug!(
            collection = R::COLLECTION,
            count = documents.len(),
            "fetched collection"
        );

        let mut records = documents
            .iter()
            .map(Document::decode)
            .collect::<Result<Vec<R>>>()?;
        records.sort_by(|a, b| a.natural_cmp(b));
        Ok(records)
    }

    /// Create a record and return it with its store-assigned identifier.
    pub async fn create(&self, record: &R) -> Result<R> {
        let fields = encode_fields(record)?;
        let document = self.backend.insert(R::COLLECTION, fields).await?;
        debug!(collection = R::COLLECTION, id = %document.id, "created document");
        document.decode()
    }

    /// Apply a partial update and return the store's merged record.
    ///
    /// Null-valued entries in the patch are stripped before sending; a field
    /// cannot be erased through an update, only overwritten.
    pub async fn update(&self, id: &str, mut patch: Value) -> Result<R> {
        strip_nulls(&mut patch);
        let document = self.backend.patch(R::COLLECTION, id, patch).await?;
        debug!(collection = R::COLLECTION, id = %document.id, "updated document");
        document.decode()
    }

    /// Delete a record by identifier.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.backend.remove(R::COLLECTION, id).await?;
        debug!(collection = R::COLLECTION, id, "deleted document");
        Ok(())
    }
}
