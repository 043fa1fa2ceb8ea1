//! Application state shared across the presentation layer.
//!
//! One [`AppState`] instance is owned by the composition root and passed by
//! reference to whoever needs it; there is no ambient global. Each collection
//! slice pairs a cached record array with a loading flag, and every mutation
//! goes through the remote store before the cache is touched.
//!
//! Consistency model: no retries, no versioning, last writer wins. A failed
//! refresh leaves the previous cache intact (stale but available); a failed
//! mutation leaves the cache unchanged and propagates the error.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use carnet_remote::{CollectionClient, CollectionRecord, DocumentBackend};
use carnet_types::{
    ChargingStation, ElectricCharge, FuelPurchase, GasStation, Store, Vehicle,
    validate::{validate_charge, validate_purchase, validate_vehicle},
};

use crate::error::{Error, Result};
use crate::snapshot::Snapshot;

/// One collection slice: typed client, cached records, loading flag.
struct CollectionState<R: CollectionRecord> {
    client: CollectionClient<R>,
    cache: RwLock<Vec<R>>,
    loading: AtomicBool,
}

impl<R: CollectionRecord + Clone> CollectionState<R> {
    fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            client: CollectionClient::new(backend),
            cache: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
        }
    }

    async fn records(&self) -> Vec<R> {
        self.cache.read().await.clone()
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Replace the cache wholesale from the remote collection.
    ///
    /// On failure the previous cache is kept and the loading flag is cleared.
    async fn refresh(&self) -> Result<()> {
        self.loading.store(true, Ordering::SeqCst);
        let result = self.client.fetch_all().await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(records) => {
                *self.cache.write().await = records;
                Ok(())
            }
            Err(e) => {
                warn!(collection = R::COLLECTION, error = %e, "refresh failed");
                Err(e.into())
            }
        }
    }

    async fn create(&self, record: &R) -> Result<R> {
        let created = self.client.create(record).await?;
        let mut cache = self.cache.write().await;
        cache.push(created.clone());
        cache.sort_by(|a, b| a.natural_cmp(b));
        Ok(created)
    }

    /// Apply a partial update; the server's merged record replaces the cache
    /// entry, the same policy for every collection.
    async fn update(&self, id: &str, patch: Value) -> Result<R> {
        let merged = self.client.update(id, patch).await?;
        let mut cache = self.cache.write().await;
        if let Some(slot) = cache.iter_mut().find(|r| r.id() == id) {
            *slot = merged.clone();
        }
        cache.sort_by(|a, b| a.natural_cmp(b));
        Ok(merged)
    }

    /// Merge a patch onto the cached record so form-level checks can run
    /// before the write leaves the process. An uncached id yields `None`;
    /// the server then remains the only judge of the patch.
    async fn patched_preview(&self, id: &str, patch: &Value) -> Result<Option<R>> {
        let cache = self.cache.read().await;
        let Some(current) = cache.iter().find(|r| r.id() == id) else {
            return Ok(None);
        };
        let mut fields = serde_json::to_value(current)?;
        if let (Value::Object(base), Value::Object(changes)) = (&mut fields, patch) {
            for (key, value) in changes {
                if !value.is_null() {
                    base.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(Some(serde_json::from_value(fields)?))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(id).await?;
        self.cache.write().await.retain(|r| r.id() != id);
        Ok(())
    }

    async fn replace(&self, records: Vec<R>) {
        *self.cache.write().await = records;
    }
}

/// Shared application state: six collection slices plus the local snapshot.
pub struct AppState {
    vehicles: CollectionState<Vehicle>,
    fuel_purchases: CollectionState<FuelPurchase>,
    electric_charges: CollectionState<ElectricCharge>,
    gas_stations: CollectionState<GasStation>,
    charging_stations: CollectionState<ChargingStation>,
    stores: CollectionState<Store>,
    snapshot_path: Option<PathBuf>,
}

impl AppState {
    /// Create state over a backend. `snapshot_path` enables local
    /// persistence of the vehicle and fuel-purchase slices; `None` disables
    /// it (tests, one-shot commands).
    pub fn new(backend: Arc<dyn DocumentBackend>, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            vehicles: CollectionState::new(Arc::clone(&backend)),
            fuel_purchases: CollectionState::new(Arc::clone(&backend)),
            electric_charges: CollectionState::new(Arc::clone(&backend)),
            gas_stations: CollectionState::new(Arc::clone(&backend)),
            charging_stations: CollectionState::new(Arc::clone(&backend)),
            stores: CollectionState::new(backend),
            snapshot_path,
        }
    }

    /// Restore the persisted slices from the local snapshot, if one exists.
    /// The other four collections must be refreshed from the remote store.
    pub async fn restore_snapshot(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        if let Some(snapshot) = Snapshot::load(path)? {
            self.vehicles.replace(snapshot.vehicles).await;
            self.fuel_purchases.replace(snapshot.fuel_purchases).await;
        }
        Ok(())
    }

    /// Refresh every collection from the remote store.
    pub async fn refresh_all(&self) -> Result<()> {
        tokio::try_join!(
            self.vehicles.refresh(),
            self.fuel_purchases.refresh(),
            self.electric_charges.refresh(),
            self.gas_stations.refresh(),
            self.charging_stations.refresh(),
            self.stores.refresh(),
        )?;
        Ok(())
    }

    // Snapshot write failures are logged, not propagated: the remote write
    // already succeeded and the caller still gets its result.
    async fn save_snapshot(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        let snapshot = Snapshot {
            vehicles: self.vehicles.records().await,
            fuel_purchases: self.fuel_purchases.records().await,
        };
        if let Err(e) = snapshot.save(path) {
            warn!(path = %path.display(), error = %e, "failed to save snapshot");
        }
    }

    // Vehicles

    pub async fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles.records().await
    }

    pub fn vehicles_loading(&self) -> bool {
        self.vehicles.is_loading()
    }

    pub async fn refresh_vehicles(&self) -> Result<()> {
        self.vehicles.refresh().await
    }

    pub async fn add_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle> {
        validate_vehicle(&vehicle)?;
        let created = self.vehicles.create(&vehicle).await?;
        self.save_snapshot().await;
        Ok(created)
    }

    pub async fn update_vehicle(&self, id: &str, patch: Value) -> Result<Vehicle> {
        if let Some(preview) = self.vehicles.patched_preview(id, &patch).await? {
            validate_vehicle(&preview)?;
        }
        let updated = self.vehicles.update(id, patch).await?;
        self.save_snapshot().await;
        Ok(updated)
    }

    /// Delete a vehicle, refused while any purchase or charge references it.
    pub async fn remove_vehicle(&self, id: &str) -> Result<()> {
        let purchases = self
            .fuel_purchases
            .records()
            .await
            .iter()
            .filter(|p| p.vehicle_id == id)
            .count();
        if purchases > 0 {
            return Err(Error::ReferencedBy {
                entity: "vehicle",
                id: id.to_string(),
                referenced_by: "fuel purchases",
                count: purchases,
            });
        }

        let charges = self
            .electric_charges
            .records()
            .await
            .iter()
            .filter(|c| c.vehicle_id == id)
            .count();
        if charges > 0 {
            return Err(Error::ReferencedBy {
                entity: "vehicle",
                id: id.to_string(),
                referenced_by: "charging sessions",
                count: charges,
            });
        }

        self.vehicles.delete(id).await?;
        self.save_snapshot().await;
        Ok(())
    }

    // Fuel purchases

    pub async fn fuel_purchases(&self) -> Vec<FuelPurchase> {
        self.fuel_purchases.records().await
    }

    pub fn fuel_purchases_loading(&self) -> bool {
        self.fuel_purchases.is_loading()
    }

    pub async fn refresh_fuel_purchases(&self) -> Result<()> {
        self.fuel_purchases.refresh().await
    }

    pub async fn add_fuel_purchase(&self, purchase: FuelPurchase) -> Result<FuelPurchase> {
        validate_purchase(&purchase)?;
        let created = self.fuel_purchases.create(&purchase).await?;
        self.save_snapshot().await;
        Ok(created)
    }

    pub async fn update_fuel_purchase(&self, id: &str, patch: Value) -> Result<FuelPurchase> {
        if let Some(preview) = self.fuel_purchases.patched_preview(id, &patch).await? {
            validate_purchase(&preview)?;
        }
        let updated = self.fuel_purchases.update(id, patch).await?;
        self.save_snapshot().await;
        Ok(updated)
    }

    pub async fn remove_fuel_purchase(&self, id: &str) -> Result<()> {
        self.fuel_purchases.delete(id).await?;
        self.save_snapshot().await;
        Ok(())
    }

    // Electric charges

    pub async fn electric_charges(&self) -> Vec<ElectricCharge> {
        self.electric_charges.records().await
    }

    pub fn electric_charges_loading(&self) -> bool {
        self.electric_charges.is_loading()
    }

    pub async fn refresh_electric_charges(&self) -> Result<()> {
        self.electric_charges.refresh().await
    }

    pub async fn add_electric_charge(&self, charge: ElectricCharge) -> Result<ElectricCharge> {
        validate_charge(&charge)?;
        self.electric_charges.create(&charge).await
    }

    pub async fn update_electric_charge(&self, id: &str, patch: Value) -> Result<ElectricCharge> {
        if let Some(preview) = self.electric_charges.patched_preview(id, &patch).await? {
            validate_charge(&preview)?;
        }
        self.electric_charges.update(id, patch).await
    }

    pub async fn remove_electric_charge(&self, id: &str) -> Result<()> {
        self.electric_charges.delete(id).await
    }

    // Gas stations

    pub async fn gas_stations(&self) -> Vec<GasStation> {
        self.gas_stations.records().await
    }

    pub fn gas_stations_loading(&self) -> bool {
        self.gas_stations.is_loading()
    }

    pub async fn refresh_gas_stations(&self) -> Result<()> {
        self.gas_stations.refresh().await
    }

    pub async fn add_gas_station(&self, station: GasStation) -> Result<GasStation> {
        self.gas_stations.create(&station).await
    }

    pub async fn update_gas_station(&self, id: &str, patch: Value) -> Result<GasStation> {
        self.gas_stations.update(id, patch).await
    }

    /// Delete a gas station, refused while any store links to it.
    pub async fn remove_gas_station(&self, id: &str) -> Result<()> {
        let linked = self
            .stores
            .records()
            .await
            .iter()
            .filter(|s| s.gas_station_id.as_deref() == Some(id))
            .count();
        if linked > 0 {
            return Err(Error::ReferencedBy {
                entity: "gas station",
                id: id.to_string(),
                referenced_by: "stores",
                count: linked,
            });
        }
        self.gas_stations.delete(id).await
    }

    // Charging stations

    pub async fn charging_stations(&self) -> Vec<ChargingStation> {
        self.charging_stations.records().await
    }

    pub fn charging_stations_loading(&self) -> bool {
        self.charging_stations.is_loading()
    }

    pub async fn refresh_charging_stations(&self) -> Result<()> {
        self.charging_stations.refresh().await
    }

    pub async fn add_charging_station(&self, station: ChargingStation) -> Result<ChargingStation> {
        self.charging_stations.create(&station).await
    }

    pub async fn update_charging_station(&self, id: &str, patch: Value) -> Result<ChargingStation> {
        self.charging_stations.update(id, patch).await
    }

    pub async fn remove_charging_station(&self, id: &str) -> Result<()> {
        self.charging_stations.delete(id).await
    }

    // Stores

    pub async fn stores(&self) -> Vec<Store> {
        self.stores.records().await
    }

    pub fn stores_loading(&self) -> bool {
        self.stores.is_loading()
    }

    pub async fn refresh_stores(&self) -> Result<()> {
        self.stores.refresh().await
    }

    pub async fn add_store(&self, store: Store) -> Result<Store> {
        self.stores.create(&store).await
    }

    pub async fn update_store(&self, id: &str, patch: Value) -> Result<Store> {
        self.stores.update(id, patch).await
    }

    pub async fn remove_store(&self, id: &str) -> Result<()> {
        self.stores.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carnet_remote::MemoryBackend;
    use carnet_types::{FuelKind, PaymentMethod, PurchaseLocation};
    use serde_json::json;
    use time::macros::datetime;

    fn vehicle(name: &str) -> Vehicle {
        Vehicle {
            id: String::new(),
            name: name.to_string(),
            make: "Renault".to_string(),
            model: "Clio V".to_string(),
            year: 2020,
            license_plate: "AB-123-CD".to_string(),
            fuel_kind: FuelKind::Gasoline,
            average_consumption: None,
            tank_capacity: None,
            notes: None,
        }
    }

    fn purchase(vehicle_id: &str) -> FuelPurchase {
        FuelPurchase {
            id: String::new(),
            date: datetime!(2024-02-10 09:00 UTC),
            quantity: 40.0,
            price_per_liter: 1.859,
            total_price: 74.36,
            station: "Total Access".to_string(),
            location: PurchaseLocation::default(),
            vehicle_id: vehicle_id.to_string(),
            payment: PaymentMethod::Card,
            mileage: 10_000.0,
            fuel_kind: FuelKind::Gasoline,
            notes: None,
        }
    }

    fn store(name: &str, gas_station_id: Option<&str>) -> Store {
        Store {
            id: String::new(),
            name: name.to_string(),
            address: "12 rue du Port".to_string(),
            chain: None,
            has_gas_station: gas_station_id.is_some(),
            gas_station_id: gas_station_id.map(String::from),
            opening_hours: None,
            notes: None,
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00 UTC),
        }
    }

    fn gas_station(name: &str) -> GasStation {
        GasStation {
            id: String::new(),
            name: name.to_string(),
            address: "A6".to_string(),
            location: Default::default(),
            brand: None,
            fuel_prices: Default::default(),
            last_updated: datetime!(2024-01-01 00:00 UTC),
            notes: None,
        }
    }

    fn fresh_state(backend: Arc<MemoryBackend>) -> AppState {
        AppState::new(backend, None)
    }

    fn snapshot_state(backend: Arc<MemoryBackend>, path: PathBuf) -> AppState {
        AppState::new(backend, Some(path))
    }

    #[tokio::test]
    async fn add_and_refresh_vehicles() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(Arc::clone(&backend));

        let created = state.add_vehicle(vehicle("Clio")).await.unwrap();
        assert!(!created.id.is_empty());

        // A second state over the same backend sees the record after refresh.
        let other = fresh_state(backend);
        assert!(other.vehicles().await.is_empty());
        other.refresh_vehicles().await.unwrap();
        assert_eq!(other.vehicles().await.len(), 1);
    }

    #[tokio::test]
    async fn invalid_vehicle_never_reaches_the_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(Arc::clone(&backend));

        let mut bad = vehicle("");
        bad.name = "  ".to_string();
        let err = state.add_vehicle(bad).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(backend.list("vehicles").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_update_never_reaches_the_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(Arc::clone(&backend));

        let v = state.add_vehicle(vehicle("Clio")).await.unwrap();
        let p = state.add_fuel_purchase(purchase(&v.id)).await.unwrap();

        let err = state
            .update_fuel_purchase(&p.id, json!({"quantity": -5.0}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = state
            .update_vehicle(&v.id, json!({"year": 1492}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // The stored records keep their original values.
        state.refresh_fuel_purchases().await.unwrap();
        state.refresh_vehicles().await.unwrap();
        assert_eq!(state.fuel_purchases().await[0].quantity, 40.0);
        assert_eq!(state.vehicles().await[0].year, 2020);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_cache_and_clears_loading() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(Arc::clone(&backend));

        state.add_vehicle(vehicle("Clio")).await.unwrap();
        backend.set_offline(true).await;

        let err = state.refresh_vehicles().await.unwrap_err();
        assert!(matches!(err, Error::Remote(_)));
        assert_eq!(state.vehicles().await.len(), 1);
        assert!(!state.vehicles_loading());
    }

    #[tokio::test]
    async fn update_replaces_cache_entry_with_server_merge() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(backend);

        let created = state.add_vehicle(vehicle("Clio")).await.unwrap();
        let updated = state
            .update_vehicle(&created.id, json!({"year": 2023}))
            .await
            .unwrap();
        assert_eq!(updated.year, 2023);

        let cached = state.vehicles().await;
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].year, 2023);
        assert_eq!(cached[0].name, "Clio");
    }

    #[tokio::test]
    async fn vehicle_with_purchases_cannot_be_deleted() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(backend);

        let v = state.add_vehicle(vehicle("Clio")).await.unwrap();
        state.add_fuel_purchase(purchase(&v.id)).await.unwrap();

        let err = state.remove_vehicle(&v.id).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ReferencedBy {
                entity: "vehicle",
                count: 1,
                ..
            }
        ));
        assert_eq!(state.vehicles().await.len(), 1);
    }

    #[tokio::test]
    async fn unreferenced_vehicle_deletes_everywhere() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(Arc::clone(&backend));

        let v = state.add_vehicle(vehicle("Clio")).await.unwrap();
        state.remove_vehicle(&v.id).await.unwrap();

        assert!(state.vehicles().await.is_empty());
        assert!(backend.list("vehicles").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn linked_gas_station_cannot_be_deleted() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(backend);

        let station = state.add_gas_station(gas_station("Leclerc")).await.unwrap();
        state
            .add_store(store("Leclerc Drive", Some(&station.id)))
            .await
            .unwrap();

        let err = state.remove_gas_station(&station.id).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ReferencedBy {
                entity: "gas station",
                ..
            }
        ));

        // Unlinking the store releases the station.
        let stores = state.stores().await;
        state.remove_store(&stores[0].id).await.unwrap();
        state.remove_gas_station(&station.id).await.unwrap();
        assert!(state.gas_stations().await.is_empty());
    }

    #[tokio::test]
    async fn snapshot_persists_vehicles_and_purchases_across_states() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let backend = Arc::new(MemoryBackend::new());

        let state = snapshot_state(Arc::clone(&backend), path.clone());
        let v = state.add_vehicle(vehicle("Clio")).await.unwrap();
        state.add_fuel_purchase(purchase(&v.id)).await.unwrap();

        // A fresh state restores the two persisted slices without fetching.
        let restored = snapshot_state(backend, path);
        restored.restore_snapshot().await.unwrap();
        assert_eq!(restored.vehicles().await.len(), 1);
        assert_eq!(restored.fuel_purchases().await.len(), 1);
        // The other slices are not persisted locally.
        assert!(restored.gas_stations().await.is_empty());
    }

    #[tokio::test]
    async fn charges_are_not_snapshotted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let backend = Arc::new(MemoryBackend::new());

        let state = snapshot_state(Arc::clone(&backend), path.clone());
        let v = state.add_vehicle(vehicle("Zoe")).await.unwrap();
        state
            .add_electric_charge(ElectricCharge {
                id: String::new(),
                date: datetime!(2024-02-10 09:00 UTC),
                vehicle_id: v.id.clone(),
                station: "Ionity".to_string(),
                energy_kwh: 35.0,
                price_per_kwh: 0.59,
                total_price: 20.65,
                mileage: 0.0,
                power_kw: None,
                duration_min: None,
                battery_start_pct: None,
                battery_end_pct: None,
                meter_start_kwh: None,
                meter_end_kwh: None,
                payment: PaymentMethod::App,
                notes: None,
            })
            .await
            .unwrap();

        let restored = snapshot_state(backend, path);
        restored.restore_snapshot().await.unwrap();
        assert!(restored.electric_charges().await.is_empty());
    }

    #[tokio::test]
    async fn refresh_all_fills_every_slice() {
        let backend = Arc::new(MemoryBackend::new());
        let state = fresh_state(Arc::clone(&backend));
        state.add_vehicle(vehicle("Clio")).await.unwrap();
        state.add_gas_station(gas_station("Esso")).await.unwrap();

        let other = fresh_state(backend);
        other.refresh_all().await.unwrap();
        assert_eq!(other.vehicles().await.len(), 1);
        assert_eq!(other.gas_stations().await.len(), 1);
        assert!(other.fuel_purchases().await.is_empty());
    }
}
