//! Local JSON snapshot of the vehicle and fuel-purchase slices.
//!
//! Only these two slices survive a restart; every other collection is
//! re-fetched from the remote store on the next load. The snapshot is
//! rewritten after each mutation to either slice.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use carnet_types::{FuelPurchase, Vehicle};

use crate::error::Result;

/// The persisted slice pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub fuel_purchases: Vec<FuelPurchase>,
}

impl Snapshot {
    /// Load a snapshot from disk. A missing file is not an error; it simply
    /// means there is nothing to restore.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        debug!(
            path = %path.display(),
            vehicles = snapshot.vehicles.len(),
            purchases = snapshot.fuel_purchases.len(),
            "restored snapshot"
        );
        Ok(Some(snapshot))
    }

    /// Write the snapshot, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        debug!(path = %path.display(), "saved snapshot");
        Ok(())
    }
}

/// Default snapshot location: `<data dir>/carnet/snapshot.json`.
pub fn default_snapshot_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("carnet").join("snapshot.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use carnet_types::FuelKind;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: "v1".to_string(),
            name: "Clio".to_string(),
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

    #[test]
    fn missing_file_restores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        assert!(Snapshot::load(&path).unwrap().is_none());
    }

    #[test]
    fn snapshot_roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshot.json");

        let snapshot = Snapshot {
            vehicles: vec![vehicle()],
            fuel_purchases: Vec::new(),
        };
        snapshot.save(&path).unwrap();

        let restored = Snapshot::load(&path).unwrap().unwrap();
        assert_eq!(restored.vehicles.len(), 1);
        assert_eq!(restored.vehicles[0].name, "Clio");
        assert!(restored.fuel_purchases.is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, "not json").unwrap();
        assert!(Snapshot::load(&path).is_err());
    }
}
