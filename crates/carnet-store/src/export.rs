//! CSV export of the combined purchase/charge history.

use std::collections::HashMap;

use time::{Date, OffsetDateTime};

use carnet_types::{ElectricCharge, FuelPurchase, Vehicle};

use crate::error::{Error, Result};

const HEADER: [&str; 8] = [
    "Date",
    "Type",
    "Véhicule",
    "Station",
    "Quantité/Énergie",
    "Prix unitaire",
    "Total",
    "Détails",
];

enum Row<'a> {
    Fuel(&'a FuelPurchase),
    Electric(&'a ElectricCharge),
}

impl Row<'_> {
    fn date(&self) -> OffsetDateTime {
        match self {
            Row::Fuel(p) => p.date,
            Row::Electric(c) => c.date,
        }
    }
}

/// Serialize purchases and charges into CSV text, most recent first.
///
/// Produces exactly one header line plus one row per record. Vehicle
/// identifiers are resolved to names where possible; an unknown reference
/// falls back to the raw identifier. An empty history is refused rather
/// than producing a header-only file.
pub fn export_csv(
    vehicles: &[Vehicle],
    purchases: &[FuelPurchase],
    charges: &[ElectricCharge],
) -> Result<String> {
    if purchases.is_empty() && charges.is_empty() {
        return Err(Error::EmptyExport);
    }

    let names: HashMap<&str, &str> = vehicles
        .iter()
        .map(|v| (v.id.as_str(), v.name.as_str()))
        .collect();
    let vehicle_name = |id: &str| names.get(id).copied().unwrap_or(id).to_string();

    let mut rows: Vec<Row> = purchases
        .iter()
        .map(Row::Fuel)
        .chain(charges.iter().map(Row::Electric))
        .collect();
    rows.sort_by_key(|row| std::cmp::Reverse(row.date()));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADER)
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;

    for row in rows {
        let record = match row {
            Row::Fuel(p) => [
                p.date.date().to_string(),
                "Carburant".to_string(),
                vehicle_name(&p.vehicle_id),
                p.station.clone(),
                format!("{:.2}", p.quantity),
                format!("{:.3}", p.price_per_liter),
                format!("{:.2}", p.total_price),
                p.notes.clone().unwrap_or_default(),
            ],
            Row::Electric(c) => [
                c.date.date().to_string(),
                "Électricité".to_string(),
                vehicle_name(&c.vehicle_id),
                c.station.clone(),
                format!("{:.2}", c.energy_kwh),
                format!("{:.3}", c.price_per_kwh),
                format!("{:.2}", c.total_price),
                c.notes.clone().unwrap_or_default(),
            ],
        };
        writer
            .write_record(record)
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// File name for an export generated on the given date:
/// `achats-energie-<ISO date>.csv`.
pub fn export_filename(date: Date) -> String {
    format!("achats-energie-{date}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use carnet_types::{FuelKind, PaymentMethod, PurchaseLocation};
    use time::macros::{date, datetime};

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

    fn purchase() -> FuelPurchase {
        FuelPurchase {
            id: "p1".to_string(),
            date: datetime!(2024-02-10 09:00 UTC),
            quantity: 40.0,
            price_per_liter: 1.859,
            total_price: 74.36,
            station: "Total Access".to_string(),
            location: PurchaseLocation::default(),
            vehicle_id: "v1".to_string(),
            payment: PaymentMethod::Card,
            mileage: 10_000.0,
            fuel_kind: FuelKind::Gasoline,
            notes: None,
        }
    }

    fn charge() -> ElectricCharge {
        ElectricCharge {
            id: "c1".to_string(),
            date: datetime!(2024-03-01 20:00 UTC),
            vehicle_id: "v9".to_string(),
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
            notes: Some("autoroute".to_string()),
        }
    }

    #[test]
    fn empty_history_is_refused() {
        assert!(matches!(
            export_csv(&[], &[], &[]),
            Err(Error::EmptyExport)
        ));
    }

    #[test]
    fn export_has_header_plus_one_row_per_record() {
        let csv = export_csv(&[vehicle()], &[purchase()], &[charge()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Date,Type,Véhicule,Station,Quantité/Énergie,Prix unitaire,Total,Détails"
        );
    }

    #[test]
    fn rows_are_sorted_most_recent_first() {
        let csv = export_csv(&[vehicle()], &[purchase()], &[charge()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[1].starts_with("2024-03-01,Électricité"));
        assert!(lines[2].starts_with("2024-02-10,Carburant"));
    }

    #[test]
    fn vehicle_names_are_resolved_with_raw_id_fallback() {
        let csv = export_csv(&[vehicle()], &[purchase()], &[charge()]).unwrap();
        assert!(csv.contains(",Clio,"));
        // v9 has no registered vehicle; the identifier passes through.
        assert!(csv.contains(",v9,"));
    }

    #[test]
    fn filename_carries_the_iso_date() {
        assert_eq!(
            export_filename(date!(2024-03-15)),
            "achats-energie-2024-03-15.csv"
        );
    }
}
