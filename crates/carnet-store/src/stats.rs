//! Pure aggregation over in-memory record arrays.
//!
//! Everything here is a full scan recomputed on demand. None of these
//! functions fail: empty or sparse input degrades to zero/empty output.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use carnet_types::{ElectricCharge, FuelPurchase, Vehicle};

/// Pairwise consumption values outside this open interval (L/100km) are
/// discarded as unrealistic.
const CONSUMPTION_MIN: f64 = 0.0;
const CONSUMPTION_MAX: f64 = 30.0;

/// Spending totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// Month key, formatted `MM/yyyy`.
    pub month: String,
    pub fuel: f64,
    pub electric: f64,
    pub total: f64,
}

/// Group purchases and charges by calendar month, chronologically.
///
/// The result is independent of input order: each record lands in the
/// bucket of its own month and buckets are emitted oldest first.
pub fn monthly_totals(purchases: &[FuelPurchase], charges: &[ElectricCharge]) -> Vec<MonthlyTotal> {
    let mut buckets: BTreeMap<(i32, u8), (f64, f64)> = BTreeMap::new();

    for purchase in purchases {
        let key = (purchase.date.year(), purchase.date.month() as u8);
        buckets.entry(key).or_default().0 += purchase.total_price;
    }
    for charge in charges {
        let key = (charge.date.year(), charge.date.month() as u8);
        buckets.entry(key).or_default().1 += charge.total_price;
    }

    buckets
        .into_iter()
        .map(|((year, month), (fuel, electric))| MonthlyTotal {
            month: format!("{month:02}/{year}"),
            fuel,
            electric,
            total: fuel + electric,
        })
        .collect()
}

/// Estimated average consumption for a vehicle, in L/100km.
///
/// Derived from consecutive purchases with recorded odometer readings:
/// for each pair where mileage increased, `quantity / delta * 100` is
/// computed and kept if it falls inside the realistic window. When no
/// valid pair exists, falls back to the vehicle's stored average, or 0.
pub fn vehicle_consumption(vehicle: &Vehicle, purchases: &[FuelPurchase]) -> f64 {
    let mut own: Vec<&FuelPurchase> = purchases
        .iter()
        .filter(|p| p.vehicle_id == vehicle.id && p.mileage > 0.0)
        .collect();
    own.sort_by_key(|p| p.date);

    let mut values = Vec::new();
    for pair in own.windows(2) {
        let delta = pair[1].mileage - pair[0].mileage;
        if delta > 0.0 {
            let per_100km = pair[1].quantity / delta * 100.0;
            if per_100km > CONSUMPTION_MIN && per_100km < CONSUMPTION_MAX {
                values.push(per_100km);
            }
        }
    }

    if values.is_empty() {
        vehicle.average_consumption.unwrap_or(0.0)
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Total distance driven across all vehicles, in km.
///
/// Sums positive odometer deltas between chronologically consecutive
/// purchases of the same vehicle. Purchases without a recorded mileage are
/// left out of the delta chain entirely rather than treated as zero.
pub fn distance_driven(purchases: &[FuelPurchase]) -> f64 {
    let mut by_vehicle: HashMap<&str, Vec<&FuelPurchase>> = HashMap::new();
    for purchase in purchases.iter().filter(|p| p.mileage > 0.0) {
        by_vehicle
            .entry(purchase.vehicle_id.as_str())
            .or_default()
            .push(purchase);
    }

    let mut total = 0.0;
    for chain in by_vehicle.values_mut() {
        chain.sort_by_key(|p| p.date);
        for pair in chain.windows(2) {
            let delta = pair[1].mileage - pair[0].mileage;
            if delta > 0.0 {
                total += delta;
            }
        }
    }
    total
}

/// Per-vehicle spending summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleSpending {
    pub fuel_total: f64,
    pub electric_total: f64,
    pub fill_ups: usize,
    pub charge_sessions: usize,
}

impl VehicleSpending {
    pub fn total(&self) -> f64 {
        self.fuel_total + self.electric_total
    }
}

/// Spending totals keyed by vehicle identifier.
pub fn spending_by_vehicle(
    purchases: &[FuelPurchase],
    charges: &[ElectricCharge],
) -> HashMap<String, VehicleSpending> {
    let mut summaries: HashMap<String, VehicleSpending> = HashMap::new();

    for purchase in purchases {
        let entry = summaries.entry(purchase.vehicle_id.clone()).or_default();
        entry.fuel_total += purchase.total_price;
        entry.fill_ups += 1;
    }
    for charge in charges {
        let entry = summaries.entry(charge.vehicle_id.clone()).or_default();
        entry.electric_total += charge.total_price;
        entry.charge_sessions += 1;
    }

    summaries
}
