//! Great-circle distance and nearby-station search.

use carnet_types::{GasStation, GeoPoint};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Stations within `radius_km` of `center`, closest first.
///
/// Linear scan over the cached stations; a station at exactly the radius is
/// included.
pub fn stations_within(
    stations: &[GasStation],
    center: GeoPoint,
    radius_km: f64,
) -> Vec<(f64, &GasStation)> {
    let mut hits: Vec<(f64, &GasStation)> = stations
        .iter()
        .map(|station| (haversine_km(center, station.location), station))
        .filter(|(distance, _)| *distance <= radius_km)
        .collect();
    hits.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    hits
}
