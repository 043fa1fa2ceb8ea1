//! Third-party places lookup for discovering nearby fuel stations.

use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;

use carnet_types::{GasStation, GeoPoint};

use crate::error::{Error, Result};

/// One hit from the places service.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: GeoPoint,
}

impl PlaceResult {
    /// Convert into a [`GasStation`] ready to be saved as a favorite.
    ///
    /// Fuel prices never come from this source; the map is left empty until
    /// the user records prices themselves.
    pub fn into_station(self) -> GasStation {
        GasStation {
            id: String::new(),
            name: self.name,
            address: self.address,
            location: self.location,
            brand: None,
            fuel_prices: Default::default(),
            last_updated: OffsetDateTime::now_utc(),
            notes: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    results: Vec<PlaceResult>,
}

/// Client for the external map/places API.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: reqwest::Client,
    base_url: String,
}

impl PlacesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {base_url}"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| Error::not_reachable(&base_url, e))?;

        Ok(Self { client, base_url })
    }

    /// Search for fuel stations around a point.
    ///
    /// `query` narrows by name or brand; `radius_km` bounds the search circle.
    pub async fn search_stations(
        &self,
        query: Option<&str>,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<PlaceResult>> {
        let url = format!("{}/v1/places/search", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("lat", center.lat.to_string()),
            ("lng", center.lng.to_string()),
            ("radius_km", radius_km.to_string()),
            ("category", "fuel".to_string()),
        ]);
        if let Some(query) = query {
            request = request.query(&[("q", query)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::not_reachable(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| status.to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PlacesResponse = response.json().await.map_err(|e| Error::Api {
            status: status.as_u16(),
            message: format!("invalid response body: {e}"),
        })?;
        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_converts_to_station_without_prices() {
        let place = PlaceResult {
            name: "Total Access Dijon".to_string(),
            address: "2 avenue Jean Jaurès".to_string(),
            location: GeoPoint::new(47.31, 5.03),
        };

        let station = place.into_station();
        assert_eq!(station.name, "Total Access Dijon");
        assert!(station.fuel_prices.is_empty());
        assert!(station.id.is_empty());
    }

    #[test]
    fn client_rejects_bare_host() {
        assert!(matches!(
            PlacesClient::new("places.example.com"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
