//! The transport seam to the hosted document store.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::document::Document;
use crate::error::{Error, Result};

/// Low-level access to named document collections.
///
/// The hosted store is an external collaborator; everything above this
/// trait is transport-agnostic, which is also what lets tests substitute
/// [`crate::MemoryBackend`] for the real service.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// List every document in a collection, in store order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Insert a new document and return it with its assigned identifier.
    async fn insert(&self, collection: &str, fields: Value) -> Result<Document>;

    /// Apply a partial update and return the server's merged document.
    async fn patch(&self, collection: &str, id: &str, fields: Value) -> Result<Document>;

    /// Remove a document.
    async fn remove(&self, collection: &str, id: &str) -> Result<()>;
}

/// HTTP implementation of [`DocumentBackend`] against the hosted store's
/// REST surface.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    documents: Vec<Document>,
}

impl HttpBackend {
    /// Create a backend for the given base URL (e.g. `https://db.example.com`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| Error::not_reachable(&base_url, e))?;

        Ok(Self { client, base_url })
    }

    /// Create a backend with a caller-supplied reqwest client.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { client, base_url })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/v1/collections/{}/documents", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    async fn handle<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response
                .json()
                .await
                .map_err(|e| Error::Api {
                    status: status.as_u16(),
                    message: format!("invalid response body: {e}"),
                })?;
            Ok(body)
        } else {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| status.to_string());

            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let url = self.collection_url(collection);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::not_reachable(&url, e))?;

        let body: ListResponse = Self::handle(response).await?;
        Ok(body.documents)
    }

    async fn insert(&self, collection: &str, fields: Value) -> Result<Document> {
        let url = self.collection_url(collection);
        let response = self
            .client
            .post(&url)
            .json(&fields)
            .send()
            .await
            .map_err(|e| Error::not_reachable(&url, e))?;

        Self::handle(response).await
    }

    async fn patch(&self, collection: &str, id: &str, fields: Value) -> Result<Document> {
        let url = self.document_url(collection, id);
        let response = self
            .client
            .patch(&url)
            .json(&fields)
            .send()
            .await
            .map_err(|e| Error::not_reachable(&url, e))?;

        Self::handle(response).await
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<()> {
        let url = self.document_url(collection, id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| Error::not_reachable(&url, e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(Error::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
        } else {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| status.to_string());

            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {base_url}"
        )));
    }

    Ok(base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_normalizes_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8080/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080");
    }

    #[test]
    fn backend_rejects_bare_host() {
        let result = HttpBackend::new("localhost:8080");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn urls_are_collection_scoped() {
        let backend = HttpBackend::new("http://localhost:8080").unwrap();
        assert_eq!(
            backend.collection_url("vehicles"),
            "http://localhost:8080/v1/collections/vehicles/documents"
        );
        assert_eq!(
            backend.document_url("vehicles", "abc"),
            "http://localhost:8080/v1/collections/vehicles/documents/abc"
        );
    }
}
