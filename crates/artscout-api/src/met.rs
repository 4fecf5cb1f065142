use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::retry::{is_retryable_status, with_retry, RetryConfig};

pub const MET_API_BASE: &str = "https://collectionapi.metmuseum.org/public/collection/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

const USER_AGENT: &str = concat!("ArtScout/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum MetError {
    #[error("Upstream returned status {status}: {body}")]
    BadStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl MetError {
    /// Sort transport failures into timeouts and everything else
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MetError::Timeout
        } else {
            MetError::NetworkError(err)
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            MetError::Timeout => true,
            MetError::BadStatus { status, .. } => is_retryable_status(*status),
            MetError::NetworkError(e) => e.is_connect(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, MetError>;

/// Response body of `GET /search`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetSearchResponse {
    #[serde(default)]
    pub total: u64,
    /// The API sends `null` rather than `[]` when nothing matches
    #[serde(rename = "objectIDs", default)]
    pub object_ids: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetTag {
    #[serde(default)]
    pub term: Option<String>,
}

/// Response body of `GET /objects/{id}`, restricted to the fields we show
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetObject {
    #[serde(rename = "objectID")]
    pub object_id: u64,
    pub primary_image: Option<String>,
    pub primary_image_small: Option<String>,
    pub title: Option<String>,
    pub artist_display_name: Option<String>,
    pub artist_display_bio: Option<String>,
    pub object_name: Option<String>,
    pub department: Option<String>,
    pub object_date: Option<String>,
    pub object_begin_date: Option<i64>,
    pub object_end_date: Option<i64>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub culture: Option<String>,
    pub period: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub accession_number: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub accession_year: Option<String>,
    pub credit_line: Option<String>,
    pub tags: Option<Vec<MetTag>>,
    #[serde(rename = "objectURL")]
    pub object_url: Option<String>,
}

// accessionYear shows up as "1929" on most records and as a bare number on a few
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Connection settings for [`MetClient`]
#[derive(Debug, Clone)]
pub struct MetClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for MetClientConfig {
    fn default() -> Self {
        Self {
            base_url: MET_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::none(),
        }
    }
}

/// Client for The Met Collection API. No key required.
pub struct MetClient {
    client: reqwest::Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl MetClient {
    /// Point the client at a different host, e.g. a local mock
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(MetClientConfig {
            base_url: base_url.into(),
            ..MetClientConfig::default()
        })
    }

    pub fn with_config(config: MetClientConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_config: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search for object IDs that have images
    ///
    /// Returns an empty list when the response carries no `objectIDs`.
    pub async fn search_object_ids(&self, query: &str) -> Result<Vec<u64>> {
        let url = format!("{}/search", self.base_url);
        let response: MetSearchResponse = self
            .get_json(&url, &[("hasImages", "true"), ("q", query)], query)
            .await?;

        let ids = response.object_ids.unwrap_or_default();
        debug!(query, total = response.total, returned = ids.len(), "search finished");
        Ok(ids)
    }

    /// Fetch the full record for one object
    pub async fn get_object(&self, object_id: u64) -> Result<MetObject> {
        let url = format!("{}/objects/{}", self.base_url, object_id);
        self.get_json(&url, &[], &object_id.to_string()).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        subject: &str,
    ) -> Result<T> {
        with_retry(
            &self.retry_config,
            || async move {
                let response = self
                    .client
                    .get(url)
                    .query(query)
                    .send()
                    .await
                    .map_err(MetError::from_transport)?;

                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(MetError::NotFound(subject.to_string()));
                }

                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(MetError::BadStatus { status, body });
                }

                let body = response.text().await.map_err(MetError::from_transport)?;
                Ok(serde_json::from_str(&body)?)
            },
            MetError::is_retryable,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_search_sends_query_and_parses_ids() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("hasImages".into(), "true".into()),
                Matcher::UrlEncoded("q".into(), "Van Gogh".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total":3,"objectIDs":[101,102,103]}"#)
            .create_async()
            .await;

        let client = MetClient::with_base_url(server.url()).unwrap();
        let ids = client.search_object_ids("Van Gogh").await.unwrap();

        assert_eq!(ids, vec![101, 102, 103]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_null_ids_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"total":0,"objectIDs":null}"#)
            .create_async()
            .await;

        let client = MetClient::with_base_url(server.url()).unwrap();
        assert!(client.search_object_ids("zzzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_missing_ids_field_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"total":0}"#)
            .create_async()
            .await;

        let client = MetClient::with_base_url(server.url()).unwrap();
        assert!(client.search_object_ids("zzzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_server_error_fails() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("bad gateway")
            .expect(1)
            .create_async()
            .await;

        let client = MetClient::with_base_url(server.url()).unwrap();
        let err = client.search_object_ids("birds").await.unwrap_err();

        assert!(matches!(err, MetError::BadStatus { .. }));
        assert!(err.is_retryable());
        // Default config performs no retries
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = MetClient::with_base_url(server.url()).unwrap();
        let err = client.search_object_ids("birds").await.unwrap_err();
        assert!(matches!(err, MetError::ParseError(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_get_object_parses_record() {
        let body = serde_json::json!({
            "objectID": 436535,
            "primaryImage": "https://images.metmuseum.org/full.jpg",
            "primaryImageSmall": "https://images.metmuseum.org/small.jpg",
            "title": "Wheat Field with Cypresses",
            "artistDisplayName": "Vincent van Gogh",
            "artistDisplayBio": "Dutch, Zundert 1853–1890 Auvers-sur-Oise",
            "department": "European Paintings",
            "objectDate": "1889",
            "objectBeginDate": 1889,
            "objectEndDate": 1889,
            "medium": "Oil on canvas",
            "culture": "",
            "accessionYear": 1993,
            "tags": [{"term": "Landscapes"}, {"term": "Cypresses"}],
            "objectURL": "https://www.metmuseum.org/art/collection/search/436535"
        });

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/objects/436535")
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = MetClient::with_base_url(server.url()).unwrap();
        let object = client.get_object(436535).await.unwrap();

        assert_eq!(object.object_id, 436535);
        assert_eq!(object.title.as_deref(), Some("Wheat Field with Cypresses"));
        assert_eq!(object.object_begin_date, Some(1889));
        assert_eq!(object.accession_year.as_deref(), Some("1993"));
        assert_eq!(object.culture.as_deref(), Some(""));
        assert_eq!(object.tags.map(|t| t.len()), Some(2));
        assert!(object.period.is_none());
    }

    #[tokio::test]
    async fn test_get_object_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/objects/1")
            .with_status(404)
            .with_body(r#"{"message":"Not a valid object"}"#)
            .create_async()
            .await;

        let client = MetClient::with_base_url(server.url()).unwrap();
        let err = client.get_object(1).await.unwrap_err();
        assert!(matches!(err, MetError::NotFound(ref id) if id == "1"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = MetClient::with_base_url("http://localhost:9999/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
    }
}
