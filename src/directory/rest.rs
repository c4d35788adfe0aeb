//! REST directory adapter for the hosted database's PostgREST surface.
//!
//! Owns transport only: filter serialisation, auth headers, timeout and HTTP
//! error mapping, and JSON decoding into voter records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{DirectoryError, VoterDirectory};
use crate::models::{SearchParams, VoterRecord};

/// Directory that queries `{base}/rest/v1/{table}`.
pub struct RestDirectory {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl RestDirectory {
    /// Build the adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot address the table or the
    /// reqwest client cannot be constructed.
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| DirectoryError::Service(format!("invalid directory URL: {e}")))?;
        let endpoint = base
            .join(&format!("{}/rest/v1/{table}", base.path().trim_end_matches('/')))
            .map_err(|e| DirectoryError::Service(format!("invalid directory table: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Service(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl VoterDirectory for RestDirectory {
    fn backend_tag(&self) -> &'static str {
        "rest"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<VoterRecord>, DirectoryError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&filters(params));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let snippet: String = String::from_utf8_lossy(&body).chars().take(200).collect();
            tracing::warn!(%status, body = %snippet, "Directory rejected query");
            return Err(DirectoryError::Service(format!(
                "directory returned {status}"
            )));
        }

        serde_json::from_slice(&body)
            .map_err(|e| DirectoryError::Service(format!("invalid directory payload: {e}")))
    }
}

/// PostgREST filter pairs for one search.
fn filters(params: &SearchParams) -> Vec<(&'static str, String)> {
    let wards: Vec<String> = params
        .ward
        .candidates()
        .into_iter()
        .map(|w| format!("\"{w}\""))
        .collect();

    let mut pairs = vec![
        ("select", "*".to_string()),
        ("date_of_birth", format!("eq.{}", params.date_of_birth)),
        ("ward", format!("in.({})", wards.join(","))),
    ];
    if let Some(name) = &params.full_name {
        pairs.push(("full_name", format!("ilike.*{}*", escape_like(name))));
    }
    pairs
}

/// Neutralise pattern metacharacters so the fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        match c {
            '*' => {}
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn map_transport_error(err: reqwest::Error) -> DirectoryError {
    tracing::error!("Directory transport error: {:?}", err);
    if err.is_timeout() || err.is_connect() {
        DirectoryError::Network(err.to_string())
    } else if err.is_decode() {
        DirectoryError::Service(err.to_string())
    } else {
        DirectoryError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::models::SearchForm;
    use crate::search::normalize;

    fn params(name: Option<&str>) -> SearchParams {
        normalize(
            &SearchForm {
                full_name: name.map(str::to_string),
                dob: "01/01/1990".to_string(),
                ward: "05".to_string(),
                voter_number: None,
            },
            20,
        )
        .unwrap()
    }

    async fn stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_filters_cover_both_ward_forms() {
        let pairs = filters(&params(None));
        assert!(pairs.contains(&("date_of_birth", "eq.1990-01-01".to_string())));
        assert!(pairs.contains(&("ward", "in.(\"05\",\"5\")".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "full_name"));
    }

    #[test]
    fn test_name_filter_is_escaped_ilike() {
        let pairs = filters(&params(Some("50%_a*b")));
        assert!(pairs.contains(&("full_name", "ilike.*50\\%\\_ab*".to_string())));
    }

    #[tokio::test]
    async fn test_search_sends_filters_and_key() {
        let router = Router::new().route(
            "/rest/v1/voters",
            get(
                |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| async move {
                    assert_eq!(headers.get("apikey").unwrap(), "anon-key");
                    assert_eq!(
                        headers.get("authorization").unwrap(),
                        "Bearer anon-key"
                    );
                    assert_eq!(query["date_of_birth"], "eq.1990-01-01");
                    assert_eq!(query["ward"], "in.(\"05\",\"5\")");
                    Json(json!([{
                        "id": "v1",
                        "full_name": "Abdul Karim",
                        "father_name": null,
                        "date_of_birth": "1990-01-01",
                        "ward": "5",
                        "center_name": "Center",
                        "voter_number": "1234",
                        "created_at": "2024-01-01T00:00:00+00:00"
                    }]))
                },
            ),
        );
        let base = stub(router).await;

        let directory =
            RestDirectory::new(&base, "voters", Some("anon-key".into()), Duration::from_secs(5))
                .unwrap();
        let voters = directory.search(&params(None)).await.unwrap();
        assert_eq!(voters.len(), 1);
        assert_eq!(voters[0].ward, "5");
        assert!(voters[0].father_name.is_none());
    }

    #[tokio::test]
    async fn test_error_status_maps_to_service_error() {
        let router = Router::new().route(
            "/rest/v1/voters",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": "boom"})),
                )
            }),
        );
        let base = stub(router).await;
        let directory = RestDirectory::new(&base, "voters", None, Duration::from_secs(5)).unwrap();

        let err = directory.search(&params(None)).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Service(_)));
    }

    #[tokio::test]
    async fn test_bad_payload_maps_to_service_error() {
        let router = Router::new().route(
            "/rest/v1/voters",
            get(|| async { Json(json!({"not": "a list"})) }),
        );
        let base = stub(router).await;
        let directory = RestDirectory::new(&base, "voters", None, Duration::from_secs(5)).unwrap();

        let err = directory.search(&params(None)).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Service(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_network_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let directory = RestDirectory::new(
            &format!("http://{addr}"),
            "voters",
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let err = directory.search(&params(None)).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Network(_)));
    }
}
