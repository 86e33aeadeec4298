//! HTTP implementation of the data sources.

use std::time::Duration;

use bytes::Bytes;
use propledger_shared::config::ApiConfig;
use propledger_shared::types::{BuildingId, DocumentId};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::{MortgageDto, MortgageSummary, ProfitabilitySummary};
use crate::dto::IntoDomain;
use crate::envelope::Envelope;
use crate::error::ClientError;
use crate::kind::{EntityFilter, EntityKind};
use crate::source::{AnalysisSource, DocumentStore, EntitySource};

/// REST API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` for an invalid URL or when the
    /// HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        auth_token: Option<String>,
    ) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ClientError::configuration(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::configuration("base URL cannot hold paths"));
        }
        let trimmed = base_url.path().trim_end_matches('/').to_string();
        base_url.set_path(&trimmed);

        let http = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| ClientError::configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            auth_token: auth_token.filter(|t| !t.is_empty()),
        })
    }

    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.auth_token.clone(),
        )
    }

    /// Absolute URL of an API path made of `segments`.
    #[must_use]
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self.http.get(url).header("Accept", "application/json");
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GETs a JSON document.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses and undecodable bodies.
    pub async fn get_json(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value, ClientError> {
        let url = self.url(segments);
        debug!(%url, "GET");
        let response = self.get(url).query(query).send().await?;
        let body = response.error_for_status()?.json::<Value>().await?;
        Ok(body)
    }
}

/// Splits `/a/b` into path segments.
fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl EntitySource for ApiClient {
    async fn list(&self, kind: EntityKind, filter: &EntityFilter) -> Result<Value, ClientError> {
        self.get_json(&segments(kind.path()), &filter.query_pairs())
            .await
    }
}

impl DocumentStore for ApiClient {
    async fn fetch_document(&self, id: &DocumentId) -> Result<Bytes, ClientError> {
        let url = self.url(&["documents", id.as_str()]);
        debug!(%url, "GET document");
        let response = self.get(url).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(bytes)
    }
}

impl AnalysisSource for ApiClient {
    async fn profitability(
        &self,
        filter: &EntityFilter,
    ) -> Result<ProfitabilitySummary, ClientError> {
        let body = self
            .get_json(&["analysis", "profitability"], &filter.query_pairs())
            .await?;
        let body = match body {
            Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        };
        Ok(serde_json::from_value(body)?)
    }

    async fn mortgages(
        &self,
        building_ids: &[BuildingId],
    ) -> Result<Vec<MortgageSummary>, ClientError> {
        let ids: Vec<&str> = building_ids.iter().map(BuildingId::as_str).collect();
        let body = self
            .get_json(&["analysis", "mortgage"], &[("building_ids", ids.join(","))])
            .await?;
        let items = Envelope::classify(body)?.into_items("mortgages")?;

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let decoded = serde_json::from_value::<MortgageDto>(item)
                    .map_err(|e| e.to_string())
                    .and_then(IntoDomain::into_domain);
                match decoded {
                    Ok(summary) => Some(summary),
                    Err(reason) => {
                        warn!(%reason, "Dropping undecodable mortgage");
                        None
                    }
                }
            })
            .collect())
    }
}
