//! Search index client
//!
//! The index does relevance ranking; results come back already ordered and
//! are passed through the tolerant hit parsers in `relief_core::loader`.

use crate::{http_client, Result, ServiceError};
use relief_core::loader::{alerts_from_hits, resources_from_hits, Loaded};
use relief_core::{CapabilityFilter, DisasterAlert, ReliefResource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Page size of the relief finder
pub const RELIEF_PAGE_SIZE: u32 = 50;
/// Page size of the alert dashboard
pub const ALERT_PAGE_SIZE: u32 = 100;
/// Page size when scanning for the nearest shelter
pub const SHELTER_SCAN_SIZE: u32 = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub app_id: String,
    pub api_key: String,
    pub relief_index: String,
    pub disaster_index: String,
    /// Overrides `https://<app_id>-dsn.algolia.net`
    pub host: Option<String>,
    pub timeout_sec: u64,
}

impl SearchConfig {
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty() && !self.api_key.is_empty()
    }

    fn query_url(&self, index: &str) -> String {
        let host = self
            .host
            .clone()
            .unwrap_or_else(|| format!("https://{}-dsn.algolia.net", self.app_id));
        format!("{}/1/indexes/{}/query", host.trim_end_matches('/'), index)
    }
}

/// Latitude/longitude box, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn expression(&self) -> String {
        format!(
            "latitude >= {} AND latitude <= {} AND longitude >= {} AND longitude <= {}",
            self.south, self.north, self.west, self.east
        )
    }
}

/// One search request
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    text: String,
    filters: Vec<String>,
    hits_per_page: Option<u32>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Add a filter expression; empty expressions are ignored
    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        let expression = expression.into();
        if !expression.trim().is_empty() {
            self.filters.push(expression);
        }
        self
    }

    pub fn within(self, bounds: GeoBounds) -> Self {
        self.filter(bounds.expression())
    }

    pub fn hits_per_page(mut self, n: u32) -> Self {
        self.hits_per_page = Some(n);
        self
    }

    /// Combined filter expression sent to the index
    pub fn filters_expression(&self) -> String {
        match self.filters.len() {
            0 => String::new(),
            1 => self.filters[0].clone(),
            _ => self
                .filters
                .iter()
                .map(|f| format!("({})", f))
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }

    fn body(&self) -> QueryBody<'_> {
        QueryBody {
            query: &self.text,
            filters: self.filters_expression(),
            hits_per_page: self.hits_per_page,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody<'a> {
    query: &'a str,
    filters: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hits_per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    hits: Vec<serde_json::Value>,
}

pub struct SearchClient {
    config: SearchConfig,
    client: reqwest::Client,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let timeout = if config.timeout_sec == 0 { 10 } else { config.timeout_sec };
        let client = http_client(timeout)?;
        Ok(Self { config, client })
    }

    /// Raw hits from one index
    pub async fn query(&self, index: &str, query: &SearchQuery) -> Result<Vec<serde_json::Value>> {
        if !self.config.is_configured() || index.is_empty() {
            return Err(ServiceError::NotConfigured("search index"));
        }

        let body = query.body();
        debug!("Querying index {} with {:?}", index, body);

        let response = self
            .client
            .post(self.config.query_url(index))
            .header("X-Algolia-Application-Id", &self.config.app_id)
            .header("X-Algolia-API-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Status {
                service: "search index",
                status: response.status().as_u16(),
            });
        }

        let data: QueryResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(data.hits)
    }

    /// Relief finder page
    pub async fn search_relief(&self, text: &str, filter: CapabilityFilter) -> Result<Loaded<ReliefResource>> {
        let query = SearchQuery::new(text)
            .filter(filter.search_expression())
            .hits_per_page(RELIEF_PAGE_SIZE);
        let hits = self.query(&self.config.relief_index, &query).await?;
        let loaded = resources_from_hits(hits);

        info!(
            "Relief search {:?} ({}): {} hits, {} skipped",
            text,
            filter,
            loaded.records.len(),
            loaded.skipped
        );
        Ok(loaded)
    }

    /// Every relief resource the index will return in one page
    pub async fn all_relief(&self) -> Result<Loaded<ReliefResource>> {
        let query = SearchQuery::new("").hits_per_page(SHELTER_SCAN_SIZE);
        let hits = self.query(&self.config.relief_index, &query).await?;
        Ok(resources_from_hits(hits))
    }

    pub async fn search_alerts(&self, text: &str, bounds: Option<GeoBounds>) -> Result<Loaded<DisasterAlert>> {
        let mut query = SearchQuery::new(text).hits_per_page(ALERT_PAGE_SIZE);
        if let Some(bounds) = bounds {
            query = query.within(bounds);
        }
        let hits = self.query(&self.config.disaster_index, &query).await?;
        let loaded = alerts_from_hits(hits);

        info!(
            "Alert search {:?}: {} hits, {} skipped",
            text,
            loaded.records.len(),
            loaded.skipped
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_expression_composition() {
        let q = SearchQuery::new("water").filter(CapabilityFilter::All.search_expression());
        assert_eq!(q.filters_expression(), "");

        let q = SearchQuery::new("").filter(CapabilityFilter::Medical.search_expression());
        assert_eq!(q.filters_expression(), "has_medical:true");

        let bounds = GeoBounds {
            south: 20.0,
            west: 60.0,
            north: 35.5,
            east: 78.0,
        };
        let q = SearchQuery::new("").filter("has_food:true").within(bounds);
        assert_eq!(
            q.filters_expression(),
            "(has_food:true) AND (latitude >= 20 AND latitude <= 35.5 AND longitude >= 60 AND longitude <= 78)"
        );
    }

    #[test]
    fn test_query_body_shape() {
        let q = SearchQuery::new("shelter").filter("type:shelter").hits_per_page(50);
        let body = serde_json::to_value(q.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"query": "shelter", "filters": "type:shelter", "hitsPerPage": 50})
        );
    }

    #[test]
    fn test_query_url() {
        let mut config = SearchConfig {
            app_id: "APP".to_string(),
            api_key: "key".to_string(),
            ..SearchConfig::default()
        };
        assert_eq!(
            config.query_url("relief"),
            "https://APP-dsn.algolia.net/1/indexes/relief/query"
        );
        config.host = Some("http://localhost:9200/".to_string());
        assert_eq!(config.query_url("relief"), "http://localhost:9200/1/indexes/relief/query");
    }

    #[tokio::test]
    async fn test_unconfigured_client() {
        let client = SearchClient::new(SearchConfig::default()).unwrap();
        assert!(matches!(
            client.search_relief("", CapabilityFilter::All).await,
            Err(ServiceError::NotConfigured(_))
        ));
    }
}
