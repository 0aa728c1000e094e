//! Hosted database REST source
//!
//! Reads the `recommendations` table through the service's REST endpoint using
//! the public key. Rows may use snake_case column names.
use std::collections::HashSet;

use reqwest::Client as HttpClient;

use crate::{
    config::ServiceSettings,
    error::FetchError,
    models::Recommendation,
    services::providers::RecommendationSource,
};

const TABLE_PATH: &str = "rest/v1/recommendations";

#[derive(Clone)]
pub struct RestSource {
    http_client: HttpClient,
    settings: ServiceSettings,
}

impl RestSource {
    pub fn new(settings: ServiceSettings) -> Self {
        Self {
            http_client: HttpClient::new(),
            settings,
        }
    }

    fn parse_rows(body: &str) -> Result<Vec<Recommendation>, FetchError> {
        let rows: Vec<Recommendation> = serde_json::from_str(body).map_err(|e| {
            tracing::error!(error = %e, "Failed to deserialize recommendation rows");
            FetchError::Decode(e.to_string())
        })?;

        Ok(dedupe_by_id(rows))
    }
}

/// Keeps the first row for each id
fn dedupe_by_id(rows: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut seen = HashSet::new();
    let total = rows.len();

    let unique: Vec<Recommendation> = rows
        .into_iter()
        .filter(|row| seen.insert(row.id.clone()))
        .collect();

    if unique.len() != total {
        tracing::warn!(
            dropped = total - unique.len(),
            "Duplicate recommendation ids in source rows"
        );
    }

    unique
}

#[async_trait::async_trait]
impl RecommendationSource for RestSource {
    async fn fetch_recommendations(&self) -> Result<Vec<Recommendation>, FetchError> {
        let url = self.settings.endpoint(TABLE_PATH);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(&self.settings.anon_key)
            .query(&[("select", "*")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let recommendations = Self::parse_rows(&body)?;

        tracing::info!(
            count = recommendations.len(),
            provider = "rest",
            "Recommendations fetched"
        );

        Ok(recommendations)
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}
