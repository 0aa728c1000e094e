//! Recommendation sources
//!
//! The view controller only sees the `RecommendationSource` trait. The static
//! source stands in for the network until the hosted table is populated; the
//! REST source reads that table directly.
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::{Config, SourceKind},
    error::{ConfigError, FetchError},
    models::Recommendation,
};

pub mod rest;
pub mod static_source;

pub use rest::RestSource;
pub use static_source::StaticSource;

/// Supplier of the full recommendation collection
///
/// Single-shot: no streaming and no pagination. A failure carries no partial
/// results.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn fetch_recommendations(&self) -> Result<Vec<Recommendation>, FetchError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Builds the source selected by `recommendation_source`
pub fn build_source(config: &Config) -> Result<Arc<dyn RecommendationSource>, ConfigError> {
    let source: Arc<dyn RecommendationSource> = match config.recommendation_source {
        SourceKind::Static => Arc::new(StaticSource::new(Duration::from_millis(
            config.fetch_delay_ms,
        ))),
        SourceKind::Remote => Arc::new(RestSource::new(config.service()?)),
    };

    tracing::info!(source = source.name(), "Recommendation source configured");

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_static_source() {
        let source = build_source(&Config::default()).unwrap();
        assert_eq!(source.name(), "static");
    }

    #[test]
    fn test_build_remote_source() {
        let config = Config {
            recommendation_source: SourceKind::Remote,
            ..Default::default()
        };
        let source = build_source(&config).unwrap();
        assert_eq!(source.name(), "rest");
    }

    #[test]
    fn test_build_remote_source_rejects_bad_settings() {
        let config = Config {
            recommendation_source: SourceKind::Remote,
            supabase_url: String::new(),
            ..Default::default()
        };
        assert_eq!(build_source(&config).err(), Some(ConfigError::MissingUrl));
    }
}
