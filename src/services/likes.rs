//! Persistence boundary for "like" actions
use std::sync::Arc;

use reqwest::Client as HttpClient;
use serde::Serialize;

use crate::{config::ServiceSettings, error::PersistError, services::session::SessionProvider};

const LIKES_PATH: &str = "rest/v1/likes";

/// Records that a user liked a recommendation
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LikeStore: Send + Sync {
    /// Idempotent: liking twice leaves a single row
    async fn upsert_like(&self, user_id: &str, recommendation_id: &str)
        -> Result<(), PersistError>;
}

#[derive(Debug, Serialize)]
struct LikeRow<'a> {
    user_id: &'a str,
    recommendation_id: &'a str,
}

/// Writes likes into the hosted database's `likes` table
pub struct RestLikeStore {
    http_client: HttpClient,
    settings: ServiceSettings,
    session: Arc<dyn SessionProvider>,
}

impl RestLikeStore {
    pub fn new(settings: ServiceSettings, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            http_client: HttpClient::new(),
            settings,
            session,
        }
    }

    /// Row-level security needs the user's token; fall back to the public key
    fn bearer_token(&self) -> String {
        self.session
            .get_session()
            .map(|session| session.access_token)
            .unwrap_or_else(|| self.settings.anon_key.clone())
    }
}

#[async_trait::async_trait]
impl LikeStore for RestLikeStore {
    async fn upsert_like(
        &self,
        user_id: &str,
        recommendation_id: &str,
    ) -> Result<(), PersistError> {
        let response = self
            .http_client
            .post(self.settings.endpoint(LIKES_PATH))
            .header("apikey", &self.settings.anon_key)
            .header("Prefer", "resolution=merge-duplicates")
            .bearer_auth(self.bearer_token())
            .json(&LikeRow {
                user_id,
                recommendation_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PersistError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Forwards a like to the store. Failures are logged and returned; nothing
/// is retried.
pub async fn like_recommendation(
    store: &dyn LikeStore,
    user_id: &str,
    recommendation_id: &str,
) -> Result<(), PersistError> {
    match store.upsert_like(user_id, recommendation_id).await {
        Ok(()) => {
            tracing::info!(user_id, recommendation_id, "Like recorded");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                user_id,
                recommendation_id,
                "Failed to record like"
            );
            Err(e)
        }
    }
}
