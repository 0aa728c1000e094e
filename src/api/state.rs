use std::sync::Arc;

use tokio::{sync::RwLock, task::JoinHandle};

use crate::{
    config::Config,
    error::ConfigError,
    services::{
        controller::FetchTicket,
        likes::{LikeStore, RestLikeStore},
        providers::{build_source, RecommendationSource},
        recommendations::load_recommendations,
        session::{watch_sessions, HostedAuthClient, SessionProvider},
        ViewController,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<RwLock<ViewController>>,
    pub source: Arc<dyn RecommendationSource>,
    pub session: Arc<dyn SessionProvider>,
    pub likes: Arc<dyn LikeStore>,
}

impl AppState {
    pub fn new(
        source: Arc<dyn RecommendationSource>,
        session: Arc<dyn SessionProvider>,
        likes: Arc<dyn LikeStore>,
    ) -> Self {
        Self {
            controller: Arc::new(RwLock::new(ViewController::new())),
            source,
            session,
            likes,
        }
    }

    /// Builds the hosted service clients; rejected settings abort startup
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let settings = config.service()?;
        let session: Arc<dyn SessionProvider> = Arc::new(HostedAuthClient::new(settings.clone()));
        let likes = Arc::new(RestLikeStore::new(settings, session.clone()));
        let source = build_source(config)?;

        Ok(Self::new(source, session, likes))
    }

    /// Issues the startup fetch and starts following session changes
    pub async fn start(&self) -> JoinHandle<bool> {
        let sessions = self.session.subscribe();
        tokio::spawn(watch_sessions(sessions, self.controller.clone()));

        let ticket = self.controller.write().await.begin_fetch();
        self.spawn_fetch(ticket)
    }

    pub fn spawn_fetch(&self, ticket: FetchTicket) -> JoinHandle<bool> {
        tokio::spawn(load_recommendations(
            self.controller.clone(),
            self.source.clone(),
            ticket,
        ))
    }
}
