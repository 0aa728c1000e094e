//! Session provider boundary
//!
//! Authentication is owned by the hosted service. This module only issues the
//! password grant, sign-up and logout calls and publishes the resulting session
//! to subscribers.
use std::sync::Arc;

use reqwest::{Client as HttpClient, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};

use crate::{
    config::ServiceSettings,
    error::AuthError,
    models::Session,
    services::controller::ViewController,
};

/// Issues and tracks user sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    /// Current session, if any
    fn get_session(&self) -> Option<Session>;

    /// Receiver that observes every sign-in and sign-out
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError>;

    /// Returns `None` when the account still needs email confirmation
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Error body shapes used by the auth service
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Client for the hosted auth service
pub struct HostedAuthClient {
    http_client: HttpClient,
    settings: ServiceSettings,
    session_tx: watch::Sender<Option<Session>>,
}

impl HostedAuthClient {
    pub fn new(settings: ServiceSettings) -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            http_client: HttpClient::new(),
            settings,
            session_tx,
        }
    }

    fn publish(&self, session: Option<Session>) {
        let signed_in = session.is_some();
        self.session_tx.send_replace(session);
        tracing::info!(signed_in, "Session changed");
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<Response, AuthError> {
        let response = self
            .http_client
            .post(self.settings.endpoint(path))
            .header("apikey", &self.settings.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, path, "Auth request rejected");
            return Err(AuthError::Rejected(rejection_message(status.as_u16(), &body)));
        }

        Ok(response)
    }
}

/// Extracts the user-facing message from an auth error body
fn rejection_message(status: u16, body: &str) -> String {
    let parsed: AuthErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| format!("Auth service returned status {}", status))
}

/// Sign-up answers with a full session, or with the bare user when the
/// account must be confirmed first
fn parse_sign_up(body: serde_json::Value) -> Result<Option<Session>, AuthError> {
    if body.get("access_token").is_none() {
        return Ok(None);
    }

    serde_json::from_value(body)
        .map(Some)
        .map_err(|e| AuthError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl SessionProvider for HostedAuthClient {
    fn get_session(&self) -> Option<Session> {
        self.session_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .post_credentials("auth/v1/token?grant_type=password", email, password)
            .await?;

        let session: Session = response.json().await?;
        self.publish(Some(session.clone()));

        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, AuthError> {
        let response = self.post_credentials("auth/v1/signup", email, password).await?;

        let body: serde_json::Value = response.json().await?;
        let session = parse_sign_up(body)?;

        match &session {
            Some(session) => self.publish(Some(session.clone())),
            None => tracing::info!("Sign-up pending email confirmation"),
        }

        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.get_session() else {
            return Ok(());
        };

        let response = self
            .http_client
            .post(self.settings.endpoint("auth/v1/logout"))
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected(rejection_message(status.as_u16(), &body)));
        }

        self.publish(None);

        Ok(())
    }
}

/// Forwards session-change events into the controller until the provider drops
pub async fn watch_sessions(
    mut sessions: watch::Receiver<Option<Session>>,
    controller: Arc<RwLock<ViewController>>,
) {
    loop {
        let user = sessions
            .borrow_and_update()
            .as_ref()
            .map(|session| session.user.clone());
        controller.write().await.set_user(user);

        if sessions.changed().await.is_err() {
            tracing::debug!("Session provider closed, watcher exiting");
            break;
        }
    }
}
