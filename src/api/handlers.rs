use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use serde::Deserialize;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};
use tower_http::request_id::RequestId;

use crate::{
    error::AppResult,
    models::Intent,
    presentation::{render, PageView},
    services::{likes::like_recommendation, Effect, Notice},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

fn request_id_str(request_id: &RequestId) -> &str {
    request_id.header_value().to_str().unwrap_or("invalid")
}

async fn current_view(state: &AppState) -> Json<PageView> {
    Json(render(&*state.controller.read().await))
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Current page view
pub async fn get_view(State(state): State<AppState>) -> Json<PageView> {
    current_view(&state).await
}

/// Apply one user intent and return the updated view
pub async fn apply_intent(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(intent): Json<Intent>,
) -> AppResult<Json<PageView>> {
    let effect = state.controller.write().await.apply(intent)?;

    if let Some(Effect::Fetch(ticket)) = effect {
        tracing::info!(
            request_id = request_id_str(&request_id),
            generation = ticket.generation(),
            "Reload requested"
        );
        state.spawn_fetch(ticket);
    }

    Ok(current_view(&state).await)
}

/// Server-sent stream of controller notices, one event per notice
pub async fn notices(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.controller.read().await.subscribe();

    let stream = BroadcastStream::new(receiver)
        .filter_map(|notice| match notice {
            Ok(notice) => notice_event(&notice),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Notice subscriber lagged");
                None
            }
        })
        .map(Ok);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn notice_event(notice: &Notice) -> Option<Event> {
    Event::default()
        .event(notice.kind())
        .json_data(notice)
        .map_err(|e| tracing::error!(error = %e, "Failed to encode notice"))
        .ok()
}

/// Sign in with email and password
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<Json<PageView>> {
    state.controller.write().await.auth_started();

    let result = state
        .session
        .sign_in_with_password(&request.email, &request.password)
        .await;

    {
        let mut controller = state.controller.write().await;
        controller.auth_finished(&result.as_ref().map(|_| ()).map_err(|e| e.clone()));
        if let Ok(session) = &result {
            controller.set_user(Some(session.user.clone()));
        }
    }

    result?;
    Ok(current_view(&state).await)
}

/// Create an account; the dialog closes even when confirmation is pending
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<Json<PageView>> {
    state.controller.write().await.auth_started();

    let result = state.session.sign_up(&request.email, &request.password).await;

    {
        let mut controller = state.controller.write().await;
        controller.auth_finished(&result.as_ref().map(|_| ()).map_err(|e| e.clone()));
        if let Ok(Some(session)) = &result {
            controller.set_user(Some(session.user.clone()));
        }
    }

    result?;
    Ok(current_view(&state).await)
}

/// Sign out of the current session
pub async fn sign_out(State(state): State<AppState>) -> AppResult<Json<PageView>> {
    if let Err(e) = state.session.sign_out().await {
        tracing::error!(error = %e, "Error signing out");
        return Err(e.into());
    }

    state.controller.write().await.set_user(None);
    Ok(current_view(&state).await)
}

/// Record a like from the signed-in user
pub async fn like(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(recommendation_id): Path<String>,
) -> AppResult<StatusCode> {
    let (user_id, recommendation_id) = state
        .controller
        .read()
        .await
        .like_target(&recommendation_id)?;

    tracing::info!(
        request_id = request_id_str(&request_id),
        recommendation_id = %recommendation_id,
        "Processing like"
    );

    let result = like_recommendation(state.likes.as_ref(), &user_id, &recommendation_id).await;
    state
        .controller
        .read()
        .await
        .like_finished(&recommendation_id, &result);

    result?;
    Ok(StatusCode::NO_CONTENT)
}
