use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure to load the recommendation collection
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Recommendation source returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode recommendations: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Failure reported by the session provider
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Message returned by the auth service, shown to the user as-is
    #[error("{0}")]
    Rejected(String),

    #[error("No active session")]
    NotSignedIn,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid auth response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AuthError::Decode(e.to_string())
        } else {
            AuthError::Network(e.to_string())
        }
    }
}

/// Failure to record a like
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PersistError {
    #[error("Like rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for PersistError {
    fn from(e: reqwest::Error) -> Self {
        PersistError::Network(e.to_string())
    }
}

/// Intent rejected because its precondition does not hold
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum IntentError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Recommendation {0} is not in the current results")]
    NotVisible(String),

    #[error("No recommendation is selected")]
    NothingSelected,
}

/// Settings rejected when building the hosted service clients
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Service URL is required")]
    MissingUrl,

    #[error("Service API key is required")]
    MissingKey,

    #[error("Invalid service URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sign in required")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Intent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized | AppError::Auth(AuthError::NotSignedIn) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Auth(AuthError::Rejected(_)) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) | AppError::Fetch(_) | AppError::Persist(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
