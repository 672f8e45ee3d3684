use crate::api::ApiError;
use crate::cache::CacheError;
use crate::snapshot::SnapshotError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),
    #[error("socket address parsing error: {0}")]
    SocketAddressParsingError(#[from] std::net::AddrParseError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    AppErrors(#[from] AppErrors),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("api timeout must be positive")]
    ZeroTimeout,
    #[error("unsupported api url scheme {0}")]
    UnsupportedScheme(String),
    #[error("default location must not be empty")]
    EmptyDefaultLocation,
}

#[derive(Error, Debug)]
pub enum AppErrors {
    #[error(transparent)]
    ApiError(#[from] ApiError),
    #[error(transparent)]
    CacheError(#[from] CacheError),
    #[error("failed to persist filters: {0}")]
    SnapshotError(#[from] SnapshotError),
}

impl AppErrors {
    fn status(&self) -> StatusCode {
        match self {
            AppErrors::ApiError(_) => StatusCode::BAD_GATEWAY,
            AppErrors::CacheError(CacheError::UnknownEvent(_)) => StatusCode::NOT_FOUND,
            AppErrors::CacheError(CacheError::UnknownToken(_)) => StatusCode::CONFLICT,
            AppErrors::SnapshotError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppErrors {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
