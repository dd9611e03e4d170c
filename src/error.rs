use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("trip {id} cannot {action} while {status}")]
    InvalidState {
        id: Uuid,
        action: &'static str,
        status: String,
    },

    #[error("{entity} {id} is {status}, not available for assignment")]
    Conflict {
        entity: &'static str,
        id: Uuid,
        status: String,
    },

    #[error("timed out waiting for locks on {entity} {id}")]
    LockTimeout { entity: &'static str, id: Uuid },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Conflict and LockTimeout leave the entities untouched, so the caller
    /// may retry the same call. The other variants are permanent rejections.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::LockTimeout { .. })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidState { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::LockTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": self.to_string(),
            "retriable": self.is_retriable(),
        }));

        (status, body).into_response()
    }
}
