// src/errors.rs
use actix_web::HttpResponse;
use serde_json::json;

/// Domain error for pool operations. Handlers map variants onto HTTP
/// statuses; the scoring core itself never produces one (undetermined
/// input is a normal result there, not an error).
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl PoolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PoolError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        PoolError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        PoolError::Conflict(msg.into())
    }

    /// Translate into the uniform error envelope used by all handlers.
    pub fn to_response(&self) -> HttpResponse {
        let body = json!({
            "success": false,
            "message": self.to_string(),
        });
        match self {
            PoolError::Validation(_) => HttpResponse::BadRequest().json(body),
            PoolError::NotFound(_) => HttpResponse::NotFound().json(body),
            PoolError::Forbidden(_) => HttpResponse::Forbidden().json(body),
            PoolError::Conflict(_) => HttpResponse::Conflict().json(body),
            PoolError::Database(e) => {
                tracing::error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(json!({
                    "success": false,
                    "message": "Internal server error",
                }))
            }
        }
    }
}
