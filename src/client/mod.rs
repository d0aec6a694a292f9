//! Data sources feeding the dashboards: the REST API client and an
//! in-process mock seeded with the demo listings.

pub mod mock;
pub mod rest;
pub mod session;

use std::future::Future;

use uuid::Uuid;

use crate::errors::{ApiError, AppError};
use crate::models::user::Owner;
use crate::models::Listing;

pub use mock::MockSource;
pub use rest::RestClient;
pub use session::Session;

/// Errors from a listing source.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-2xx response.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A successful response without a `data` payload.
    #[error("Response carried no data")]
    EmptyResponse,
}

impl ClientError {
    /// Classify an error envelope, falling back to the HTTP status when the
    /// code is unknown.
    pub fn from_api(status: u16, error: ApiError) -> Self {
        match error.code.as_str() {
            "VALIDATION_ERROR" => Self::Validation(error.message),
            "NOT_FOUND" => Self::NotFound(error.message),
            "UNAUTHORIZED" => Self::Unauthorized(error.message),
            "FORBIDDEN" => Self::Forbidden(error.message),
            "CONFLICT" => Self::Conflict(error.message),
            _ => Self::from_status(status, error.message),
        }
    }

    /// Classify a failed response by HTTP status alone.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 422 => Self::Validation(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Server { status, message },
        }
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => Self::Validation(msg),
            AppError::NotFound(msg) => Self::NotFound(msg),
            AppError::Unauthorized => Self::Unauthorized("Authentication required".to_string()),
            AppError::Forbidden(msg) => Self::Forbidden(msg),
            AppError::Conflict(msg) => Self::Conflict(msg),
            AppError::Internal(msg) => Self::Server {
                status: 500,
                message: msg,
            },
        }
    }
}

/// Where a dashboard loads listings from and sends mutations to.
pub trait ListingSource<L: Listing> {
    /// Every listing owned by `owner`.
    fn fetch_all(&self, owner: Uuid) -> impl Future<Output = Result<Vec<L>, ClientError>> + Send;

    /// Persist a new listing; the source assigns its id and timestamp.
    fn create(
        &self,
        owner: &Owner,
        draft: L::Draft,
    ) -> impl Future<Output = Result<L, ClientError>> + Send;

    /// Apply a partial patch and return the full stored listing.
    fn update(
        &self,
        id: Uuid,
        patch: L::Patch,
    ) -> impl Future<Output = Result<L, ClientError>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), ClientError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: &str) -> ApiError {
        ApiError {
            code: code.to_string(),
            message: "msg".to_string(),
        }
    }

    #[test]
    fn envelope_codes_take_precedence() {
        assert!(matches!(
            ClientError::from_api(400, api_error("CONFLICT")),
            ClientError::Conflict(_)
        ));
        assert!(matches!(
            ClientError::from_api(403, api_error("FORBIDDEN")),
            ClientError::Forbidden(_)
        ));
    }

    #[test]
    fn unknown_codes_fall_back_to_status() {
        assert!(matches!(
            ClientError::from_api(404, api_error("SOMETHING_ELSE")),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_api(502, api_error("INTERNAL_ERROR")),
            ClientError::Server { status: 502, .. }
        ));
        assert!(matches!(
            ClientError::from_status(422, "bad json".to_string()),
            ClientError::Validation(_)
        ));
    }

    #[test]
    fn app_errors_map_one_to_one() {
        let err: ClientError = AppError::NotFound("Item not found".to_string()).into();
        assert_eq!(err.to_string(), "Not found: Item not found");
        let err: ClientError = AppError::Internal("boom".to_string()).into();
        assert!(matches!(err, ClientError::Server { status: 500, .. }));
    }
}
