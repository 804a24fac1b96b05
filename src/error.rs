//! Error handling for requests that fail before reaching the GraphQL schema.
//!
//! Errors inside the schema are reported through `async_graphql::Result`,
//! so this enum only covers token extraction and session lookup.

use axum::http::header::ToStrError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// The error enum for the HTTP layer.
///
/// Each variant renders as a JSON body of the form
///
/// ```json
/// {
///     "message": <description>,
///     "statusCode": <status>,
///     "error": <details>?
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// \[400\] The `PORTAL_TOKEN` header was not valid ASCII.
    #[error("invalid token header")]
    InvalidTokenHeader(#[source] ToStrError),
    /// \[401\] The provided token did not match a live session.
    #[error("login required")]
    Unauthorized(String),
    /// \[500\] An error occurred while interacting with the database.
    #[error("database error")]
    DbError(#[from] sqlx::Error),
}

pub type PortalResult<T> = Result<T, PortalError>;

impl PortalError {
    pub fn status(&self) -> StatusCode {
        match self {
            PortalError::InvalidTokenHeader(_) => StatusCode::BAD_REQUEST,
            PortalError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            PortalError::DbError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_json(&self) -> serde_json::Value {
        let mut json_val = match self {
            PortalError::InvalidTokenHeader(error) => json!({ "error": error.to_string() }),
            PortalError::Unauthorized(reason) => json!({ "error": reason }),
            PortalError::DbError(error) => json!({ "error": error.to_string() }),
        };

        json_val["statusCode"] = json!(self.status().as_u16());
        json_val["message"] = json!(self.to_string());

        json_val
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        if let PortalError::DbError(error) = &self {
            tracing::error!(%error, "request failed with a database error");
        }

        (self.status(), Json(self.as_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::PortalError;

    #[test]
    fn unauthorized_renders_status_and_reason() {
        let error = PortalError::Unauthorized("No login tied to the provided token".to_owned());
        let body = error.as_json();

        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["message"], "login required");
        assert_eq!(body["error"], "No login tied to the provided token");
    }
}
