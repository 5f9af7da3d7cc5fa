use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The single error type returned by handlers and the `AuthUser` extractor.
/// Every variant is terminal for the request; `IntoResponse` maps it to a status code and a
/// `{ "message": ... }` body. Validation failures carry the full list of violated rules.
#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more field rules failed. Messages are kept in rule order.
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    /// No credential, or a verified credential whose subject no longer exists.
    #[error("unauthorized")]
    Unauthorized,

    /// The credential is present but blank, malformed, expired or wrongly signed.
    #[error("invalid token")]
    InvalidToken,

    /// Login attempt with an unknown email or a wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("data not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Failure while signing a new token. Verification failures never land here.
    #[error("token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::PasswordHash(_) | ApiError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details stay in the logs.
            tracing::error!(error = %self, "request failed with an internal error");
            let body = json!({ "message": "internal server error" });
            return (status, Json(body)).into_response();
        }

        let body = match self {
            ApiError::Validation(messages) => json!({ "message": messages }),
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result alias used throughout the handler layer.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_render_as_a_message_list() {
        let (status, body) = body_json(ApiError::Validation(vec![
            "Title cannot be omitted".to_string(),
            "Image URL cannot be omitted".to_string(),
        ]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            json!(["Title cannot be omitted", "Image URL cannot be omitted"])
        );
    }

    #[tokio::test]
    async fn auth_errors_keep_their_exact_wording() {
        let (status, body) = body_json(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "unauthorized");

        let (status, body) = body_json(ApiError::InvalidToken).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "invalid token");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = body_json(ApiError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "internal server error");
    }
}
