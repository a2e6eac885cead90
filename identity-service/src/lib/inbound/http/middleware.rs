use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use crate::domain::identity::models::AuthOutcome;
use crate::domain::identity::models::AuthRequest;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("Format is Authorization: Bearer [token]")]
    BadScheme,
}

/// Parse an `Authorization` header value of the form `Bearer <token>`.
///
/// The value must split into exactly two space separated parts and the
/// scheme is matched case-insensitively.
pub fn parse_bearer(value: &str) -> Result<&str, BearerError> {
    let mut parts = value.split(' ');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(BearerError::BadScheme),
    }
}

/// Extract the bearer token from request headers.
///
/// # Returns
/// `None` when no `Authorization` header is present
///
/// # Errors
/// * `BadScheme` - Header is present but not a bearer credential
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, BearerError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| BearerError::BadScheme)?;
    parse_bearer(value).map(Some)
}

/// Middleware that authenticates the bearer token and stores the resulting
/// session in request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthorized("No authorization token was found".to_string()))?
        .to_string();

    match state
        .auth_service
        .authenticate(AuthRequest::Token(token))
        .await?
    {
        AuthOutcome::Authenticated(session) => {
            req.extensions_mut().insert(session);
            Ok(next.run(req).await)
        }
        AuthOutcome::Rejected(reason) => {
            tracing::debug!(reason = %reason, "Bearer token rejected");
            Err(ApiError::Unauthorized("Invalid or expired token".to_string()))
        }
    }
}
