use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::identity::models::AuthenticatedSession;

/// Echo the session established by the bearer token.
pub async fn session(
    Extension(session): Extension<AuthenticatedSession>,
) -> ApiSuccess<SessionResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            user_id: session.user_id().value(),
            token: session.token,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub user_id: i64,
    pub token: String,
}
