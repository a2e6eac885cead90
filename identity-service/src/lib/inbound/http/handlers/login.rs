use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::identity::models::AuthOutcome;
use crate::domain::identity::models::AuthRequest;
use crate::domain::identity::models::LoginInput;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let input = LoginInput::new(body.username, body.email, body.password)?;

    let session = match state
        .auth_service
        .authenticate(AuthRequest::Login(input))
        .await?
    {
        AuthOutcome::Authenticated(session) => session,
        AuthOutcome::Rejected(_) => {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()))
        }
    };

    let identity = session.identity.as_full().ok_or_else(|| {
        ApiError::InternalServerError("Password login produced a partial session".to_string())
    })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: identity.into(),
            token: session.token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub token: String,
}
