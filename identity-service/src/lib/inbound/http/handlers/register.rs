use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use email_address::EmailAddress;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::identity::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let identity = state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            ApiError::Conflict(
                "Username or email already exists. Try logging in if you are a member".to_string(),
            )
        })?;

    Ok(ApiSuccess::new(StatusCode::CREATED, (&identity).into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Invalid email: {0}")]
    Email(String),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ParseRegisterRequestError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(ParseRegisterRequestError::EmptyPassword);
        }
        let email = self.email.trim();
        if !EmailAddress::is_valid(email) {
            return Err(ParseRegisterRequestError::Email(email.to_string()));
        }

        Ok(RegisterCommand::new(username, email, self.password))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
