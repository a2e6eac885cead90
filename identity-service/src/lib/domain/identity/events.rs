use std::fmt;

use crate::domain::identity::errors::TokenRejection;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LookupKey;
use crate::domain::identity::models::Rejection;
use crate::domain::identity::models::UserId;

/// A signed token carried by an event. Redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct RawToken(String);

impl RawToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RawToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawToken(<redacted>)")
    }
}

/// Severity class of an event, used by sinks to pick a log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Success,
    Failure,
    Error,
}

/// Lifecycle events emitted by the auth service.
///
/// Emitted after every terminal branch. Sinks only observe them; they never
/// influence the result of the operation that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    RegisterSucceeded {
        identity: Identity,
    },
    RegisterStoreError {
        message: String,
    },
    RegisterRejected {
        username: String,
        email: String,
        hint: &'static str,
    },
    AuthenticateSucceeded {
        user_id: UserId,
    },
    AuthenticateFailed {
        reason: Rejection,
    },
    TokenStrategySucceeded {
        user_id: UserId,
    },
    TokenStrategyFailed {
        reason: TokenRejection,
        token: RawToken,
    },
    LoginStrategySucceeded {
        user_id: UserId,
    },
    LoginStrategyFailed {
        lookup: LookupKey,
    },
    PasswordLookupError {
        message: String,
    },
    PasswordUserNotFound {
        lookup: LookupKey,
    },
    PasswordHasherError {
        message: String,
    },
    PasswordMismatch {
        lookup: LookupKey,
    },
    PasswordVerified {
        user_id: UserId,
    },
    TokenIssued {
        user_id: UserId,
        expires_at: i64,
        token: RawToken,
    },
    TokenVerifyFailed {
        token: RawToken,
    },
    TokenVerified {
        payload: serde_json::Value,
    },
}

impl AuthEvent {
    /// Stable event name, `<operation>.<outcome>`.
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::RegisterSucceeded { .. } => "register.success",
            AuthEvent::RegisterStoreError { .. } => "register.error",
            AuthEvent::RegisterRejected { .. } => "register.fail",
            AuthEvent::AuthenticateSucceeded { .. } => "authenticate.success",
            AuthEvent::AuthenticateFailed { .. } => "authenticate.fail",
            AuthEvent::TokenStrategySucceeded { .. } => "authenticate_token.success",
            AuthEvent::TokenStrategyFailed { .. } => "authenticate_token.fail",
            AuthEvent::LoginStrategySucceeded { .. } => "authenticate_login.success",
            AuthEvent::LoginStrategyFailed { .. } => "authenticate_login.fail",
            AuthEvent::PasswordLookupError { .. } => "verify_password.error.storage",
            AuthEvent::PasswordUserNotFound { .. } => "verify_password.fail.user_not_found",
            AuthEvent::PasswordHasherError { .. } => "verify_password.error.hasher",
            AuthEvent::PasswordMismatch { .. } => "verify_password.fail.wrong_password",
            AuthEvent::PasswordVerified { .. } => "verify_password.success",
            AuthEvent::TokenIssued { .. } => "generate_token.success",
            AuthEvent::TokenVerifyFailed { .. } => "verify_token.fail",
            AuthEvent::TokenVerified { .. } => "verify_token.success",
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            AuthEvent::RegisterSucceeded { .. }
            | AuthEvent::AuthenticateSucceeded { .. }
            | AuthEvent::TokenStrategySucceeded { .. }
            | AuthEvent::LoginStrategySucceeded { .. }
            | AuthEvent::PasswordVerified { .. }
            | AuthEvent::TokenIssued { .. }
            | AuthEvent::TokenVerified { .. } => EventKind::Success,
            AuthEvent::RegisterRejected { .. }
            | AuthEvent::AuthenticateFailed { .. }
            | AuthEvent::TokenStrategyFailed { .. }
            | AuthEvent::LoginStrategyFailed { .. }
            | AuthEvent::PasswordUserNotFound { .. }
            | AuthEvent::PasswordMismatch { .. }
            | AuthEvent::TokenVerifyFailed { .. } => EventKind::Failure,
            AuthEvent::RegisterStoreError { .. }
            | AuthEvent::PasswordLookupError { .. }
            | AuthEvent::PasswordHasherError { .. } => EventKind::Error,
        }
    }

    /// The user the event is about, when known.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            AuthEvent::RegisterSucceeded { identity } => Some(identity.id),
            AuthEvent::AuthenticateSucceeded { user_id }
            | AuthEvent::TokenStrategySucceeded { user_id }
            | AuthEvent::LoginStrategySucceeded { user_id }
            | AuthEvent::PasswordVerified { user_id }
            | AuthEvent::TokenIssued { user_id, .. } => Some(*user_id),
            _ => None,
        }
    }

    /// Human readable detail without secrets (no tokens, no digests).
    pub fn detail(&self) -> Option<String> {
        match self {
            AuthEvent::RegisterStoreError { message }
            | AuthEvent::PasswordLookupError { message }
            | AuthEvent::PasswordHasherError { message } => Some(message.clone()),
            AuthEvent::RegisterRejected {
                username,
                email,
                hint,
            } => Some(format!("username={} email={}: {}", username, email, hint)),
            AuthEvent::AuthenticateFailed { reason } => Some(reason.to_string()),
            AuthEvent::TokenStrategyFailed { reason, .. } => Some(reason.to_string()),
            AuthEvent::LoginStrategyFailed { lookup }
            | AuthEvent::PasswordUserNotFound { lookup }
            | AuthEvent::PasswordMismatch { lookup } => Some(lookup.to_string()),
            AuthEvent::TokenIssued { expires_at, .. } => Some(format!("expires_at={}", expires_at)),
            _ => None,
        }
    }
}
