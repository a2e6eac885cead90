use auth_core::JwtError;
use auth_core::PasswordError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id: {0}")]
    InvalidFormat(String),
}

/// Error for credential store operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Credentials already exist for username {username} or email {email}")]
    AlreadyExists { username: String, email: String },

    #[error("Database error: {0}")]
    Database(String),
}

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("signature does not match")]
    InvalidSignature,

    #[error("payload is malformed: {0}")]
    Malformed(String),

    #[error("missing claim: {0}")]
    MissingClaim(String),

    #[error("audience is not a user id: {0}")]
    InvalidAudience(String),

    #[error("expired at {expired_at}")]
    Expired { expired_at: i64 },
}

/// Errors raised by the auth service.
///
/// Everything except `InvalidToken` is fatal: caller misuse or a deployment
/// problem that retrying will not fix.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authenticate requires a token or login input")]
    MissingCredentials,

    #[error("login requires a username or an email")]
    MissingLookupKey,

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Token signing failed: {0}")]
    TokenSigning(String),

    #[error("Token key is unusable: {0}")]
    TokenKey(String),

    #[error("Token rejected: {0}")]
    InvalidToken(#[from] TokenRejection),
}

impl AuthError {
    /// Caller misuse, as opposed to deployment or infrastructure failures.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredentials | AuthError::MissingLookupKey
        )
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidKey(msg) => AuthError::TokenKey(msg),
            JwtError::EncodingFailed(msg) => AuthError::TokenSigning(msg),
            JwtError::DecodingFailed(msg) | JwtError::MalformedPayload(msg) => {
                AuthError::InvalidToken(TokenRejection::Malformed(msg))
            }
            JwtError::MissingClaim(claim) => {
                AuthError::InvalidToken(TokenRejection::MissingClaim(claim))
            }
        }
    }
}
