use std::fmt;
use std::str::FromStr;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::errors::TokenRejection;
use crate::domain::identity::errors::UserIdError;

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(UserId)
            .map_err(|_| UserIdError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Public identity of a registered user. Carries no secret material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Stored credentials: an identity plus its password digest.
///
/// Only the store and the auth service see this type; everything handed to
/// callers goes through `into_identity`.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub identity: Identity,
    pub password_digest: String,
}

impl CredentialRecord {
    pub fn id(&self) -> UserId {
        self.identity.id
    }

    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("identity", &self.identity)
            .field("password_digest", &"<redacted>")
            .finish()
    }
}

/// Credentials to persist for a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub username: String,
    pub email: String,
    pub password_digest: String,
}

/// How a credential record is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Username(String),
    Email(String),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Username(username) => write!(f, "username={}", username),
            LookupKey::Email(email) => write!(f, "email={}", email),
        }
    }
}

/// Command to register a new user.
#[derive(Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Password login input: a lookup key plus the plaintext password.
#[derive(Clone)]
pub struct LoginInput {
    pub lookup: LookupKey,
    pub password: String,
}

impl LoginInput {
    /// Build login input from optional username and email.
    ///
    /// The username wins when both are given. Empty strings count as absent.
    ///
    /// # Errors
    /// * `MissingLookupKey` - Neither username nor email supplied
    pub fn new(
        username: Option<String>,
        email: Option<String>,
        password: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let lookup = match (non_empty(username), non_empty(email)) {
            (Some(username), _) => LookupKey::Username(username),
            (None, Some(email)) => LookupKey::Email(email),
            (None, None) => return Err(AuthError::MissingLookupKey),
        };

        Ok(Self {
            lookup,
            password: password.into(),
        })
    }

    pub fn with_username(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            lookup: LookupKey::Username(username.into()),
            password: password.into(),
        }
    }

    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            lookup: LookupKey::Email(email.into()),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("lookup", &self.lookup)
            .finish_non_exhaustive()
    }
}

/// What the caller presents to authenticate: a token or a password login.
#[derive(Debug, Clone)]
pub enum AuthRequest {
    Token(String),
    Login(LoginInput),
}

impl AuthRequest {
    /// Build a request from optional parts. A token takes precedence.
    ///
    /// # Errors
    /// * `MissingCredentials` - Neither a token nor login input supplied
    pub fn from_parts(token: Option<String>, login: Option<LoginInput>) -> Result<Self, AuthError> {
        match (non_empty(token), login) {
            (Some(token), _) => Ok(AuthRequest::Token(token)),
            (None, Some(login)) => Ok(AuthRequest::Login(login)),
            (None, None) => Err(AuthError::MissingCredentials),
        }
    }
}

/// Identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdentity {
    /// Password login: the full stored identity.
    Full(Identity),
    /// Token login: only the id carried in the token.
    Partial { id: UserId },
}

impl SessionIdentity {
    pub fn id(&self) -> UserId {
        match self {
            SessionIdentity::Full(identity) => identity.id,
            SessionIdentity::Partial { id } => *id,
        }
    }

    pub fn as_full(&self) -> Option<&Identity> {
        match self {
            SessionIdentity::Full(identity) => Some(identity),
            SessionIdentity::Partial { .. } => None,
        }
    }
}

/// Result of a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub identity: SessionIdentity,
    pub token: String,
}

impl AuthenticatedSession {
    pub fn user_id(&self) -> UserId {
        self.identity.id()
    }
}

/// Why authentication was refused.
///
/// The password path collapses every cause into
/// `InvalidCredentials`; the detailed cause only shows up in events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    InvalidCredentials,
    InvalidToken(TokenRejection),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidCredentials => f.write_str("invalid credentials"),
            Rejection::InvalidToken(reason) => write!(f, "invalid token: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(AuthenticatedSession),
    Rejected(Rejection),
}

impl AuthOutcome {
    pub fn session(&self) -> Option<&AuthenticatedSession> {
        match self {
            AuthOutcome::Authenticated(session) => Some(session),
            AuthOutcome::Rejected(_) => None,
        }
    }

    pub fn into_session(self) -> Option<AuthenticatedSession> {
        match self {
            AuthOutcome::Authenticated(session) => Some(session),
            AuthOutcome::Rejected(_) => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
