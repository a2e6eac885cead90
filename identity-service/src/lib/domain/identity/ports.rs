use async_trait::async_trait;
use auth_core::PasswordError;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::errors::StoreError;
use crate::domain::identity::events::AuthEvent;
use crate::domain::identity::models::AuthOutcome;
use crate::domain::identity::models::AuthRequest;
use crate::domain::identity::models::CredentialRecord;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LookupKey;
use crate::domain::identity::models::NewCredential;
use crate::domain::identity::models::RegisterCommand;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Username, email, and plaintext password
    ///
    /// # Returns
    /// The new identity, or `None` when credentials already exist for the
    /// username or email (the caller should log in instead)
    ///
    /// # Errors
    /// * `Hashing` - Password could not be hashed
    async fn register(&self, command: RegisterCommand) -> Result<Option<Identity>, AuthError>;

    /// Authenticate with a token or a password login.
    ///
    /// # Arguments
    /// * `request` - Token or login input
    ///
    /// # Returns
    /// `Authenticated` with a session, or `Rejected` with the reason
    ///
    /// # Errors
    /// * `TokenKey` / `TokenSigning` - Token configuration is unusable
    async fn authenticate(&self, request: AuthRequest) -> Result<AuthOutcome, AuthError>;
}

/// Persistence for credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist new credentials and assign an id.
    ///
    /// # Arguments
    /// * `credential` - Username, email, and password digest
    ///
    /// # Returns
    /// Created record
    ///
    /// # Errors
    /// * `AlreadyExists` - Username or email is already registered
    /// * `Database` - Storage operation failed
    async fn create(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError>;

    /// Retrieve the record matching a username or email.
    ///
    /// # Arguments
    /// * `lookup` - Username or email to search for
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn find_one(&self, lookup: &LookupKey) -> Result<Option<CredentialRecord>, StoreError>;
}

/// One-way password hashing.
#[async_trait]
pub trait PasswordHashing: Send + Sync + 'static {
    /// Hash a plaintext password into a salted digest.
    async fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored digest.
    async fn verify(&self, digest: &str, password: &str) -> Result<bool, PasswordError>;
}

/// Fire-and-forget sink for lifecycle events.
///
/// Implementations must return promptly and must not panic; delivery
/// failures are theirs to report.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: AuthEvent);
}
