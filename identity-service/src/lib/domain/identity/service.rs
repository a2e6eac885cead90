use std::sync::Arc;

use async_trait::async_trait;
use auth_core::TokenConfig;
use auth_core::TokenEngine;
use auth_core::TokenPayload;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::errors::StoreError;
use crate::domain::identity::errors::TokenRejection;
use crate::domain::identity::events::AuthEvent;
use crate::domain::identity::events::RawToken;
use crate::domain::identity::models::AuthOutcome;
use crate::domain::identity::models::AuthRequest;
use crate::domain::identity::models::AuthenticatedSession;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginInput;
use crate::domain::identity::models::NewCredential;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Rejection;
use crate::domain::identity::models::SessionIdentity;
use crate::domain::identity::models::UserId;
use crate::domain::identity::ports::AuthServicePort;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::identity::ports::EventSink;
use crate::domain::identity::ports::PasswordHashing;

const LOGIN_HINT: &str = "Try logging in if you are a member";

/// Authentication orchestrator.
///
/// Coordinates the credential store, password hasher, and token engine to
/// register users and authenticate them by password or token. Holds no
/// per-request state, so one instance is shared by all concurrent callers.
pub struct AuthService<CS, PH, TE, ES>
where
    CS: CredentialStore + ?Sized,
    PH: PasswordHashing + ?Sized,
    TE: TokenEngine + ?Sized,
    ES: EventSink + ?Sized,
{
    store: Arc<CS>,
    hasher: Arc<PH>,
    engine: Arc<TE>,
    events: Arc<ES>,
    token_config: TokenConfig,
}

impl<CS, PH, TE, ES> AuthService<CS, PH, TE, ES>
where
    CS: CredentialStore + ?Sized,
    PH: PasswordHashing + ?Sized,
    TE: TokenEngine + ?Sized,
    ES: EventSink + ?Sized,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `hasher` - Password hashing implementation
    /// * `engine` - Token signing engine
    /// * `events` - Lifecycle event sink
    /// * `token_config` - Validated algorithm, keys, and expiry policy
    pub fn new(
        store: Arc<CS>,
        hasher: Arc<PH>,
        engine: Arc<TE>,
        events: Arc<ES>,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            store,
            hasher,
            engine,
            events,
            token_config,
        }
    }

    /// Token strategy: authenticate with a previously issued token.
    ///
    /// Checks, in order: signature, payload shape, presence of `aud` and
    /// `exp`, expiry. The session carries only the user id from the token.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, payload, claims, or expiry check failed
    /// * `TokenKey` - Verification key is unusable
    pub fn authenticate_token(&self, token: &str) -> Result<AuthenticatedSession, AuthError> {
        match self.token_subject(token) {
            Ok(id) => {
                let session = AuthenticatedSession {
                    identity: SessionIdentity::Partial { id },
                    token: token.to_string(),
                };
                self.events
                    .emit(AuthEvent::TokenStrategySucceeded { user_id: id });
                Ok(session)
            }
            Err(AuthError::InvalidToken(reason)) => {
                tracing::debug!(reason = %reason, "Token rejected");
                self.events.emit(AuthEvent::TokenStrategyFailed {
                    reason: reason.clone(),
                    token: RawToken::new(token),
                });
                Err(AuthError::InvalidToken(reason))
            }
            Err(e) => Err(e),
        }
    }

    fn token_subject(&self, token: &str) -> Result<UserId, AuthError> {
        let raw = self
            .verify_token(token)?
            .ok_or(TokenRejection::InvalidSignature)?;

        let claims = TokenPayload::from_value(raw)?.require()?;

        let id = claims
            .aud
            .parse::<UserId>()
            .map_err(|_| TokenRejection::InvalidAudience(claims.aud.clone()))?;

        if claims.is_expired(self.token_config.expiry().now()) {
            return Err(TokenRejection::Expired {
                expired_at: claims.exp,
            }
            .into());
        }

        Ok(id)
    }

    /// Password strategy: authenticate with a username or email and password.
    ///
    /// Every expected failure (unknown user, wrong password, storage or
    /// hashing trouble) yields `Ok(None)`.
    ///
    /// # Errors
    /// * `TokenKey` / `TokenSigning` - The session token could not be signed
    pub async fn authenticate_login(
        &self,
        input: &LoginInput,
    ) -> Result<Option<AuthenticatedSession>, AuthError> {
        let Some(identity) = self.verify_password(input).await else {
            self.events.emit(AuthEvent::LoginStrategyFailed {
                lookup: input.lookup.clone(),
            });
            return Ok(None);
        };

        let token = self.generate_token(&identity)?;
        let user_id = identity.id;
        let session = AuthenticatedSession {
            identity: SessionIdentity::Full(identity),
            token,
        };
        self.events
            .emit(AuthEvent::LoginStrategySucceeded { user_id });

        Ok(Some(session))
    }

    /// Look up the credentials and check the password. Fails closed.
    pub async fn verify_password(&self, input: &LoginInput) -> Option<Identity> {
        let record = match self.store.find_one(&input.lookup).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(lookup = %input.lookup, error = %e, "Credential lookup failed");
                self.events.emit(AuthEvent::PasswordLookupError {
                    message: e.to_string(),
                });
                None
            }
        };

        let Some(record) = record else {
            self.events.emit(AuthEvent::PasswordUserNotFound {
                lookup: input.lookup.clone(),
            });
            return None;
        };

        let passwords_match = match self
            .hasher
            .verify(&record.password_digest, &input.password)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(user_id = %record.id(), error = %e, "Password verification errored");
                self.events.emit(AuthEvent::PasswordHasherError {
                    message: e.to_string(),
                });
                false
            }
        };

        if !passwords_match {
            self.events.emit(AuthEvent::PasswordMismatch {
                lookup: input.lookup.clone(),
            });
            return None;
        }

        let identity = record.into_identity();
        self.events
            .emit(AuthEvent::PasswordVerified { user_id: identity.id });

        Some(identity)
    }

    /// Sign a token for `identity` that expires per the configured policy.
    ///
    /// # Errors
    /// * `TokenKey` - Signing key is unusable
    /// * `TokenSigning` - Token encoding failed
    pub fn generate_token(&self, identity: &Identity) -> Result<String, AuthError> {
        let expires_at = self.token_config.expiry().expires_at();
        let payload = TokenPayload::new(identity.id, expires_at);

        let token = self.engine.sign(
            self.token_config.algorithm(),
            &payload,
            self.token_config.signing_key(),
        )?;

        self.events.emit(AuthEvent::TokenIssued {
            user_id: identity.id,
            expires_at,
            token: RawToken::new(token.clone()),
        });

        Ok(token)
    }

    /// Check the token signature and return its raw payload.
    ///
    /// # Returns
    /// `None` when the signature does not match the configured key
    ///
    /// # Errors
    /// * `TokenKey` - Verification key is unusable
    /// * `InvalidToken` - Signature matched but the payload cannot be decoded
    pub fn verify_token(&self, token: &str) -> Result<Option<serde_json::Value>, AuthError> {
        let valid = self.engine.verify(
            token,
            self.token_config.algorithm(),
            self.token_config.verification_key(),
        )?;

        if !valid {
            self.events.emit(AuthEvent::TokenVerifyFailed {
                token: RawToken::new(token),
            });
            return Ok(None);
        }

        let payload = self.engine.decode(token)?;
        self.events.emit(AuthEvent::TokenVerified {
            payload: payload.clone(),
        });

        Ok(Some(payload))
    }
}

#[async_trait]
impl<CS, PH, TE, ES> AuthServicePort for AuthService<CS, PH, TE, ES>
where
    CS: CredentialStore + ?Sized,
    PH: PasswordHashing + ?Sized,
    TE: TokenEngine + ?Sized,
    ES: EventSink + ?Sized,
{
    async fn register(&self, command: RegisterCommand) -> Result<Option<Identity>, AuthError> {
        let password_digest = self.hasher.hash(&command.password).await?;

        let credential = NewCredential {
            username: command.username.clone(),
            email: command.email.clone(),
            password_digest,
        };

        let record = match self.store.create(credential).await {
            Ok(record) => Some(record),
            Err(StoreError::AlreadyExists { .. }) => None,
            Err(e) => {
                tracing::error!(username = %command.username, error = %e, "Failed to store credentials");
                self.events.emit(AuthEvent::RegisterStoreError {
                    message: e.to_string(),
                });
                None
            }
        };

        let Some(record) = record else {
            self.events.emit(AuthEvent::RegisterRejected {
                username: command.username,
                email: command.email,
                hint: LOGIN_HINT,
            });
            return Ok(None);
        };

        let identity = record.into_identity();
        tracing::info!(user_id = %identity.id, username = %identity.username, "User registered");
        self.events.emit(AuthEvent::RegisterSucceeded {
            identity: identity.clone(),
        });

        Ok(Some(identity))
    }

    async fn authenticate(&self, request: AuthRequest) -> Result<AuthOutcome, AuthError> {
        let result = match request {
            AuthRequest::Token(token) => match self.authenticate_token(&token) {
                Ok(session) => Ok(session),
                Err(AuthError::InvalidToken(reason)) => Err(Rejection::InvalidToken(reason)),
                Err(e) => return Err(e),
            },
            AuthRequest::Login(input) => self
                .authenticate_login(&input)
                .await?
                .ok_or(Rejection::InvalidCredentials),
        };

        match result {
            Ok(session) => {
                self.events.emit(AuthEvent::AuthenticateSucceeded {
                    user_id: session.user_id(),
                });
                Ok(AuthOutcome::Authenticated(session))
            }
            Err(reason) => {
                self.events.emit(AuthEvent::AuthenticateFailed {
                    reason: reason.clone(),
                });
                Ok(AuthOutcome::Rejected(reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use auth_core::ExpiryPolicy;
    use auth_core::HashParams;
    use auth_core::JwtEngine;
    use auth_core::JwtError;
    use auth_core::PasswordError;
    use auth_core::TokenAlgorithm;
    use auth_core::TokenKeys;
    use mockall::mock;
    use serde_json::json;

    use super::*;
    use crate::domain::identity::models::CredentialRecord;
    use crate::domain::identity::models::LookupKey;
    use crate::outbound::events::InMemoryEventSink;
    use crate::outbound::hashing::Argon2PasswordHashing;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";
    const NOW: i64 = 1_700_000_000;

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn create(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError>;
            async fn find_one(&self, lookup: &LookupKey) -> Result<Option<CredentialRecord>, StoreError>;
        }
    }

    mock! {
        pub TestHasher {}

        #[async_trait]
        impl PasswordHashing for TestHasher {
            async fn hash(&self, password: &str) -> Result<String, PasswordError>;
            async fn verify(&self, digest: &str, password: &str) -> Result<bool, PasswordError>;
        }
    }

    mock! {
        pub TestTokenEngine {}

        impl TokenEngine for TestTokenEngine {
            fn sign(&self, algorithm: TokenAlgorithm, payload: &TokenPayload, key: &[u8]) -> Result<String, JwtError>;
            fn verify(&self, token: &str, algorithm: TokenAlgorithm, key: &[u8]) -> Result<bool, JwtError>;
            fn decode(&self, token: &str) -> Result<serde_json::Value, JwtError>;
        }
    }

    fn fixed_now() -> i64 {
        NOW
    }

    fn token_config() -> TokenConfig {
        TokenConfig::new(
            TokenAlgorithm::HS256,
            TokenKeys::shared_secret(SECRET),
            ExpiryPolicy::from_seconds(3600).with_clock(fixed_now),
        )
        .unwrap()
    }

    fn hashing() -> Argon2PasswordHashing {
        Argon2PasswordHashing::with_params(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn alice() -> Identity {
        Identity {
            id: UserId(1),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    fn service<CS, PH>(
        store: CS,
        hasher: PH,
    ) -> (
        AuthService<CS, PH, JwtEngine, InMemoryEventSink>,
        Arc<InMemoryEventSink>,
    )
    where
        CS: CredentialStore,
        PH: PasswordHashing,
    {
        let events = Arc::new(InMemoryEventSink::new());
        let service = AuthService::new(
            Arc::new(store),
            Arc::new(hasher),
            Arc::new(JwtEngine::new()),
            Arc::clone(&events),
            token_config(),
        );
        (service, events)
    }

    fn sign(claims: &serde_json::Value) -> String {
        JwtEngine::new()
            .sign_claims(TokenAlgorithm::HS256, claims, SECRET)
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_create()
            .withf(|credential| {
                credential.username == "alice"
                    && credential.email == "a@x.com"
                    && credential.password_digest.starts_with("$argon2id")
            })
            .times(1)
            .returning(|credential| {
                Ok(CredentialRecord {
                    identity: Identity {
                        id: UserId(1),
                        username: credential.username,
                        email: credential.email,
                    },
                    password_digest: credential.password_digest,
                })
            });

        let (service, events) = service(store, hashing());

        let identity = service
            .register(RegisterCommand::new("alice", "a@x.com", "secret1"))
            .await
            .unwrap()
            .expect("identity");

        assert_eq!(identity, alice());
        assert_eq!(
            events.events(),
            vec![AuthEvent::RegisterSucceeded { identity: alice() }]
        );
    }

    #[tokio::test]
    async fn test_register_existing_user_returns_none() {
        let mut store = MockTestCredentialStore::new();
        store.expect_create().times(1).returning(|credential| {
            Err(StoreError::AlreadyExists {
                username: credential.username,
                email: credential.email,
            })
        });

        let (service, events) = service(store, hashing());

        let result = service
            .register(RegisterCommand::new("alice", "a@x.com", "secret1"))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(events.names(), vec!["register.fail"]);
    }

    #[tokio::test]
    async fn test_register_store_error_returns_none() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|_| Err(StoreError::Database("connection reset".to_string())));

        let (service, events) = service(store, hashing());

        let result = service
            .register(RegisterCommand::new("alice", "a@x.com", "secret1"))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(events.names(), vec!["register.error", "register.fail"]);
    }

    #[tokio::test]
    async fn test_register_hasher_failure_is_fatal() {
        let mut store = MockTestCredentialStore::new();
        store.expect_create().times(0);

        let mut hasher = MockTestHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Err(PasswordError::HashingFailed("out of memory".to_string())));

        let (service, events) = service(store, hasher);

        let result = service
            .register(RegisterCommand::new("alice", "a@x.com", "secret1"))
            .await;

        assert!(matches!(result, Err(AuthError::Hashing(_))));
        assert!(events.events().is_empty());
    }

    #[tokio::test]
    async fn test_login_success_issues_token() {
        let hasher = hashing();
        let digest = hasher.hash("secret1").await.unwrap();

        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_one()
            .withf(|lookup| *lookup == LookupKey::Username("alice".to_string()))
            .times(1)
            .returning(move |_| {
                Ok(Some(CredentialRecord {
                    identity: alice(),
                    password_digest: digest.clone(),
                }))
            });

        let (service, events) = service(store, hasher);

        let outcome = service
            .authenticate(AuthRequest::Login(LoginInput::with_username(
                "alice", "secret1",
            )))
            .await
            .unwrap();

        let session = outcome.into_session().expect("authenticated");
        assert_eq!(session.identity, SessionIdentity::Full(alice()));
        assert!(!session.token.is_empty());
        assert_eq!(
            events.names(),
            vec![
                "verify_password.success",
                "generate_token.success",
                "authenticate_login.success",
                "authenticate.success",
            ]
        );

        let claims = TokenPayload::from_value(JwtEngine::new().decode(&session.token).unwrap())
            .unwrap()
            .require()
            .unwrap();
        assert_eq!(claims.aud, "1");
        assert_eq!(claims.exp, NOW + 3600);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_rejected() {
        let hasher = hashing();
        let digest = hasher.hash("secret1").await.unwrap();

        let mut store = MockTestCredentialStore::new();
        store.expect_find_one().times(1).returning(move |_| {
            Ok(Some(CredentialRecord {
                identity: alice(),
                password_digest: digest.clone(),
            }))
        });

        let (service, events) = service(store, hasher);

        let outcome = service
            .authenticate(AuthRequest::Login(LoginInput::with_username("alice", "wrong")))
            .await
            .unwrap();

        assert_eq!(outcome, AuthOutcome::Rejected(Rejection::InvalidCredentials));
        assert_eq!(
            events.names(),
            vec![
                "verify_password.fail.wrong_password",
                "authenticate_login.fail",
                "authenticate.fail",
            ]
        );
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_rejected() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_one()
            .withf(|lookup| *lookup == LookupKey::Email("nobody@x.com".to_string()))
            .times(1)
            .returning(|_| Ok(None));

        let mut hasher = MockTestHasher::new();
        hasher.expect_verify().times(0);

        let (service, events) = service(store, hasher);

        let outcome = service
            .authenticate(AuthRequest::Login(LoginInput::with_email(
                "nobody@x.com",
                "secret1",
            )))
            .await
            .unwrap();

        assert_eq!(outcome, AuthOutcome::Rejected(Rejection::InvalidCredentials));
        assert_eq!(events.names()[0], "verify_password.fail.user_not_found");
    }

    #[tokio::test]
    async fn test_login_store_error_fails_closed() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_one()
            .times(1)
            .returning(|_| Err(StoreError::Database("timeout".to_string())));

        let (service, events) = service(store, hashing());

        let outcome = service
            .authenticate(AuthRequest::Login(LoginInput::with_username(
                "alice", "secret1",
            )))
            .await
            .unwrap();

        assert_eq!(outcome, AuthOutcome::Rejected(Rejection::InvalidCredentials));
        assert_eq!(
            &events.names()[..2],
            ["verify_password.error.storage", "verify_password.fail.user_not_found"]
        );
    }

    #[tokio::test]
    async fn test_login_hasher_error_fails_closed() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_one().times(1).returning(|_| {
            Ok(Some(CredentialRecord {
                identity: alice(),
                password_digest: "not-a-phc-string".to_string(),
            }))
        });

        let mut hasher = MockTestHasher::new();
        hasher
            .expect_verify()
            .times(1)
            .returning(|_, _| Err(PasswordError::VerificationFailed("bad digest".to_string())));

        let (service, events) = service(store, hasher);

        let outcome = service
            .authenticate(AuthRequest::Login(LoginInput::with_username(
                "alice", "secret1",
            )))
            .await
            .unwrap();

        assert_eq!(outcome, AuthOutcome::Rejected(Rejection::InvalidCredentials));
        assert_eq!(
            &events.names()[..2],
            ["verify_password.error.hasher", "verify_password.fail.wrong_password"]
        );
    }

    #[tokio::test]
    async fn test_generated_token_authenticates() {
        let (service, events) = service(MockTestCredentialStore::new(), hashing());

        let token = service.generate_token(&alice()).unwrap();
        let session = service.authenticate_token(&token).unwrap();

        assert_eq!(session.identity, SessionIdentity::Partial { id: UserId(1) });
        assert_eq!(session.token, token);
        match &events.events()[0] {
            AuthEvent::TokenIssued {
                user_id,
                expires_at,
                token: issued,
            } => {
                assert_eq!(*user_id, UserId(1));
                assert_eq!(*expires_at, NOW + 3600);
                assert_eq!(issued.expose(), token);
            }
            other => panic!("unexpected first event {:?}", other),
        }
        assert_eq!(
            events.names(),
            vec![
                "generate_token.success",
                "verify_token.success",
                "authenticate_token.success",
            ]
        );
    }

    #[tokio::test]
    async fn test_expired_token_raises() {
        let (service, _events) = service(MockTestCredentialStore::new(), hashing());

        let token = sign(&json!({ "aud": "1", "exp": NOW - 1 }));

        let result = service.authenticate_token(&token);
        assert!(matches!(
            result,
            Err(AuthError::InvalidToken(TokenRejection::Expired { expired_at })) if expired_at == NOW - 1
        ));
    }

    #[tokio::test]
    async fn test_token_expiring_now_raises() {
        let (service, _events) = service(MockTestCredentialStore::new(), hashing());

        let token = sign(&json!({ "aud": "1", "exp": NOW }));

        let result = service.authenticate_token(&token);
        assert!(matches!(
            result,
            Err(AuthError::InvalidToken(TokenRejection::Expired { .. }))
        ));
    }

    #[tokio::test]
    async fn test_missing_claims_raise_despite_valid_signature() {
        let (service, _events) = service(MockTestCredentialStore::new(), hashing());

        for (claims, missing) in [
            (json!({ "exp": NOW + 60 }), "aud"),
            (json!({ "aud": "1" }), "exp"),
            (json!({}), "exp"),
        ] {
            let token = sign(&claims);
            let result = service.authenticate_token(&token);
            assert!(
                matches!(
                    &result,
                    Err(AuthError::InvalidToken(TokenRejection::MissingClaim(claim))) if claim == missing
                ),
                "{} -> {:?}",
                claims,
                result
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_payload_raises() {
        let (service, _events) = service(MockTestCredentialStore::new(), hashing());

        let not_an_object = sign(&json!("just a string"));
        assert!(matches!(
            service.authenticate_token(&not_an_object),
            Err(AuthError::InvalidToken(TokenRejection::Malformed(_)))
        ));

        let wrong_types = sign(&json!({ "aud": "1", "exp": "tomorrow" }));
        assert!(matches!(
            service.authenticate_token(&wrong_types),
            Err(AuthError::InvalidToken(TokenRejection::Malformed(_)))
        ));

        let bad_audience = sign(&json!({ "aud": "alice", "exp": NOW + 60 }));
        assert!(matches!(
            service.authenticate_token(&bad_audience),
            Err(AuthError::InvalidToken(TokenRejection::InvalidAudience(aud))) if aud == "alice"
        ));
    }

    #[tokio::test]
    async fn test_bad_signature_raises_and_is_normalized() {
        let (service, events) = service(MockTestCredentialStore::new(), hashing());

        let forged = JwtEngine::new()
            .sign(
                TokenAlgorithm::HS256,
                &TokenPayload::new(1, NOW + 60),
                b"some_other_secret_of_sufficient_size",
            )
            .unwrap();

        assert!(matches!(
            service.authenticate_token(&forged),
            Err(AuthError::InvalidToken(TokenRejection::InvalidSignature))
        ));
        assert_eq!(
            events.names(),
            vec!["verify_token.fail", "authenticate_token.fail"]
        );

        let outcome = service
            .authenticate(AuthRequest::Token(forged))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AuthOutcome::Rejected(Rejection::InvalidToken(TokenRejection::InvalidSignature))
        );
        assert_eq!(events.names().last().copied(), Some("authenticate.fail"));
    }

    #[tokio::test]
    async fn test_unusable_key_is_fatal() {
        let mut engine = MockTestTokenEngine::new();
        engine
            .expect_verify()
            .times(1)
            .returning(|_, _, _| Err(JwtError::InvalidKey("bad pem".to_string())));
        engine.expect_decode().times(0);

        let events = Arc::new(InMemoryEventSink::new());
        let service = AuthService::new(
            Arc::new(MockTestCredentialStore::new()),
            Arc::new(hashing()),
            Arc::new(engine),
            Arc::clone(&events),
            token_config(),
        );

        let result = service
            .authenticate(AuthRequest::Token("a.b.c".to_string()))
            .await;

        assert!(matches!(result, Err(AuthError::TokenKey(_))));
        assert!(events.events().is_empty());
    }

    #[tokio::test]
    async fn test_signing_failure_is_fatal() {
        let hasher = hashing();
        let digest = hasher.hash("secret1").await.unwrap();

        let mut store = MockTestCredentialStore::new();
        store.expect_find_one().times(1).returning(move |_| {
            Ok(Some(CredentialRecord {
                identity: alice(),
                password_digest: digest.clone(),
            }))
        });

        let mut engine = MockTestTokenEngine::new();
        engine
            .expect_sign()
            .withf(|algorithm, payload, key| {
                *algorithm == TokenAlgorithm::HS256
                    && payload.aud.as_deref() == Some("1")
                    && key == SECRET
            })
            .times(1)
            .returning(|_, _, _| Err(JwtError::EncodingFailed("boom".to_string())));

        let service = AuthService::new(
            Arc::new(store),
            Arc::new(hasher),
            Arc::new(engine),
            Arc::new(InMemoryEventSink::new()),
            token_config(),
        );

        let result = service
            .authenticate(AuthRequest::Login(LoginInput::with_username(
                "alice", "secret1",
            )))
            .await;

        assert!(matches!(result, Err(AuthError::TokenSigning(_))));
    }

    #[tokio::test]
    async fn test_service_is_shareable_across_tasks() {
        let (service, _events) = service(MockTestCredentialStore::new(), hashing());
        let service = Arc::new(service);
        let token = service.generate_token(&alice()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                let token = token.clone();
                tokio::spawn(async move { service.authenticate(AuthRequest::Token(token)).await })
            })
            .collect();

        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            assert_eq!(outcome.session().map(|s| s.user_id()), Some(UserId(1)));
        }
    }
}
