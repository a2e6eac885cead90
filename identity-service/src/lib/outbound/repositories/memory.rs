use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::errors::StoreError;
use crate::domain::identity::models::CredentialRecord;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LookupKey;
use crate::domain::identity::models::NewCredential;
use crate::domain::identity::models::UserId;
use crate::domain::identity::ports::CredentialStore;

/// Process-local credential store. Ids are assigned sequentially from 1.
///
/// Used when no database is configured and in tests. Contents are lost on
/// restart.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<Vec<CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError> {
        let mut records = self.records.write().await;

        let taken = records.iter().any(|r| {
            r.identity.username == credential.username || r.identity.email == credential.email
        });
        if taken {
            return Err(StoreError::AlreadyExists {
                username: credential.username,
                email: credential.email,
            });
        }

        let record = CredentialRecord {
            identity: Identity {
                id: UserId(records.len() as i64 + 1),
                username: credential.username,
                email: credential.email,
            },
            password_digest: credential.password_digest,
        };
        records.push(record.clone());

        Ok(record)
    }

    async fn find_one(&self, lookup: &LookupKey) -> Result<Option<CredentialRecord>, StoreError> {
        let records = self.records.read().await;

        let found = records.iter().find(|r| match lookup {
            LookupKey::Username(username) => r.identity.username == *username,
            LookupKey::Email(email) => r.identity.email == *email,
        });

        Ok(found.cloned())
    }
}
