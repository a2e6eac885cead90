use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::identity::errors::StoreError;
use crate::domain::identity::models::CredentialRecord;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LookupKey;
use crate::domain::identity::models::NewCredential;
use crate::domain::identity::models::UserId;
use crate::domain::identity::ports::CredentialStore;

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    username: String,
    email: String,
    password_digest: String,
}

impl From<CredentialRow> for CredentialRecord {
    fn from(row: CredentialRow) -> Self {
        Self {
            identity: Identity {
                id: UserId(row.id),
                username: row.username,
                email: row.email,
            },
            password_digest: row.password_digest,
        }
    }
}

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            INSERT INTO credentials (username, email, password_digest)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_digest
            "#,
        )
        .bind(&credential.username)
        .bind(&credential.email)
        .bind(&credential.password_digest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::AlreadyExists {
                        username: credential.username.clone(),
                        email: credential.email.clone(),
                    };
                }
            }
            StoreError::Database(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn find_one(&self, lookup: &LookupKey) -> Result<Option<CredentialRecord>, StoreError> {
        let (query, value) = match lookup {
            LookupKey::Username(username) => (
                r#"
                SELECT id, username, email, password_digest
                FROM credentials
                WHERE username = $1
                "#,
                username,
            ),
            LookupKey::Email(email) => (
                r#"
                SELECT id, username, email, password_digest
                FROM credentials
                WHERE email = $1
                "#,
                email,
            ),
        };

        let row = sqlx::query_as::<_, CredentialRow>(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(CredentialRecord::from))
    }
}
