//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{AuthorizationId, UserId};
use platform::crypto::constant_time_eq;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    authorization::Authorization,
    credentials::Credentials,
    user::{NewAccount, User},
};
use crate::domain::repository::{
    AuthSessionRepository, AuthorizationRepository, CredentialsRepository, UserRepository,
};
use crate::domain::value_object::{
    email::Email,
    provider::{ExternalUid, ProviderName},
    public_id::PublicId,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A duplicate email on insert is a user-facing conflict, not a DB failure
fn map_email_conflict(err: sqlx::Error) -> AuthError {
    let is_email_conflict = err
        .as_database_error()
        .and_then(|db| db.constraint())
        .is_some_and(|constraint| constraint == USERS_EMAIL_CONSTRAINT);

    if is_email_conflict {
        AuthError::EmailTaken
    } else {
        AuthError::Database(err)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, account: &NewAccount) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;
        let user = &account.user;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, public_id, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(user.email.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_email_conflict)?;

        let credentials = &account.credentials;
        sqlx::query(
            r#"
            INSERT INTO user_credentials (user_id, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(credentials.user_id.as_uuid())
        .bind(credentials.password_hash.as_phc_string())
        .bind(credentials.created_at)
        .bind(credentials.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(authorization) = &account.authorization {
            insert_authorization(&mut *tx, authorization).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, public_id, email, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, public_id, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Credentials Repository Implementation
// ============================================================================

impl CredentialsRepository for PgAuthRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT user_id, password_hash, created_at, updated_at
            FROM user_credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialsRow::into_credentials).transpose()
    }
}

// ============================================================================
// Authorization Repository Implementation
// ============================================================================

async fn insert_authorization<'e, E>(executor: E, authorization: &Authorization) -> AuthResult<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO authorizations (authorization_id, user_id, provider, uid, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(authorization.authorization_id.as_uuid())
    .bind(authorization.user_id.as_uuid())
    .bind(authorization.provider.as_str())
    .bind(authorization.uid.as_str())
    .bind(authorization.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

impl AuthorizationRepository for PgAuthRepository {
    async fn find_by_identity(
        &self,
        provider: &ProviderName,
        uid: &ExternalUid,
    ) -> AuthResult<Option<Authorization>> {
        let row = sqlx::query_as::<_, AuthorizationRow>(
            r#"
            SELECT authorization_id, user_id, provider, uid, created_at
            FROM authorizations
            WHERE provider = $1 AND uid = $2
            "#,
        )
        .bind(provider.as_str())
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AuthorizationRow::into_authorization))
    }

    async fn create(&self, authorization: &Authorization) -> AuthResult<()> {
        insert_authorization(&self.pool, authorization).await
    }

    async fn list_by_user(&self, user_id: &UserId) -> AuthResult<Vec<Authorization>> {
        let rows = sqlx::query_as::<_, AuthorizationRow>(
            r#"
            SELECT authorization_id, user_id, provider, uid, created_at
            FROM authorizations
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AuthorizationRow::into_authorization).collect())
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

/// Column list shared by the insert and the lookup, in `AuthSessionRow` order
macro_rules! session_columns {
    () => {
        "session_id, user_id, public_id, expires_at_ms, remember_me, \
         client_fingerprint_hash, client_ip, user_agent, created_at, last_activity_at"
    };
}

impl AuthSessionRepository for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        let insert = concat!(
            "INSERT INTO auth_sessions (",
            session_columns!(),
            ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        sqlx::query(insert)
            .bind(session.session_id)
            .bind(session.user_id.as_uuid())
            .bind(session.public_id.as_str())
            .bind(session.expires_at_ms)
            .bind(session.remember_me)
            .bind(&session.client_fingerprint_hash)
            .bind(&session.client_ip)
            .bind(&session.user_agent)
            .bind(session.created_at)
            .bind(session.last_activity_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>> {
        let select = concat!(
            "SELECT ",
            session_columns!(),
            " FROM auth_sessions WHERE session_id = $1 AND expires_at_ms > $2"
        );
        let Some(row) = sqlx::query_as::<_, AuthSessionRow>(select)
            .bind(session_id)
            .bind(Utc::now().timestamp_millis())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        // A token replayed from another client
        if !constant_time_eq(&row.client_fingerprint_hash, fingerprint_hash) {
            tracing::warn!(%session_id, "Session presented with a different client fingerprint");
            return Err(AuthError::SessionFingerprintMismatch);
        }
        row.into_session().map(Some)
    }

    async fn update(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            "UPDATE auth_sessions SET expires_at_ms = $2, last_activity_at = $3 \
             WHERE session_id = $1",
        )
        .bind(session.session_id)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let purged = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms <= $1")
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(purged, "Purged expired sessions");
        Ok(purged)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn parse_public_id(raw: &str) -> AuthResult<PublicId> {
    PublicId::parse_str(raw).map_err(|e| AuthError::Internal(format!("Invalid public_id: {}", e)))
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id: parse_public_id(&self.public_id)?,
            email: Email::from_db(self.email),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    user_id: Uuid,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialsRow {
    fn into_credentials(self) -> AuthResult<Credentials> {
        Ok(Credentials {
            user_id: UserId::from_uuid(self.user_id),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AuthorizationRow {
    authorization_id: Uuid,
    user_id: Uuid,
    provider: String,
    uid: String,
    created_at: DateTime<Utc>,
}

impl AuthorizationRow {
    fn into_authorization(self) -> Authorization {
        Authorization {
            authorization_id: AuthorizationId::from_uuid(self.authorization_id),
            user_id: UserId::from_uuid(self.user_id),
            provider: ProviderName::from_db(self.provider),
            uid: ExternalUid::from_db(self.uid),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AuthSessionRow {
    session_id: Uuid,
    user_id: Uuid,
    public_id: String,
    expires_at_ms: i64,
    remember_me: bool,
    client_fingerprint_hash: Vec<u8>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl AuthSessionRow {
    fn into_session(self) -> AuthResult<AuthSession> {
        Ok(AuthSession {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            public_id: parse_public_id(&self.public_id)?,
            expires_at_ms: self.expires_at_ms,
            remember_me: self.remember_me,
            client_fingerprint_hash: self.client_fingerprint_hash,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        })
    }
}
