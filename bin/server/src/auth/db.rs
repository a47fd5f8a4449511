//! Database repositories for sessions and school settings.
//!
//! The session store is the single owner of every persisted credential
//! record. Its read path enforces the TTL contract: an expired or
//! unparseable row is deleted and reported as absent, so callers never
//! see a stale or corrupt record.

use chalkline_platform_access::{Session, SessionId, StudentSession};
use chalkline_content::SchoolSettings;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};

/// Record kind for OAuth-authenticated sessions.
const KIND_USER: &str = "user";

/// Record kind for credential-based student sessions.
const KIND_STUDENT: &str = "student";

/// Row type for session queries.
#[derive(FromRow)]
struct SessionRow {
    id: String,
    payload: String,
    expires_at: DateTime<Utc>,
}

/// Repository for session records of both kinds.
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists an OAuth-authenticated session.
    pub async fn create_user(&self, session: &Session) -> Result<(), sqlx::Error> {
        let payload = serde_json::to_string(session).expect("serialize session");
        self.insert(
            session.id().as_str(),
            KIND_USER,
            &payload,
            session.created_at(),
            session.expires_at(),
        )
        .await
    }

    /// Persists a student session under a freshly generated record id.
    pub async fn create_student(
        &self,
        id: &SessionId,
        session: &StudentSession,
        ttl: Duration,
    ) -> Result<(), sqlx::Error> {
        let payload = serde_json::to_string(session).expect("serialize student session");
        let now = Utc::now();
        self.insert(id.as_str(), KIND_STUDENT, &payload, now, now + ttl)
            .await
    }

    async fn insert(
        &self,
        id: &str,
        kind: &str,
        payload: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, kind, payload, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(kind)
        .bind(payload)
        .bind(created_at)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds an OAuth session by ID.
    ///
    /// Expired rows, rows whose embedded token has expired, and rows that
    /// fail to parse are deleted and reported as absent.
    pub async fn find_user(&self, id: &SessionId) -> Result<Option<Session>, sqlx::Error> {
        let Some(row) = self.fetch(id, KIND_USER).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&row.payload) {
            Ok(session) if session.is_expired() => {
                self.delete(id).await?;
                Ok(None)
            }
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(session_id = %row.id, error = %e, "deleting malformed session record");
                self.delete(id).await?;
                Ok(None)
            }
        }
    }

    /// Finds a student session by ID, with the same absent-on-expiry and
    /// absent-on-corruption semantics as [`Self::find_user`].
    pub async fn find_student(
        &self,
        id: &SessionId,
    ) -> Result<Option<StudentSession>, sqlx::Error> {
        let Some(row) = self.fetch(id, KIND_STUDENT).await? else {
            return Ok(None);
        };

        match StudentSession::from_json(&row.payload) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(session_id = %row.id, error = %e, "deleting malformed student record");
                self.delete(id).await?;
                Ok(None)
            }
        }
    }

    async fn fetch(&self, id: &SessionId, kind: &str) -> Result<Option<SessionRow>, sqlx::Error> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, payload, expires_at
            FROM sessions
            WHERE id = $1 AND kind = $2
            "#,
        )
        .bind(id.as_str())
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if row.expires_at <= Utc::now() {
            self.delete(id).await?;
            return Ok(None);
        }

        Ok(Some(row))
    }

    /// Deletes a session by ID (logout).
    pub async fn delete(&self, id: &SessionId) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes expired sessions.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Row type for school settings queries.
#[derive(FromRow)]
struct SchoolSettingsRow {
    subdomain: String,
    payload: String,
}

/// Repository for admin-edited school settings, keyed by tenant subdomain.
pub struct SchoolSettingsRepository {
    pool: PgPool,
}

impl SchoolSettingsRepository {
    /// Creates a new school settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds the settings for a tenant. A malformed record is reported as
    /// absent rather than failing the page load.
    pub async fn find_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<SchoolSettings>, sqlx::Error> {
        let row: Option<SchoolSettingsRow> = sqlx::query_as(
            r#"
            SELECT subdomain, payload
            FROM school_settings
            WHERE subdomain = $1
            "#,
        )
        .bind(subdomain)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        match serde_json::from_str::<SchoolSettings>(&row.payload) {
            Ok(settings) => Ok(Some(settings)),
            Err(e) => {
                tracing::warn!(subdomain = %row.subdomain, error = %e, "ignoring malformed school settings");
                Ok(None)
            }
        }
    }

    /// Creates or replaces the settings for a tenant.
    pub async fn upsert(
        &self,
        subdomain: &str,
        settings: &SchoolSettings,
    ) -> Result<(), sqlx::Error> {
        let payload = serde_json::to_string(settings).expect("serialize school settings");

        sqlx::query(
            r#"
            INSERT INTO school_settings (subdomain, payload, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (subdomain)
            DO UPDATE SET payload = EXCLUDED.payload, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(subdomain)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Generates a unique session ID using ULID.
pub fn generate_session_id() -> SessionId {
    SessionId::new(ulid::Ulid::new().to_string())
}
