//! Session repository for database operations
//!
//! Session rows are soft-deactivated (`is_active = false`) on logout,
//! revocation, or detected tampering; they are never deleted here. Expired
//! rows are simply excluded from lookups rather than swept.

use common::error::{DatabaseError, DatabaseResult};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{NewSession, Session};

fn session_from_row(row: &PgRow) -> Session {
    Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        access_token_actual: row.get("access_token_actual"),
        access_token_masked: row.get("access_token_masked"),
        refresh_token_actual: row.get("refresh_token_actual"),
        refresh_token_masked: row.get("refresh_token_masked"),
        session_data: row.get("session_data"),
        is_active: row.get("is_active"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SESSION_COLUMNS: &str = "id, user_id, access_token_actual, access_token_masked, \
     refresh_token_actual, refresh_token_masked, session_data, is_active, expires_at, \
     created_at, updated_at";

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new session row
    pub async fn create(&self, new_session: &NewSession) -> DatabaseResult<Session> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO sessions (user_id, access_token_actual, access_token_masked,
                                  refresh_token_actual, refresh_token_masked,
                                  session_data, is_active, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(new_session.user_id)
        .bind(&new_session.access_token_actual)
        .bind(&new_session.access_token_masked)
        .bind(&new_session.refresh_token_actual)
        .bind(&new_session.refresh_token_masked)
        .bind(&new_session.session_data)
        .bind(new_session.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(session_from_row(&row))
    }

    /// Find an active, unexpired session by its masked access token
    pub async fn find_active_by_access_token(
        &self,
        masked_token: &str,
    ) -> DatabaseResult<Option<Session>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM sessions
            WHERE access_token_masked = $1 AND is_active AND expires_at > now()
            "#
        ))
        .bind(masked_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(session_from_row))
    }

    /// Find an active, unexpired session by its masked refresh token
    pub async fn find_active_by_refresh_token(
        &self,
        masked_token: &str,
    ) -> DatabaseResult<Option<Session>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM sessions
            WHERE refresh_token_masked = $1 AND is_active AND expires_at > now()
            "#
        ))
        .bind(masked_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(session_from_row))
    }

    /// Replace the access-side actual/masked pair in place; the refresh
    /// side and the expiry are untouched
    pub async fn update_access_tokens(
        &self,
        id: Uuid,
        access_token_actual: &str,
        access_token_masked: &str,
    ) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions
            SET access_token_actual = $2, access_token_masked = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(access_token_actual)
        .bind(access_token_masked)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(())
    }

    /// Soft-deactivate one session by id
    pub async fn deactivate(&self, id: Uuid) -> DatabaseResult<()> {
        sqlx::query("UPDATE sessions SET is_active = FALSE, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(())
    }

    /// Soft-deactivate the active session holding a masked access token
    pub async fn deactivate_by_access_token(&self, masked_token: &str) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions
            SET is_active = FALSE, updated_at = now()
            WHERE access_token_masked = $1 AND is_active
            "#,
        )
        .bind(masked_token)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(())
    }

    /// Bulk soft-deactivate every active session for a user, returning the
    /// number of sessions revoked
    pub async fn deactivate_all_for_user(&self, user_id: Uuid) -> DatabaseResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET is_active = FALSE, updated_at = now()
            WHERE user_id = $1 AND is_active
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected())
    }
}
