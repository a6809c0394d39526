//! Session management over the Postgres session store
//!
//! Clients never see the signed JWTs: every session row pairs each signed
//! token with an independently random masked token, and only the masked
//! values cross the wire. A leaked masked token is meaningless without a
//! live, unexpired session row naming it, and a compromised store cannot
//! mint new signatures.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::jwt::JwtService;
use crate::models::{NewSession, Session, SessionMetadata, User, UserStatus};
use crate::repositories::{SessionRepository, UserRepository};

/// Length of the opaque masked tokens handed to clients
const MASKED_TOKEN_LEN: usize = 32;

/// The masked token pair returned to a client after login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub session_id: Uuid,
}

/// Session manager: issues, resolves, refreshes, and revokes sessions
#[derive(Clone)]
pub struct SessionService {
    jwt_service: JwtService,
    sessions: SessionRepository,
    users: UserRepository,
}

impl SessionService {
    /// Create a new session service
    pub fn new(jwt_service: JwtService, sessions: SessionRepository, users: UserRepository) -> Self {
        Self {
            jwt_service,
            sessions,
            users,
        }
    }

    /// Authenticate credentials into a user plus a fresh session.
    ///
    /// Lookup misses and bad passwords both surface as `InvalidCredentials`
    /// so the response never reveals which half was wrong.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        metadata: SessionMetadata,
    ) -> ApiResult<(User, SessionTokens)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !self.users.verify_password(&user, password)? {
            return Err(ApiError::InvalidCredentials);
        }

        if !user.is_email_verified {
            return Err(ApiError::EmailNotVerified);
        }
        if !user.is_active || user.user_status != UserStatus::Active {
            return Err(ApiError::AccountDeactivated);
        }

        let tokens = self.create_session(&user, metadata).await?;
        self.users.update_last_login(user.id).await?;

        info!("user {} logged in, session {}", user.id, tokens.session_id);
        Ok((user, tokens))
    }

    /// Sign a token pair for a verified user and persist the session row,
    /// returning only the masked tokens
    pub async fn create_session(
        &self,
        user: &User,
        metadata: SessionMetadata,
    ) -> ApiResult<SessionTokens> {
        let pair = self.jwt_service.generate_token_pair(user).map_err(|e| {
            warn!("failed to sign token pair: {e}");
            ApiError::Internal
        })?;

        let session_data = serde_json::to_value(&metadata).map_err(|e| {
            warn!("failed to serialize session metadata: {e}");
            ApiError::Internal
        })?;

        let session = self
            .sessions
            .create(&NewSession {
                user_id: user.id,
                access_token_actual: pair.access_token,
                access_token_masked: generate_masked_token(),
                refresh_token_actual: pair.refresh_token,
                refresh_token_masked: generate_masked_token(),
                session_data,
                expires_at: pair.refresh_expires_at,
            })
            .await?;

        Ok(SessionTokens {
            access_token: session.access_token_masked,
            refresh_token: session.refresh_token_masked,
            session_id: session.id,
        })
    }

    /// Resolve a masked access token to its session and user.
    ///
    /// A session whose stored signed token no longer verifies (rotated
    /// secret, corrupted signature) is deactivated on the spot so it cannot
    /// be presented again.
    pub async fn resolve_access_token(&self, masked_token: &str) -> ApiResult<(User, Session)> {
        let session = self
            .sessions
            .find_active_by_access_token(masked_token)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        let claims = match self
            .jwt_service
            .verify_access_token(&session.access_token_actual)
        {
            Ok(claims) => claims,
            Err(e) => {
                warn!("session {} failed signature verification: {e}", session.id);
                self.sessions.deactivate(session.id).await?;
                return Err(ApiError::InvalidToken);
            }
        };

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        Ok((user, session))
    }

    /// Exchange a masked refresh token for a new masked access token.
    ///
    /// The refresh token itself is not rotated: it stays valid for repeated
    /// renewals until its own expiry or explicit revocation.
    pub async fn refresh_access_token(&self, masked_refresh_token: &str) -> ApiResult<String> {
        let session = self
            .sessions
            .find_active_by_refresh_token(masked_refresh_token)
            .await?
            .ok_or(ApiError::InvalidRefreshToken)?;

        let claims = self
            .jwt_service
            .verify_refresh_token(&session.refresh_token_actual)
            .map_err(|e| {
                warn!("session {} refresh token failed verification: {e}", session.id);
                ApiError::InvalidRefreshToken
            })?;

        let new_access_token = self.jwt_service.generate_access_token(&claims).map_err(|e| {
            warn!("failed to sign access token: {e}");
            ApiError::Internal
        })?;
        let new_masked_token = generate_masked_token();

        self.sessions
            .update_access_tokens(session.id, &new_access_token, &new_masked_token)
            .await?;

        info!("refreshed access token for session {}", session.id);
        Ok(new_masked_token)
    }

    /// Revoke the session holding a masked access token (logout)
    pub async fn revoke_session(&self, masked_token: &str) -> ApiResult<()> {
        self.sessions.deactivate_by_access_token(masked_token).await?;
        Ok(())
    }

    /// Revoke every active session for a user (logout-all, password reset)
    pub async fn revoke_all_user_sessions(&self, user_id: Uuid) -> ApiResult<u64> {
        let revoked = self.sessions.deactivate_all_for_user(user_id).await?;
        info!("revoked {revoked} sessions for user {user_id}");
        Ok(revoked)
    }
}

/// Generate an opaque random token, cryptographically unrelated to the
/// signed token it masks
fn generate_masked_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MASKED_TOKEN_LEN)
        .map(char::from)
        .collect()
}
