//! Session model and related functionality
//!
//! A session stores both the *actual* signed tokens (server-side only) and
//! the *masked* opaque tokens handed to clients. Only masked tokens ever
//! cross the wire; the actual tokens are looked up and verified on every
//! protected request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub access_token_actual: String,
    pub access_token_masked: String,
    pub refresh_token_actual: String,
    pub refresh_token_masked: String,
    pub session_data: Option<serde_json::Value>,
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New session creation payload
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub access_token_actual: String,
    pub access_token_masked: String,
    pub refresh_token_actual: String,
    pub refresh_token_masked: String,
    pub session_data: serde_json::Value,
    pub expires_at: DateTime<Utc>,
}

/// Free-form metadata captured at login time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub login_time: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl SessionMetadata {
    pub fn new(user_agent: Option<String>, ip_address: Option<String>) -> Self {
        SessionMetadata {
            login_time: Utc::now(),
            user_agent,
            ip_address,
        }
    }
}
