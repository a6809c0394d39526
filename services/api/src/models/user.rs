//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role tag carried by every user; each user holds exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    Client,
    Photographer,
    MakeupArtist,
    Decorator,
    Venue,
    Caterer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Photographer => "photographer",
            UserRole::MakeupArtist => "makeupArtist",
            UserRole::Decorator => "decorator",
            UserRole::Venue => "venue",
            UserRole::Caterer => "caterer",
        }
    }

    /// Every role other than `client` offers services on the marketplace
    pub fn is_provider(&self) -> bool {
        !matches!(self, UserRole::Client)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(UserRole::Client),
            "photographer" => Ok(UserRole::Photographer),
            "makeupArtist" => Ok(UserRole::MakeupArtist),
            "decorator" => Ok(UserRole::Decorator),
            "venue" => Ok(UserRole::Venue),
            "caterer" => Ok(UserRole::Caterer),
            other => Err(format!("unknown user role '{other}'")),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall account status, distinct from the `is_active` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Approved,
    Active,
    Suspended,
    Rejected,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Approved => "approved",
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Rejected => "rejected",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UserStatus::Pending),
            "approved" => Ok(UserStatus::Approved),
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            "rejected" => Ok(UserStatus::Rejected),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(format!("unknown user status '{other}'")),
        }
    }
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub user_status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User representation safe to return to clients; never carries the
/// password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub user_status: UserStatus,
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        SafeUser {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            user_status: user.user_status,
        }
    }
}
