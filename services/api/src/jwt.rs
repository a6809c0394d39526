//! JWT service for token generation and verification
//!
//! Access and refresh tokens are signed with *distinct* HS256 secrets, so
//! a process that can mint access tokens cannot forge refresh tokens. The
//! signed tokens produced here never leave the server; clients only ever
//! see the masked tokens stored alongside them in the session table.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{User, UserRole};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for signing and verifying access tokens
    pub access_secret: String,
    /// Secret for signing and verifying refresh tokens
    pub refresh_secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_ACCESS_SECRET`: Secret for access tokens (required)
    /// - `JWT_REFRESH_SECRET`: Secret for refresh tokens (required)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let access_secret = std::env::var("JWT_ACCESS_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_ACCESS_SECRET environment variable not set"))?;

        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_REFRESH_SECRET environment variable not set"))?;

        if access_secret == refresh_secret {
            anyhow::bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ");
        }

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string()) // 15 minutes
            .parse()
            .unwrap_or(900);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse()
            .unwrap_or(604800);

        Ok(JwtConfig {
            access_secret,
            refresh_secret,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Token type discriminator
    pub typ: TokenType,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// A freshly signed access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry of the refresh token; mirrored onto the session row
    pub refresh_expires_at: DateTime<Utc>,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let access_encoding = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding = DecodingKey::from_secret(config.refresh_secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
            validation,
            config,
        }
    }

    /// Generate a signed access/refresh pair for a verified user
    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair> {
        let now = Utc::now().timestamp() as u64;
        let refresh_exp = now + self.config.refresh_token_expiry;

        let access_claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            typ: TokenType::Access,
            iat: now,
            exp: now + self.config.access_token_expiry,
        };

        let refresh_claims = Claims {
            typ: TokenType::Refresh,
            exp: refresh_exp,
            ..access_claims.clone()
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_encoding)?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_encoding)?;

        let refresh_expires_at = Utc
            .timestamp_opt(refresh_exp as i64, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("refresh expiry out of range"))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Mint a new access token from the claims of a verified refresh token
    pub fn generate_access_token(&self, claims: &Claims) -> Result<String> {
        let now = Utc::now().timestamp() as u64;

        let access_claims = Claims {
            sub: claims.sub,
            email: claims.email.clone(),
            role: claims.role,
            typ: TokenType::Access,
            iat: now,
            exp: now + self.config.access_token_expiry,
        };

        let token = encode(&Header::default(), &access_claims, &self.access_encoding)?;
        Ok(token)
    }

    /// Verify an access token's signature and expiry, returning its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.access_decoding, &self.validation)?;
        if data.claims.typ != TokenType::Access {
            anyhow::bail!("token is not an access token");
        }
        Ok(data.claims)
    }

    /// Verify a refresh token's signature and expiry, returning its claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.refresh_decoding, &self.validation)?;
        if data.claims.typ != TokenType::Refresh {
            anyhow::bail!("token is not a refresh token");
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserRole, UserStatus};

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        })
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Mina".to_string(),
            email: "mina@example.com".to_string(),
            phone: None,
            password_hash: String::new(),
            role: UserRole::Photographer,
            is_active: true,
            is_email_verified: true,
            user_status: UserStatus::Active,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_pair_round_trips() {
        let service = test_service();
        let user = test_user();
        let pair = service.generate_token_pair(&user).unwrap();

        let access = service.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(access.sub, user.id);
        assert_eq!(access.role, UserRole::Photographer);
        assert_eq!(access.typ, TokenType::Access);

        let refresh = service.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user.id);
        assert_eq!(refresh.typ, TokenType::Refresh);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn secrets_are_not_interchangeable() {
        let service = test_service();
        let pair = service.generate_token_pair(&test_user()).unwrap();

        assert!(service.verify_access_token(&pair.refresh_token).is_err());
        assert!(service.verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service();
        let pair = service.generate_token_pair(&test_user()).unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.pop();
        tampered.push('x');
        assert!(service.verify_access_token(&tampered).is_err());
    }

    #[test]
    fn rotated_secret_invalidates_old_tokens() {
        let service = test_service();
        let pair = service.generate_token_pair(&test_user()).unwrap();

        let rotated = JwtService::new(JwtConfig {
            access_secret: "rotated-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        });
        assert!(rotated.verify_access_token(&pair.access_token).is_err());
        // The refresh secret did not rotate, so the refresh token survives
        assert!(rotated.verify_refresh_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = test_service();
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "old@example.com".to_string(),
            role: UserRole::Client,
            typ: TokenType::Access,
            iat: now - 4000,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-access-secret"),
        )
        .unwrap();
        assert!(service.verify_access_token(&token).is_err());
    }

    #[test]
    fn type_discriminator_is_enforced_per_secret() {
        // A refresh-typed token signed with the access secret must not pass
        // the access verifier even though its signature checks out.
        let service = test_service();
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "mina@example.com".to_string(),
            role: UserRole::Client,
            typ: TokenType::Refresh,
            iat: now,
            exp: now + 900,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-access-secret"),
        )
        .unwrap();
        assert!(service.verify_access_token(&token).is_err());
    }

    #[test]
    fn minted_access_token_preserves_identity() {
        let service = test_service();
        let user = test_user();
        let pair = service.generate_token_pair(&user).unwrap();
        let refresh_claims = service.verify_refresh_token(&pair.refresh_token).unwrap();

        let new_access = service.generate_access_token(&refresh_claims).unwrap();
        let claims = service.verify_access_token(&new_access).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, user.role);
        assert_eq!(claims.typ, TokenType::Access);
    }
}
