//! Identity token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying the account ID and an expiry. They are
//! never stored; verification is purely a signature and clock check.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::Claims;
use crate::error::AppError;
use crate::types::AccountId;

/// Secret used when none is configured.
pub const DEFAULT_SECRET: &str = "change-me-in-production";

/// Token signing configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// Symmetric signing secret.
    pub secret: String,
    /// Token lifetime in hours.
    pub expire_hours: i64,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[hidden]")
            .field("expire_hours", &self.expire_hours)
            .finish()
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expire_hours: 24,
        }
    }
}

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token signature or structure is invalid.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::Unauthorized("Token has expired".to_string()),
            JwtError::DecodingError(_) => {
                Self::Unauthorized("Invalid or malformed token".to_string())
            }
            JwtError::EncodingError(e) => Self::Internal(e),
        }
    }
}

/// Issues and verifies identity tokens.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service with the given configuration.
    #[must_use]
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        // An expiry in the past is always rejected.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issues a token for `account_id` that expires `expire_hours` from now.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if signing fails or the configured
    /// lifetime cannot be represented.
    pub fn issue(&self, account_id: AccountId) -> Result<String, JwtError> {
        let expires_at = Duration::try_hours(self.config.expire_hours)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                JwtError::EncodingError(format!(
                    "token lifetime of {} hours is out of range",
                    self.config.expire_hours
                ))
            })?;
        self.sign(&Claims::new(account_id, expires_at))
    }

    /// Signs an arbitrary claim set.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if signing fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired, and
    /// `JwtError::DecodingError` for a bad signature or malformed token.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the token lifetime in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.config.expire_hours.saturating_mul(3600)
    }

    /// Returns true if the service signs with the placeholder secret.
    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.config.secret == DEFAULT_SECRET
    }
}
