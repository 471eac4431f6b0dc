// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access and refresh token issuance/verification (HS256 JWT).
//!
//! Tokens are self-contained; nothing is stored server-side. A token is only
//! ever invalidated by its own expiry. Refresh tokens are not rotated when
//! used, so a leaked refresh token stays usable until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Which of the two token flavors a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject
    pub username: String,
    /// Access or refresh
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Verification failure. Deliberately carries no reason: malformed, forged,
/// expired and wrong-kind tokens all look the same to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid or expired token")]
    Invalid,

    #[error("Failed to sign token")]
    Signing,
}

/// Issues and verifies tokens with the process-wide signing key.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(signing_key: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_signing_key,
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
        )
    }

    /// Access token lifetime in seconds (reported to clients as `expires_in`).
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    pub fn issue_access(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, TokenKind::Access, Utc::now())
    }

    pub fn issue_refresh(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, TokenKind::Refresh, Utc::now())
    }

    /// Sign a token of `kind` as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            username: subject.to_string(),
            kind,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "JWT encode failed");
            TokenError::Signing
        })
    }

    /// Verify signature, expiry and kind; return the subject.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            TokenError::Invalid
        })?;

        if data.claims.kind != expected {
            tracing::debug!(
                expected = ?expected,
                actual = ?data.claims.kind,
                "Token rejected: wrong kind"
            );
            return Err(TokenError::Invalid);
        }

        Ok(data.claims.username)
    }

    /// Mint a new access token from a valid refresh token.
    ///
    /// The refresh token itself is left untouched and stays valid.
    pub fn refresh(&self, refresh_token: &str) -> Result<(String, String), TokenError> {
        let subject = self.verify(refresh_token, TokenKind::Refresh)?;
        let access = self.issue_access(&subject)?;
        Ok((subject, access))
    }
}
