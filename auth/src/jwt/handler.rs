use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::tokens::TokenIdentity;

/// One JWT signing context: a secret bound to an issuer, an audience, and a
/// time-to-live. Uses HS256 (HMAC with SHA-256).
///
/// Verification enforces signature, issuer, audience, and expiry. A token
/// signed by a handler with a different secret or audience never verifies
/// here, which is what keeps access and refresh tokens non-interchangeable.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new signing context.
    ///
    /// # Arguments
    /// * `secret` - HMAC secret (at least 32 bytes for HS256)
    /// * `issuer` - value stamped into and required from the `iss` claim
    /// * `audience` - value stamped into and required from the `aud` claim
    /// * `ttl_days` - token lifetime in days
    pub fn new(secret: &[u8], issuer: &str, audience: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Build the claim set this handler would sign for an identity,
    /// stamping `iat` now and `exp` at now plus the configured lifetime.
    pub fn claims_for(&self, identity: &TokenIdentity) -> Claims {
        let now = Utc::now();

        Claims {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            role: identity.role.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        }
    }

    /// Sign an explicit claim set.
    ///
    /// # Errors
    /// * `EncodingFailed` - serialization or signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Issue a token for an identity.
    ///
    /// # Errors
    /// * `EncodingFailed` - serialization or signing failed
    pub fn issue(&self, identity: &TokenIdentity) -> Result<String, JwtError> {
        self.encode(&self.claims_for(identity))
    }

    /// Validate a token and return its claims.
    ///
    /// Checks signature, issuer, audience, expiry, and not-before.
    ///
    /// # Errors
    /// * `Expired` - `exp` is in the past
    /// * `NotYetValid` - `nbf` is in the future
    /// * `WrongAudience` / `WrongIssuer` - claim does not match this context
    /// * `InvalidSignature` - signature check failed
    /// * `Malformed` - structurally invalid or missing required claims
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_nbf = true;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::Expired,
                    ErrorKind::ImmatureSignature => JwtError::NotYetValid,
                    ErrorKind::InvalidAudience => JwtError::WrongAudience,
                    ErrorKind::InvalidIssuer => JwtError::WrongIssuer,
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    _ => JwtError::Malformed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
