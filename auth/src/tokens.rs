use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Audience claim stamped into short-lived operational tokens.
pub const ACCESS_AUDIENCE: &str = "access";

/// Audience claim stamped into refresh tokens.
pub const REFRESH_AUDIENCE: &str = "refresh";

/// Identity facts embedded into issued tokens.
///
/// Plain strings so the service crate can map its own domain types in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub id: String,
    pub email: String,
    pub role: String,
}

/// An access/refresh token pair issued together at signup or login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Configuration for a [`TokenIssuer`].
pub struct TokenIssuerOptions<'a> {
    pub issuer: &'a str,
    pub access_secret: &'a [u8],
    pub access_ttl_days: i64,
    pub refresh_secret: &'a [u8],
    pub refresh_ttl_days: i64,
}

/// Issues and verifies the access/refresh token pair.
///
/// The two signing contexts use independent secrets and audiences, so a
/// leaked refresh token cannot be replayed where an access token is
/// expected, and vice versa.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
}

impl TokenIssuer {
    pub fn new(options: TokenIssuerOptions<'_>) -> Self {
        Self {
            access: JwtHandler::new(
                options.access_secret,
                options.issuer,
                ACCESS_AUDIENCE,
                options.access_ttl_days,
            ),
            refresh: JwtHandler::new(
                options.refresh_secret,
                options.issuer,
                REFRESH_AUDIENCE,
                options.refresh_ttl_days,
            ),
        }
    }

    /// Issue both tokens for an identity.
    ///
    /// # Errors
    /// * `EncodingFailed` - signing failed
    pub fn issue_pair(&self, identity: &TokenIdentity) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.access.issue(identity)?,
            refresh_token: self.refresh.issue(identity)?,
        })
    }

    /// Validate an access token.
    pub fn verify_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.access.verify(token)
    }

    /// Validate a refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        self.refresh.verify(token)
    }

    /// The access signing context, for callers that need to stamp custom
    /// claim sets (tests exercising expiry, primarily).
    pub fn access_handler(&self) -> &JwtHandler {
        &self.access
    }
}
