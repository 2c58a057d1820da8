use serde::Deserialize;
use serde::Serialize;

/// Identity claim set carried by every issued token.
///
/// `sub` holds the user id; `aud` distinguishes the access and refresh
/// signing contexts. All fields are required - a token missing any of them
/// fails deserialization and therefore verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: user identifier
    pub sub: String,

    /// Email address at issuance time
    pub email: String,

    /// Role at issuance time
    pub role: String,

    /// Issuer
    pub iss: String,

    /// Audience ("access" or "refresh")
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Check expiry against a caller-supplied clock.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
