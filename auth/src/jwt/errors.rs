use thiserror::Error;

/// Error type for JWT operations.
///
/// Verification failures are kept distinct so callers can log the precise
/// reason even when they surface a single generic "invalid token" upstream.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is not yet valid")]
    NotYetValid,

    #[error("Token audience does not match")]
    WrongAudience,

    #[error("Token issuer does not match")]
    WrongIssuer,
}
