//! Authentication building blocks
//!
//! Reusable authentication infrastructure for HTTP services:
//! - Password hashing (Argon2id)
//! - JWT issuance and validation with issuer/audience/expiry enforcement
//! - Paired access/refresh token handling with independent secrets
//!
//! The service crate owns the user domain; this crate only knows the shape
//! of an identity claim (`id`, `email`, `role` as strings).
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Access/Refresh Token Pair
//! ```
//! use auth::{TokenIdentity, TokenIssuer, TokenIssuerOptions};
//!
//! let issuer = TokenIssuer::new(TokenIssuerOptions {
//!     issuer: "account-service",
//!     access_secret: b"access_secret_at_least_32_bytes_!!",
//!     access_ttl_days: 60,
//!     refresh_secret: b"refresh_secret_at_least_32_bytes_!",
//!     refresh_ttl_days: 60,
//! });
//!
//! let identity = TokenIdentity {
//!     id: "user123".to_string(),
//!     email: "alice@example.com".to_string(),
//!     role: "user".to_string(),
//! };
//!
//! let pair = issuer.issue_pair(&identity).unwrap();
//! let claims = issuer.verify_access(&pair.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//!
//! // A refresh token is not an access token.
//! assert!(issuer.verify_access(&pair.refresh_token).is_err());
//! ```

pub mod jwt;
pub mod password;
pub mod tokens;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use tokens::TokenIdentity;
pub use tokens::TokenIssuer;
pub use tokens::TokenIssuerOptions;
pub use tokens::TokenPair;
