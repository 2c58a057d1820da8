use axum::http::StatusCode;

use super::ApiSuccess;

/// Tokens are stateless and self-expiring; there is nothing to invalidate
/// server-side. The endpoint exists so clients have a uniform flow.
pub async fn logout() -> ApiSuccess<()> {
    ApiSuccess::message(StatusCode::OK, "Logged out successfully")
}
