use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    email: String,
}

/// The response is the same whether or not the email is registered.
pub async fn request_password_reset<R: UserRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let email = EmailAddress::new(body.email)
        .map_err(|e| ApiError::Validation(vec![FieldError::new("email", e)]))?;

    state
        .auth_service
        .request_password_reset(email.as_str())
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::message(
        StatusCode::OK,
        "If the email exists, a password reset link has been sent",
    ))
}
