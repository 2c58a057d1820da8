use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthBody;
use super::FieldError;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut details = Vec::new();

        if let Err(e) = EmailAddress::new(self.email.clone()) {
            details.push(FieldError::new("email", e));
        }
        if self.password.is_empty() {
            details.push(FieldError::new("password", "Password is required"));
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(details))
        }
    }
}

pub async fn login<R: UserRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<AuthBody>, ApiError> {
    body.validate()?;

    state
        .auth_service
        .login(&body.email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|ref response| ApiSuccess::new(StatusCode::OK, "Login successful", response.into()))
}
