use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

impl ChangePasswordRequest {
    fn try_into_command(self) -> Result<ChangePasswordCommand, ApiError> {
        let mut details = Vec::new();

        if self.current_password.is_empty() {
            details.push(FieldError::new(
                "current_password",
                "Current password is required",
            ));
        }

        // The new password goes through the same strength policy as signup.
        let new_password = match Password::new(self.new_password) {
            Ok(password) => Some(password),
            Err(e) => {
                details.push(FieldError::new("new_password", e));
                None
            }
        };

        match new_password {
            Some(new_password) if details.is_empty() => Ok(ChangePasswordCommand {
                current_password: self.current_password,
                new_password,
            }),
            _ => Err(ApiError::Validation(details)),
        }
    }
}

pub async fn change_password<R: UserRepository>(
    State(state): State<AppState<R>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let command = body.try_into_command()?;

    state
        .auth_service
        .change_password(&user.id, command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::message(
        StatusCode::OK,
        "Password changed successfully",
    ))
}
