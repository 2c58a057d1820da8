use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Partial profile update. A password key anywhere in the payload is
/// rejected before any storage access; credential changes have their own
/// endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<serde_json::Value>,
}

impl UpdateProfileRequest {
    pub fn try_into_command(self) -> Result<UpdateProfileCommand, ApiError> {
        let mut details = Vec::new();

        if self.password.is_some() {
            details.push(FieldError::new(
                "password",
                "Password cannot be updated here. Use the change-password endpoint.",
            ));
        }

        let name = match self.name.map(PersonName::new).transpose() {
            Ok(name) => name,
            Err(e) => {
                details.push(FieldError::new("name", e));
                None
            }
        };

        let email = match self.email.map(EmailAddress::new).transpose() {
            Ok(email) => email,
            Err(e) => {
                details.push(FieldError::new("email", e));
                None
            }
        };

        let role = match self.role.as_deref().map(str::parse::<Role>).transpose() {
            Ok(role) => role,
            Err(e) => {
                details.push(FieldError::new("role", e));
                None
            }
        };

        if details.is_empty() {
            Ok(UpdateProfileCommand { name, email, role })
        } else {
            Err(ApiError::Validation(details))
        }
    }
}

pub async fn update_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let command = body.try_into_command()?;

    state
        .auth_service
        .update_profile(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, "User updated successfully", user.into()))
}
