use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthBody;
use super::FieldError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::Role;
use crate::domain::user::models::SignupCommand;
use crate::inbound::http::router::AppState;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    name: String,
    email: String,
    password: String,
    role: Option<String>,
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ApiError> {
        let mut details = Vec::new();

        let name = match PersonName::new(self.name) {
            Ok(name) => Some(name),
            Err(e) => {
                details.push(FieldError::new("name", e));
                None
            }
        };

        let email = match EmailAddress::new(self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                details.push(FieldError::new("email", e));
                None
            }
        };

        let password = match Password::new(self.password) {
            Ok(password) => Some(password),
            Err(e) => {
                details.push(FieldError::new("password", e));
                None
            }
        };

        let role = match self.role {
            None => Some(Role::default()),
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    details.push(FieldError::new("role", e));
                    None
                }
            },
        };

        match (name, email, password, role) {
            (Some(name), Some(email), Some(password), Some(role)) if details.is_empty() => {
                Ok(SignupCommand {
                    name,
                    email,
                    password,
                    role,
                })
            }
            _ => Err(ApiError::Validation(details)),
        }
    }
}

pub async fn signup<R: UserRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<SignupRequest>,
) -> Result<ApiSuccess<AuthBody>, ApiError> {
    let command = body.try_into_command()?;

    state
        .auth_service
        .signup(command)
        .await
        .map_err(ApiError::from)
        .map(|ref response| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User registered successfully",
                response.into(),
            )
        })
}
