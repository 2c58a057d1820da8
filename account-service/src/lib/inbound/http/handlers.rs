use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod change_password;
pub mod delete_me;
pub mod delete_user;
pub mod get_me;
pub mod get_user;
pub mod health;
pub mod list_users;
pub mod login;
pub mod logout;
pub mod request_password_reset;
pub mod signup;
pub mod update_me;
pub mod update_user;

/// Whether internal error messages are exposed in responses.
///
/// Set once at router construction from the environment mode; production
/// keeps the sanitized default.
static EXPOSE_ERROR_DETAIL: OnceLock<bool> = OnceLock::new();

pub(crate) fn set_error_detail_exposure(expose: bool) {
    let _ = EXPOSE_ERROR_DETAIL.set(expose);
}

fn expose_error_detail() -> bool {
    *EXPOSE_ERROR_DETAIL.get().unwrap_or(&false)
}

/// Uniform response envelope: `status`, `message`, optional `data`,
/// optional field-level `details` on validation failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponseBody<T: Serialize> {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                status: "success",
                message: message.to_string(),
                data: Some(data),
                details: None,
            }),
        )
    }
}

impl ApiSuccess<()> {
    /// A success envelope with a message and no data payload.
    pub fn message(status: StatusCode, message: &str) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                status: "success",
                message: message.to_string(),
                data: None,
                details: None,
            }),
        )
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(Vec<FieldError>),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(details),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                let message = if expose_error_detail() {
                    msg
                } else {
                    "Something went wrong".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message, None)
            }
        };

        let body = ApiResponseBody::<()> {
            status: "error",
            message,
            data: None,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::WrongCurrentPassword => ApiError::BadRequest(err.to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidRole(_)
            | UserError::WeakPassword(_) => ApiError::BadRequest(err.to_string()),
            UserError::Password(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::Internal(err.to_string()),
        }
    }
}

/// Outward projection of a user. Deliberately has no place for the
/// password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserBody {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response data wrapping a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub user: UserBody,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self { user: user.into() }
    }
}

/// Response data for signup and login: the account plus both tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthBody {
    pub user: UserBody,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<&crate::user::ports::AuthResponse> for AuthBody {
    fn from(response: &crate::user::ports::AuthResponse) -> Self {
        Self {
            user: (&response.user).into(),
            access_token: response.tokens.access_token.clone(),
            refresh_token: response.tokens.refresh_token.clone(),
        }
    }
}
