use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Identity resolved by the access gate, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Mandatory authentication: reject the request unless a valid bearer
/// token resolves to an existing user.
///
/// Verification failures are logged with their precise reason but all
/// surface as 401 with a generic message.
pub async fn authenticate<R: UserRepository>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("Access denied. No token provided.".to_string()))?
        .to_string();

    let user = resolve_identity(&state, &token).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Optional authentication: attach an identity when a valid token is
/// present, proceed anonymously on any failure.
pub async fn authenticate_optional<R: UserRepository>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&req).map(str::to_string) {
        if let Ok(user) = resolve_identity(&state, &token).await {
            req.extensions_mut().insert(CurrentUser(user));
        }
    }

    next.run(req).await
}

/// Role check over an already-resolved identity. Pure; performs no I/O.
///
/// Must run after [`authenticate`]: a missing identity is a 401, a
/// present identity outside the permitted set is a 403.
pub async fn authorize(
    permitted: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match req.extensions().get::<CurrentUser>() {
        None => Err(ApiError::Unauthorized(
            "Access denied. Authentication required.".to_string(),
        )),
        Some(CurrentUser(user)) if !permitted.contains(&user.role) => Err(ApiError::Forbidden(
            "Access denied. Insufficient permissions.".to_string(),
        )),
        Some(_) => Ok(next.run(req).await),
    }
}

/// Pull the token out of the Authorization header. A `Bearer ` prefix is
/// expected but a bare token is tolerated.
fn bearer_token(req: &Request) -> Option<&str> {
    let value = req
        .headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    (!token.is_empty()).then_some(token)
}

async fn resolve_identity<R: UserRepository>(
    state: &AppState<R>,
    token: &str,
) -> Result<User, ApiError> {
    let claims = state.tokens.verify_access(token).map_err(|e| {
        tracing::warn!(reason = %e, "Token verification failed");
        ApiError::Unauthorized("Access denied. Invalid token.".to_string())
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(reason = %e, "Token subject is not a valid user id");
        ApiError::Unauthorized("Access denied. Invalid token.".to_string())
    })?;

    // A token can outlive its account; treat that as unauthenticated.
    match state.auth_service.get_user(&user_id).await {
        Ok(user) => Ok(user),
        Err(UserError::NotFound(_)) => Err(ApiError::Unauthorized(
            "Access denied. User not found.".to_string(),
        )),
        Err(e) => Err(ApiError::from(e)),
    }
}
