use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers;
use super::handlers::set_error_detail_exposure;
use super::middleware::authenticate;
use super::middleware::authorize;
use crate::domain::user::models::Role;
use crate::domain::user::service::AuthService;
use crate::user::ports::UserRepository;

pub struct AppState<R: UserRepository> {
    pub auth_service: Arc<AuthService<R>>,
    pub tokens: Arc<TokenIssuer>,
}

// Manual impl: Arc clones regardless of whether R itself is Clone.
impl<R: UserRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];

pub fn create_router<R: UserRepository>(
    auth_service: Arc<AuthService<R>>,
    tokens: Arc<TokenIssuer>,
    expose_error_detail: bool,
) -> Router {
    set_error_detail_exposure(expose_error_detail);

    let state = AppState {
        auth_service,
        tokens,
    };

    let public_routes = Router::new()
        .route("/auth/signup", post(handlers::signup::signup::<R>))
        .route("/auth/login", post(handlers::login::login::<R>))
        .route(
            "/auth/password-reset-request",
            post(handlers::request_password_reset::request_password_reset::<R>),
        )
        .route("/health", get(handlers::health::health));

    let account_routes = Router::new()
        .route(
            "/auth/me",
            get(handlers::get_me::get_me::<R>)
                .patch(handlers::update_me::update_me::<R>)
                .delete(handlers::delete_me::delete_me::<R>),
        )
        .route(
            "/auth/change-password",
            patch(handlers::change_password::change_password::<R>),
        )
        .route("/auth/logout", post(handlers::logout::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<R>,
        ));

    // Layer order matters: authenticate is mounted last so it runs first,
    // and authorize only ever sees an already-resolved identity.
    let admin_routes = Router::new()
        .route("/auth/users", get(handlers::list_users::list_users::<R>))
        .route(
            "/auth/users/:id",
            get(handlers::get_user::get_user::<R>)
                .patch(handlers::update_user::update_user::<R>)
                .delete(handlers::delete_user::delete_user::<R>),
        )
        .route_layer(middleware::from_fn(|req, next| {
            authorize(ADMIN_ONLY, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<R>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(account_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
