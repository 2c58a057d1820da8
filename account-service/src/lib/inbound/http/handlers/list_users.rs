use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use super::UserBody;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::Role;
use crate::inbound::http::router::AppState;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    page: Option<u32>,
    limit: Option<u32>,
    role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListData {
    pub users: Vec<UserBody>,
    pub pagination: Pagination,
}

pub async fn list_users<R: UserRepository>(
    State(state): State<AppState<R>>,
    Query(params): Query<ListUsersParams>,
) -> Result<ApiSuccess<UserListData>, ApiError> {
    let role = params
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(|e| ApiError::Validation(vec![FieldError::new("role", e)]))?;

    let query = ListUsersQuery::new(params.page, params.limit, role);
    let page = query.page;
    let limit = query.page_size;

    let result = state
        .auth_service
        .list_users(query)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Users retrieved successfully",
        UserListData {
            users: result.items.iter().map(UserBody::from).collect(),
            pagination: Pagination {
                page,
                limit,
                total: result.total,
                pages: result.total.div_ceil(u64::from(limit)),
            },
        },
    ))
}
