use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{CreateUserRequest, EmailQuery, Pagination, UpdateUserRequest, UserResponse},
    repo::RepoError,
};
use crate::{error::ApiError, state::AppState};

fn invalid_payload(msg: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request(format!("Invalid request payload: {msg}"))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        warn!(id = raw, "invalid user id");
        ApiError::bad_request("Invalid user ID format")
    })
}

/// Not-found maps to 404; anything else is logged and hidden behind `msg`.
fn store_failure(e: RepoError, msg: &'static str) -> ApiError {
    match e {
        RepoError::NotFound => ApiError::not_found("User not found"),
        e => {
            if e.is_unique_violation() {
                warn!(error = %e, "unique constraint violated");
            }
            error!(error = %e, "{}", msg);
            ApiError::internal(msg)
        }
    }
}

/// POST /api/v1/users
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| invalid_payload(e.body_text()))?;
    let new_user = req.validate().map_err(|msg| {
        warn!(%msg, "create user rejected");
        invalid_payload(msg)
    })?;

    // Duplicate emails land here too and are reported as a server error.
    let user = state
        .users
        .create_user(new_user)
        .await
        .map_err(|e| store_failure(e, "Failed to create user"))?;

    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/:id
#[instrument(skip(state))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_id(&id)?;
    let user = state
        .users
        .get_user_by_id(id)
        .await
        .map_err(|e| store_failure(e, "Failed to retrieve user"))?;
    Ok(Json(user.into()))
}

/// GET /api/v1/users/by-email?email=
#[instrument(skip(state, query))]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let email = q.email.trim();
    if !super::dto::is_valid_email(email) {
        return Err(ApiError::bad_request("Invalid email"));
    }
    let user = state
        .users
        .get_user_by_email(email)
        .await
        .map_err(|e| store_failure(e, "Failed to retrieve user"))?;
    Ok(Json(user.into()))
}

/// GET /api/v1/users?limit=&offset=
#[instrument(skip(state, query))]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let Query(p) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let params = p.validate().map_err(ApiError::bad_request)?;
    let users = state
        .users
        .list_users(params)
        .await
        .map_err(|e| store_failure(e, "Failed to list users"))?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PATCH /api/v1/users/:id
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = payload.map_err(|e| invalid_payload(e.body_text()))?;
    let changes = req.validate(id).map_err(|msg| {
        warn!(%msg, user_id = id, "update user rejected");
        invalid_payload(msg)
    })?;

    let user = state
        .users
        .update_user(changes)
        .await
        .map_err(|e| store_failure(e, "Failed to update user"))?;

    info!(user_id = user.id, "user updated");
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/:id
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state
        .users
        .delete_user(id)
        .await
        .map_err(|e| store_failure(e, "Failed to delete user"))?;

    info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
