use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

mod dto;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
mod password;
pub mod patch;
pub mod queries;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            post(handlers::create_user).get(handlers::list_users),
        )
        .route("/users/by-email", get(handlers::get_user_by_email))
        .route(
            "/users/:id",
            get(handlers::get_user_by_id)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
}
