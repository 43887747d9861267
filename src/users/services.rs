use std::sync::Arc;

use async_trait::async_trait;

use super::{
    repo::{RepoError, UserRepository},
    repo_types::{ListUsersParams, NewUser, User, UserChanges},
};

/// What the HTTP layer can ask of the user store.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;
    async fn get_user_by_id(&self, id: i64) -> Result<User, RepoError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoError>;
    async fn list_users(&self, params: ListUsersParams) -> Result<Vec<User>, RepoError>;
    async fn update_user(&self, changes: UserChanges) -> Result<User, RepoError>;
    async fn delete_user(&self, id: i64) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct UserServiceImpl {
    repo: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        self.repo.create_user(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, RepoError> {
        self.repo.get_user_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoError> {
        self.repo.get_user_by_email(email).await
    }

    async fn list_users(&self, params: ListUsersParams) -> Result<Vec<User>, RepoError> {
        self.repo.list_users(params).await
    }

    async fn update_user(&self, changes: UserChanges) -> Result<User, RepoError> {
        self.repo.update_user(changes).await
    }

    async fn delete_user(&self, id: i64) -> Result<(), RepoError> {
        self.repo.delete_user(id).await
    }
}
