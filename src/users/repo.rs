use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use super::{
    password::hash_password,
    queries::Querier,
    repo_types::{CreateUserParams, ListUsersParams, NewUser, UpdateUserParams, User, UserChanges},
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("user not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            other => RepoError::Database(other),
        }
    }
}

impl RepoError {
    /// True when the store rejected a write because of a unique index.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            RepoError::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;
    async fn get_user_by_id(&self, id: i64) -> Result<User, RepoError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoError>;
    async fn list_users(&self, params: ListUsersParams) -> Result<Vec<User>, RepoError>;
    async fn update_user(&self, changes: UserChanges) -> Result<User, RepoError>;
    async fn delete_user(&self, id: i64) -> Result<(), RepoError>;
}

/// Repository over the query layer. Plaintext passwords are hashed here and
/// nowhere else.
#[derive(Clone)]
pub struct DbUserRepository {
    queries: Arc<dyn Querier>,
}

impl DbUserRepository {
    pub fn new(queries: Arc<dyn Querier>) -> Self {
        Self { queries }
    }
}

fn hash(plain: &str) -> Result<String, RepoError> {
    hash_password(plain).map_err(|e| {
        error!(error = %e, "argon2 hashing failed");
        RepoError::Hash(e.to_string())
    })
}

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let params = CreateUserParams {
            hashed_password: hash(&user.password)?,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        };
        Ok(self.queries.create_user(params).await?)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, RepoError> {
        Ok(self.queries.get_user_by_id(id).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoError> {
        Ok(self.queries.get_user_by_email(email).await?)
    }

    async fn list_users(&self, params: ListUsersParams) -> Result<Vec<User>, RepoError> {
        Ok(self.queries.list_users(params).await?)
    }

    async fn update_user(&self, changes: UserChanges) -> Result<User, RepoError> {
        let hashed_password = match changes.password.into_value() {
            Some(plain) => Some(hash(&plain)?),
            None => None,
        };
        debug!(
            user_id = changes.id,
            password_changed = hashed_password.is_some(),
            "updating user"
        );
        let params = UpdateUserParams {
            id: changes.id,
            first_name: changes.first_name.into_value(),
            last_name: changes.last_name.into_value(),
            email: changes.email.into_value(),
            hashed_password,
        };
        Ok(self.queries.update_user(params).await?)
    }

    async fn delete_user(&self, id: i64) -> Result<(), RepoError> {
        Ok(self.queries.delete_user(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{memory::MemoryQueries, password::password_matches, patch::Patch};
    use pretty_assertions::assert_eq;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "A".into(),
            last_name: "B".into(),
            email: email.into(),
            password: "longenough".into(),
        }
    }

    fn repo() -> (DbUserRepository, MemoryQueries) {
        let mem = MemoryQueries::new();
        (DbUserRepository::new(Arc::new(mem.clone())), mem)
    }

    #[tokio::test]
    async fn create_stores_a_hash_not_the_plaintext() {
        let (repo, mem) = repo();
        let user = repo.create_user(new_user("a@b.com")).await.unwrap();

        let stored = mem.stored(user.id).unwrap();
        assert_ne!(stored.hashed_password, "longenough");
        assert!(password_matches("longenough", &stored.hashed_password));
    }

    #[tokio::test]
    async fn missing_rows_become_not_found() {
        let (repo, _) = repo();
        assert!(matches!(repo.get_user_by_id(42).await, Err(RepoError::NotFound)));
        assert!(matches!(
            repo.get_user_by_email("nobody@example.com").await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(repo.delete_user(42).await, Err(RepoError::NotFound)));
        let changes = UserChanges {
            id: 42,
            ..Default::default()
        };
        assert!(matches!(repo.update_user(changes).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn empty_password_leaves_hash_untouched() {
        let (repo, mem) = repo();
        let user = repo.create_user(new_user("a@b.com")).await.unwrap();
        let before = mem.stored(user.id).unwrap().hashed_password;

        let updated = repo
            .update_user(UserChanges {
                id: user.id,
                last_name: Patch::Set("C".into()),
                password: Patch::Empty,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.last_name, "C");
        assert_eq!(updated.first_name, "A");
        assert_eq!(mem.stored(user.id).unwrap().hashed_password, before);
    }

    #[tokio::test]
    async fn new_password_is_rehashed() {
        let (repo, mem) = repo();
        let user = repo.create_user(new_user("a@b.com")).await.unwrap();

        repo.update_user(UserChanges {
            id: user.id,
            password: Patch::Set("another-secret".into()),
            ..Default::default()
        })
        .await
        .unwrap();

        let stored = mem.stored(user.id).unwrap().hashed_password;
        assert_ne!(stored, "another-secret");
        assert!(password_matches("another-secret", &stored));
        assert!(!password_matches("longenough", &stored));
    }

    #[tokio::test]
    async fn duplicate_email_surfaces_as_store_error() {
        let (repo, _) = repo();
        repo.create_user(new_user("a@b.com")).await.unwrap();
        let err = repo.create_user(new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Database(_)));
    }

    #[tokio::test]
    async fn list_pages_in_id_order() {
        let (repo, _) = repo();
        for i in 0..5 {
            repo.create_user(new_user(&format!("u{i}@example.com")))
                .await
                .unwrap();
        }
        let page = repo
            .list_users(ListUsersParams {
                limit: 2,
                offset: 1,
            })
            .await
            .unwrap();
        let emails: Vec<_> = page.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["u1@example.com", "u2@example.com"]);
    }
}
