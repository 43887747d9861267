use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{CreateUserParams, ListUsersParams, UpdateUserParams, User};

/// Typed access to the `users` table.
///
/// Lookups that match no row fail with `sqlx::Error::RowNotFound`, the same
/// signal `fetch_one` gives.
#[async_trait]
pub trait Querier: Send + Sync {
    async fn create_user(&self, arg: CreateUserParams) -> Result<User, sqlx::Error>;
    async fn get_user_by_id(&self, id: i64) -> Result<User, sqlx::Error>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, sqlx::Error>;
    async fn list_users(&self, arg: ListUsersParams) -> Result<Vec<User>, sqlx::Error>;
    async fn update_user(&self, arg: UpdateUserParams) -> Result<User, sqlx::Error>;
    async fn delete_user(&self, id: i64) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct Queries {
    db: PgPool,
}

impl Queries {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Querier for Queries {
    async fn create_user(&self, arg: CreateUserParams) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, hashed_password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email, hashed_password, created_at, updated_at
            "#,
        )
        .bind(arg.first_name)
        .bind(arg.last_name)
        .bind(arg.email)
        .bind(arg.hashed_password)
        .fetch_one(&self.db)
        .await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, hashed_password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, hashed_password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
    }

    async fn list_users(&self, arg: ListUsersParams) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, hashed_password, created_at, updated_at
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(arg.limit)
        .bind(arg.offset)
        .fetch_all(&self.db)
        .await
    }

    async fn update_user(&self, arg: UpdateUserParams) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET first_name      = COALESCE($2, first_name),
                   last_name       = COALESCE($3, last_name),
                   email           = COALESCE($4, email),
                   hashed_password = COALESCE($5, hashed_password),
                   updated_at      = now()
             WHERE id = $1
            RETURNING id, first_name, last_name, email, hashed_password, created_at, updated_at
            "#,
        )
        .bind(arg.id)
        .bind(arg.first_name)
        .bind(arg.last_name)
        .bind(arg.email)
        .bind(arg.hashed_password)
        .fetch_one(&self.db)
        .await
    }

    async fn delete_user(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i64>(r#"DELETE FROM users WHERE id = $1 RETURNING id"#)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}
