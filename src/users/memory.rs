//! In-memory `Querier` used by the repository and handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{
    queries::Querier,
    repo_types::{CreateUserParams, ListUsersParams, UpdateUserParams, User},
};

#[derive(Default)]
struct Table {
    rows: Vec<User>,
    next_id: i64,
    writes: usize,
}

#[derive(Clone, Default)]
pub struct MemoryQueries {
    table: Arc<Mutex<Table>>,
}

impl MemoryQueries {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw row, hash included.
    pub fn stored(&self, id: i64) -> Option<User> {
        let table = self.table.lock().unwrap();
        table.rows.iter().find(|u| u.id == id).cloned()
    }

    /// Number of insert/update/delete calls that reached the store.
    pub fn writes(&self) -> usize {
        self.table.lock().unwrap().writes
    }
}

fn unique_violation() -> sqlx::Error {
    sqlx::Error::Protocol(
        "duplicate key value violates unique constraint \"users_email_key\"".into(),
    )
}

#[async_trait]
impl Querier for MemoryQueries {
    async fn create_user(&self, arg: CreateUserParams) -> Result<User, sqlx::Error> {
        let mut table = self.table.lock().unwrap();
        table.writes += 1;
        if table.rows.iter().any(|u| u.email == arg.email) {
            return Err(unique_violation());
        }
        table.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: table.next_id,
            first_name: arg.first_name,
            last_name: arg.last_name,
            email: arg.email,
            hashed_password: arg.hashed_password,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, sqlx::Error> {
        self.stored(id).ok_or(sqlx::Error::RowNotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, sqlx::Error> {
        let table = self.table.lock().unwrap();
        table
            .rows
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn list_users(&self, arg: ListUsersParams) -> Result<Vec<User>, sqlx::Error> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .skip(arg.offset as usize)
            .take(arg.limit as usize)
            .cloned()
            .collect())
    }

    async fn update_user(&self, arg: UpdateUserParams) -> Result<User, sqlx::Error> {
        let mut table = self.table.lock().unwrap();
        table.writes += 1;
        if let Some(email) = &arg.email {
            if table.rows.iter().any(|u| &u.email == email && u.id != arg.id) {
                return Err(unique_violation());
            }
        }
        let user = table
            .rows
            .iter_mut()
            .find(|u| u.id == arg.id)
            .ok_or(sqlx::Error::RowNotFound)?;
        if let Some(v) = arg.first_name {
            user.first_name = v;
        }
        if let Some(v) = arg.last_name {
            user.last_name = v;
        }
        if let Some(v) = arg.email {
            user.email = v;
        }
        if let Some(v) = arg.hashed_password {
            user.hashed_password = v;
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), sqlx::Error> {
        let mut table = self.table.lock().unwrap();
        table.writes += 1;
        let before = table.rows.len();
        table.rows.retain(|u| u.id != id);
        if table.rows.len() == before {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
