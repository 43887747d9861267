use std::fmt;

use sqlx::FromRow;
use time::OffsetDateTime;

use super::patch::Patch;

/// Row of the `users` table. Not serialized directly; the HTTP layer converts
/// it to a response type without the hash.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC string.
    pub hashed_password: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hash = if self.hashed_password.is_empty() {
            "<missing>"
        } else {
            "<redacted>"
        };
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("hashed_password", &hash)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields of a user about to be created; `password` is still plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Partial update of a user; `password` is still plaintext.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub id: i64,
    pub first_name: Patch<String>,
    pub last_name: Patch<String>,
    pub email: Patch<String>,
    pub password: Patch<String>,
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hashed_password: String,
}

/// `None` keeps the stored column value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub hashed_password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListUsersParams {
    pub limit: i64,
    pub offset: i64,
}
