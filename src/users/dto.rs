use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{
    patch::Patch,
    repo_types::{ListUsersParams, NewUser, User, UserChanges},
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PAGE_SIZE: i64 = 100;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

fn check_name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), String> {
    if !is_valid_email(email) {
        return Err("email must be a valid email address".into());
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

/// Body of `POST /api/v1/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, String> {
        check_name("first_name", &self.first_name)?;
        check_name("last_name", &self.last_name)?;
        let email = normalize_email(&self.email);
        check_email(&email)?;
        check_password(&self.password)?;
        Ok(NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            password: self.password,
        })
    }
}

/// Body of `PATCH /api/v1/users/:id`. Missing keys are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Patch<String>,
    #[serde(default)]
    pub last_name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub password: Patch<String>,
}

impl UpdateUserRequest {
    /// Names and email may not be blanked; an empty password means "keep it".
    pub fn validate(self, id: i64) -> Result<UserChanges, String> {
        let first_name = required_patch("first_name", self.first_name)?;
        let last_name = required_patch("last_name", self.last_name)?;

        let email = match self.email {
            Patch::Empty => return Err("email is required".into()),
            Patch::Set(e) => {
                let e = normalize_email(&e);
                check_email(&e)?;
                Patch::Set(e)
            }
            Patch::Unset => Patch::Unset,
        };

        if let Patch::Set(p) = &self.password {
            check_password(p)?;
        }

        Ok(UserChanges {
            id,
            first_name,
            last_name,
            email,
            password: self.password,
        })
    }
}

fn required_patch(field: &str, value: Patch<String>) -> Result<Patch<String>, String> {
    match value {
        Patch::Empty => Err(format!("{field} is required")),
        Patch::Set(v) => {
            check_name(field, &v)?;
            Ok(Patch::Set(v))
        }
        Patch::Unset => Ok(Patch::Unset),
    }
}

/// Public view of a user; the password hash has no field here.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

impl Pagination {
    pub fn validate(self) -> Result<ListUsersParams, String> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.limit) {
            return Err(format!("limit must be between 1 and {MAX_PAGE_SIZE}"));
        }
        if self.offset < 0 {
            return Err("offset must not be negative".into());
        }
        Ok(ListUsersParams {
            limit: self.limit,
            offset: self.offset,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}
