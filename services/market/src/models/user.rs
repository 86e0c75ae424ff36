//! User model and related functionality

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub password_hash: String,
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub password_hash: String,
}

/// User registration request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Login credentials, shared by both account kinds
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginCredentials {
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub phone: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone.clone(),
        }
    }
}
