//! User model for the credential file.

use serde::{Deserialize, Serialize};

/// Registered user as stored in `users.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique, case-sensitive login name
    pub username: String,
    /// bcrypt hash of the password
    #[serde(rename = "password")]
    pub password_hash: String,
}
