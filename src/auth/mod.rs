pub mod account;

use crate::digest;
use crate::prompt::{self, Prompt};
use anyhow::Result;

/// Hash a password for storage in, or lookup against, the `account` table
///
/// Unsalted single SHA-256, kept so digests already stored in `account`
/// keep matching.
pub fn hash_password(password: &str) -> String {
    digest::hash(password.as_bytes())
}

/// Verify if a password matches a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

/// Operator credentials with the password already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password_hash: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_hash: hash_password(password),
        }
    }

    /// Ask for a username and a hidden password.
    pub fn prompt(prompt: &mut dyn Prompt) -> Result<Self> {
        let username = prompt::read_required(prompt, "Enter Username: ", "Username")?;
        let password = prompt.read_password("Enter Password: ")?;
        Ok(Self::new(username.trim(), &password))
    }
}
