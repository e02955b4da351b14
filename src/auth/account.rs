//! Credential lookup against the `account` table

use super::Credentials;
use crate::constants::ACCESS_DENIED;
use crate::prompt::Prompt;
use crate::sql;
use anyhow::{Context, Result};
use log::{info, warn};
use sqlx::PgPool;

/// Check that `credentials` match a row in `account`.
///
/// A failed lookup query is an error, never a grant.
pub async fn is_authorized(pool: &PgPool, credentials: &Credentials) -> Result<bool> {
    let row = sqlx::query(sql::ACCOUNT_LOOKUP)
        .bind(&credentials.username)
        .bind(&credentials.password_hash)
        .fetch_optional(pool)
        .await
        .context("Account lookup failed")?;

    Ok(row.is_some())
}

/// Turn the lookup result into the decision, telling the operator when denied.
pub fn decide(credentials: &Credentials, found: bool, prompt: &mut dyn Prompt) -> bool {
    if found {
        info!("Access granted to {}", credentials.username);
    } else {
        warn!("Access denied for {}", credentials.username);
        prompt.notify(ACCESS_DENIED);
    }
    found
}

/// Prompt for credentials and check them.
pub async fn authorize(pool: &PgPool, prompt: &mut dyn Prompt) -> Result<bool> {
    let credentials = Credentials::prompt(prompt)?;
    let found = is_authorized(pool, &credentials).await?;
    Ok(decide(&credentials, found, prompt))
}
