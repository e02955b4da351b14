//! Configuration parsing from environment variables
//!
//! The database credentials only ever come from the environment. Connection
//! target and output paths may also come from the config file (see
//! config_file module); the variables here override it.
//!
//! Environment variables:
//! - POSTGRE_SQL_ADMIN: database user (required)
//! - POSTGRE_SQL_PASS: database password (required)
//! - SELECT_OUTPUT_FILE: output file for SELECT results
//! - TABLES_OUTPUT_FILE: output file for the table listing
//! - PGPROMPT_HOST, PGPROMPT_PORT, PGPROMPT_DBNAME: connection target overrides

use crate::constants::{
    ENV_DB_NAME, ENV_DB_PASSWORD, ENV_DB_USER, ENV_HOST, ENV_PORT, ENV_SELECT_OUTPUT_FILE,
    ENV_TABLES_OUTPUT_FILE,
};
use log::{debug, warn};
use std::env;
use std::path::PathBuf;

/// Read a variable, treating empty as unset.
fn non_empty_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        Ok(_) => {
            warn!("{} is set but empty. Ignoring.", name);
            None
        }
        Err(_) => {
            debug!("{} not set.", name);
            None
        }
    }
}

/// Parse the POSTGRE_SQL_ADMIN environment variable
pub fn parse_db_user() -> Option<String> {
    non_empty_var(ENV_DB_USER)
}

/// Parse the POSTGRE_SQL_PASS environment variable
///
/// The password may legitimately be whitespace, so only "unset" is rejected.
pub fn parse_db_password() -> Option<String> {
    env::var(ENV_DB_PASSWORD).ok()
}

/// Parse the SELECT_OUTPUT_FILE environment variable
pub fn parse_select_output_file() -> Option<PathBuf> {
    non_empty_var(ENV_SELECT_OUTPUT_FILE).map(PathBuf::from)
}

/// Parse the TABLES_OUTPUT_FILE environment variable
pub fn parse_tables_output_file() -> Option<PathBuf> {
    non_empty_var(ENV_TABLES_OUTPUT_FILE).map(PathBuf::from)
}

/// Parse the PGPROMPT_HOST environment variable
pub fn parse_host() -> Option<String> {
    non_empty_var(ENV_HOST)
}

/// Parse the PGPROMPT_DBNAME environment variable
pub fn parse_db_name() -> Option<String> {
    non_empty_var(ENV_DB_NAME)
}

/// Parse the PGPROMPT_PORT environment variable
///
/// Returns Some(port) for 1-65535, None if not set or invalid
pub fn parse_port() -> Option<u16> {
    let val = non_empty_var(ENV_PORT)?;
    match val.trim().parse::<u16>() {
        Ok(0) => {
            warn!("Invalid {}: 0. Using configured port.", ENV_PORT);
            None
        }
        Ok(port) => {
            debug!("Port set via environment variable: {}", port);
            Some(port)
        }
        Err(e) => {
            warn!("Failed to parse {}: {}. Using configured port.", ENV_PORT, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns distinct variables so parallel tests never race on one.

    #[test]
    fn test_parse_port() {
        env::set_var(ENV_PORT, "5432");
        assert_eq!(parse_port(), Some(5432), "Should accept 5432");

        env::set_var(ENV_PORT, "65535");
        assert_eq!(parse_port(), Some(65535), "Should accept 65535");

        env::set_var(ENV_PORT, " 6543 ");
        assert_eq!(parse_port(), Some(6543), "Should trim whitespace");

        for bad in ["0", "65536", "-1", "port", "54 32"] {
            env::set_var(ENV_PORT, bad);
            assert_eq!(parse_port(), None, "Should reject {:?}", bad);
        }

        env::remove_var(ENV_PORT);
        assert_eq!(parse_port(), None, "Should return None when not set");
    }

    #[test]
    fn test_output_files() {
        env::set_var(ENV_SELECT_OUTPUT_FILE, "/tmp/select.txt");
        assert_eq!(
            parse_select_output_file(),
            Some(PathBuf::from("/tmp/select.txt"))
        );

        env::set_var(ENV_SELECT_OUTPUT_FILE, "   ");
        assert_eq!(parse_select_output_file(), None, "Should ignore blank path");

        env::remove_var(ENV_SELECT_OUTPUT_FILE);
        assert_eq!(parse_select_output_file(), None);
    }

    #[test]
    fn test_credentials() {
        env::set_var(ENV_DB_USER, "admin");
        env::set_var(ENV_DB_PASSWORD, " ");
        assert_eq!(parse_db_user(), Some("admin".to_string()));
        assert_eq!(parse_db_password(), Some(" ".to_string()));

        env::remove_var(ENV_DB_USER);
        env::remove_var(ENV_DB_PASSWORD);
        assert_eq!(parse_db_user(), None);
        assert_eq!(parse_db_password(), None);
    }
}
