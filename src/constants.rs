//! Centralized constants for pgprompt
//!
//! This module contains the fixed values used throughout the application:
//! connection defaults, environment variable names, prompt tokens and the
//! characters used by the ASCII table renderer.

// ============================================================================
// CONNECTION DEFAULTS
// ============================================================================

/// Default database host when neither config file nor environment set one.
pub const DEFAULT_HOST: &str = "localhost";

/// Default PostgreSQL port.
/// Unit: TCP port
pub const DEFAULT_PORT: u16 = 5432;

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "working_project_db";

/// How long to wait for the single pooled connection.
/// Unit: seconds
/// Recommended range: 2-30 (local databases answer immediately)
pub const CONNECT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// ENVIRONMENT VARIABLES
// ============================================================================

/// Database user (required).
pub const ENV_DB_USER: &str = "POSTGRE_SQL_ADMIN";

/// Database password (required).
pub const ENV_DB_PASSWORD: &str = "POSTGRE_SQL_PASS";

/// Output file for SELECT results.
pub const ENV_SELECT_OUTPUT_FILE: &str = "SELECT_OUTPUT_FILE";

/// Output file for the table listing.
pub const ENV_TABLES_OUTPUT_FILE: &str = "TABLES_OUTPUT_FILE";

/// Host override.
pub const ENV_HOST: &str = "PGPROMPT_HOST";

/// Port override.
pub const ENV_PORT: &str = "PGPROMPT_PORT";

/// Database name override.
pub const ENV_DB_NAME: &str = "PGPROMPT_DBNAME";

// ============================================================================
// PROMPTS
// ============================================================================

/// Answer that ends a repeated prompt (column names, column definitions).
pub const ESCAPE_TOKEN: &str = "esc";

/// Column that is only inserted after explicit confirmation.
pub const ID_COLUMN_NAME: &str = "id";

/// Shown when a privileged operation is refused.
pub const ACCESS_DENIED: &str = "Access Denied. Not authorized.";

// ============================================================================
// TABLE RENDERING
// ============================================================================

/// Top and bottom border character.
pub const TABLE_ROW_SEPARATOR: char = '-';

/// Column boundary character.
pub const TABLE_COL_SEPARATOR: char = '|';

/// Fill character of the line between rows.
pub const BETWEEN_ROWS_SEPARATOR: char = '.';

/// Header of the single column in the table listing.
pub const TABLE_NAMES_COLUMN_TITLE: &str = "Table Name";

// ============================================================================
// FILE PERMISSIONS
// ============================================================================

/// Config file permissions (user read/write only).
/// Unit: Unix permission bits (octal)
pub const CONFIG_FILE_PERMISSIONS: u32 = 0o600;

/// Permission mask to check for group/other access.
/// Unit: Unix permission bits (octal)
pub const CONFIG_PERMISSION_MASK_GROUP_OTHER: u32 = 0o077;
