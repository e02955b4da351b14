//! Connection settings resolution and pool setup
//!
//! Precedence for every setting: command line, then environment, then the
//! config file, then the built-in default.

use crate::config;
use crate::config_file::Config;
use crate::constants::{
    CONNECT_TIMEOUT_SECS, ENV_DB_PASSWORD, ENV_DB_USER, ENV_SELECT_OUTPUT_FILE,
    ENV_TABLES_OUTPUT_FILE,
};
use anyhow::{Context, Result};
use log::info;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub output: Option<PathBuf>,
}

/// Values read from the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub select_output_file: Option<PathBuf>,
    pub tables_output_file: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            user: config::parse_db_user(),
            password: config::parse_db_password(),
            host: config::parse_host(),
            port: config::parse_port(),
            dbname: config::parse_db_name(),
            select_output_file: config::parse_select_output_file(),
            tables_output_file: config::parse_tables_output_file(),
        }
    }
}

/// Everything needed to open the connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    password: String,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ConnectionSettings {
    pub fn resolve(file: &Config, env: &EnvOverrides, cli: &CliOverrides) -> Result<Self> {
        let (user, password) = match (&env.user, &env.password) {
            (Some(user), Some(password)) => (user.clone(), password.clone()),
            _ => anyhow::bail!(
                "Environment variables {} or {} are not set.",
                ENV_DB_USER,
                ENV_DB_PASSWORD
            ),
        };

        let dbname = cli
            .dbname
            .clone()
            .or_else(|| env.dbname.clone())
            .unwrap_or_else(|| file.dbname.clone());
        if !crate::utils::is_valid_identifier(&dbname) {
            anyhow::bail!("Invalid database name: {}", dbname);
        }

        Ok(Self {
            host: cli
                .host
                .clone()
                .or_else(|| env.host.clone())
                .unwrap_or_else(|| file.host.clone()),
            port: cli.port.or(env.port).unwrap_or(file.port),
            dbname,
            user,
            password,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.dbname)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Open a pool holding the single connection this run uses.
pub async fn connect(settings: &ConnectionSettings) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .connect_with(settings.connect_options())
        .await
        .with_context(|| {
            format!(
                "Connection to Database failed: {}@{}:{}/{}",
                settings.user, settings.host, settings.port, settings.dbname
            )
        })?;

    info!(
        "Connected to {}:{}/{} as {}",
        settings.host, settings.port, settings.dbname, settings.user
    );
    Ok(pool)
}

/// Where rendered tables go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPaths {
    pub select: Option<PathBuf>,
    pub tables: Option<PathBuf>,
}

impl OutputPaths {
    /// `--output` replaces both paths for the current run.
    pub fn resolve(file: &Config, env: &EnvOverrides, cli: &CliOverrides) -> Self {
        Self {
            select: cli
                .output
                .clone()
                .or_else(|| env.select_output_file.clone())
                .or_else(|| file.select_output_file.clone()),
            tables: cli
                .output
                .clone()
                .or_else(|| env.tables_output_file.clone())
                .or_else(|| file.tables_output_file.clone()),
        }
    }

    pub fn select_path(&self) -> Result<PathBuf> {
        self.select.clone().with_context(|| {
            format!("Environment variable {} is not set.", ENV_SELECT_OUTPUT_FILE)
        })
    }

    pub fn tables_path(&self) -> Result<PathBuf> {
        self.tables.clone().with_context(|| {
            format!("Environment variable {} is not set.", ENV_TABLES_OUTPUT_FILE)
        })
    }
}
