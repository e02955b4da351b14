// Library interface for pgprompt
// This allows tests and the CLI binary to access the crate's functionality

pub mod auth;
pub mod config;
pub mod config_file;
pub mod connection;
pub mod constants;
pub mod digest;
pub mod handler;
pub mod prompt;
pub mod schema;
pub mod sql;
pub mod table;
pub mod utils;

use anyhow::{Context, Result};
use config_file::Config;
use connection::{CliOverrides, ConnectionSettings, EnvOverrides, OutputPaths};
use handler::DatabaseHandler;
use log::info;

/// Connected session shared by every CLI subcommand
pub struct PgPromptCore {
    pub handler: DatabaseHandler,
    pub outputs: OutputPaths,
}

impl PgPromptCore {
    /// Resolve settings from the config file, environment and command line,
    /// then open the connection.
    pub async fn connect(file: &Config, cli: &CliOverrides) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let settings = ConnectionSettings::resolve(file, &env, cli)?;
        let outputs = OutputPaths::resolve(file, &env, cli);

        let pool = connection::connect(&settings)
            .await
            .context("Failed to initialize pgprompt")?;

        Ok(Self {
            handler: DatabaseHandler::new(pool),
            outputs,
        })
    }

    /// Close the connection at the end of the run.
    pub async fn shutdown(self) {
        self.handler.close().await;
        info!("Connection closed");
    }
}
