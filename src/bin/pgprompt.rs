// pgprompt CLI - interactive PostgreSQL table operations
// Results of SELECT-style commands are written as ASCII tables to a file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use pgprompt::config_file::Config;
use pgprompt::connection::CliOverrides;
use pgprompt::constants::{
    DEFAULT_DB_NAME, DEFAULT_HOST, DEFAULT_PORT, ENV_DB_PASSWORD, ENV_DB_USER,
};
use pgprompt::digest::Sha256;
use pgprompt::prompt::{self, Prompt, Terminal};
use pgprompt::{auth, utils, PgPromptCore};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// Interactive PostgreSQL table utility with ASCII result output
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Interactive PostgreSQL table utility with ASCII result output",
    long_about = "Interactive PostgreSQL table utility with ASCII result output.

Values are prompted for column by column, typed by the column's declared type.
SELECT results are written as fixed-width ASCII tables to a file.

ENVIRONMENT:
  POSTGRE_SQL_ADMIN      Database user (required)
  POSTGRE_SQL_PASS       Database password (required)
  SELECT_OUTPUT_FILE     Output file for select
  TABLES_OUTPUT_FILE     Output file for tables
  PGPROMPT_HOST, PGPROMPT_PORT, PGPROMPT_DBNAME override the config file

PRIVILEGED COMMANDS:
  execute, create, truncate, drop and drop-database ask for a username and
  password that must match a row of the `account` table. Use `pgprompt hash`
  to compute the password digest stored there."
)]
struct Args {
    /// Database host (overrides PGPROMPT_HOST and config file)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Database port (overrides PGPROMPT_PORT and config file)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Database name (overrides PGPROMPT_DBNAME and config file)
    #[arg(long, global = true)]
    dbname: Option<String>,

    /// Output file for select and tables (overrides the *_OUTPUT_FILE variables)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tables of the public schema
    Tables,
    /// Write rows of a table to the select output file
    Select {
        table: Option<String>,
        /// Prompt for the columns to select instead of selecting all
        #[arg(long)]
        columns: bool,
    },
    /// Insert one row, prompting for each column
    Insert { table: Option<String> },
    /// Update rows matching one column value
    Update { table: Option<String> },
    /// Delete rows matching one column value
    Delete { table: Option<String> },
    /// Create a table from column definitions (privileged)
    Create { table: Option<String> },
    /// Empty a table and restart its identity columns (privileged)
    Truncate { table: Option<String> },
    /// Drop a table (privileged)
    Drop { table: Option<String> },
    /// Drop a database (privileged)
    DropDatabase { name: Option<String> },
    /// Run one SQL statement (privileged)
    Execute,
    /// Print the SHA-256 digest of text, a file, or a prompted password
    Hash {
        /// Text to hash
        #[arg(conflicts_with = "file")]
        text: Option<String>,
        /// File to hash
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Write the config file interactively
    Setup,
}

/// Helper function to prompt for a value with a default
fn prompt_with_default(prompt: &mut dyn Prompt, label: &str, default: &str) -> Result<String> {
    let input = prompt.read_line(&format!("{} (default: {}): ", label, default))?;
    let input = input.trim();
    Ok(if input.is_empty() {
        default.to_string()
    } else {
        input.to_string()
    })
}

/// Run interactive setup to write the config file
fn run_setup() -> Result<()> {
    println!("pgprompt Setup");
    println!("==============\n");

    let mut terminal = Terminal;
    let host = prompt_with_default(&mut terminal, "Database host", DEFAULT_HOST)?;
    let port = prompt_with_default(&mut terminal, "Database port", &DEFAULT_PORT.to_string())?;
    let port = port
        .parse::<u16>()
        .with_context(|| format!("Invalid port: {}", port))?;
    let dbname = prompt_with_default(&mut terminal, "Database name", DEFAULT_DB_NAME)?;

    let select_output = terminal.read_line("Select output file (empty to use SELECT_OUTPUT_FILE): ")?;
    let tables_output = terminal.read_line("Tables output file (empty to use TABLES_OUTPUT_FILE): ")?;

    let config = Config {
        host,
        port,
        dbname,
        select_output_file: Some(select_output.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
        tables_output_file: Some(tables_output.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
    };

    let path = config.save().context("Failed to save configuration")?;

    println!("\nConfiguration saved to: {}", path.display());
    println!(
        "Credentials are read from {} and {} at run time.",
        ENV_DB_USER, ENV_DB_PASSWORD
    );
    Ok(())
}

/// Print a digest; never touches the database
fn run_hash(text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let digest = match (text, file) {
        (Some(text), _) => auth::hash_password(&text),
        (None, Some(path)) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let mut reader = BufReader::new(file);
            let mut hasher = Sha256::new();
            let mut buf = [0u8; 8192];
            loop {
                let read = reader
                    .read(&mut buf)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                if read == 0 {
                    break;
                }
                hasher.update(&buf[..read]);
            }
            hasher.finalize_hex()
        }
        (None, None) => {
            let mut terminal = Terminal;
            let password = terminal.read_password("Enter password: ")?;
            let confirm = terminal.read_password("Confirm password: ")?;
            if password != confirm {
                anyhow::bail!("Error: Passwords do not match");
            }
            auth::hash_password(&password)
        }
    };

    println!("{}", digest);
    Ok(())
}

/// Use the name given on the command line, or ask for one
fn identifier_or_prompt(
    given: Option<String>,
    kind: &str,
    prompt: &mut dyn Prompt,
) -> Result<String> {
    match given {
        Some(name) if utils::is_valid_identifier(&name) => Ok(name),
        Some(name) => anyhow::bail!("Invalid {} name: {}", kind, name),
        None => prompt::read_identifier(prompt, kind),
    }
}

async fn run_command(core: &PgPromptCore, command: Command, prompt: &mut dyn Prompt) -> Result<()> {
    let handler = &core.handler;
    match command {
        Command::Tables => {
            let output = core.outputs.tables_path()?;
            handler.select_all_tables(&output, prompt).await
        }
        Command::Select { table, columns } => {
            let output = core.outputs.select_path()?;
            let table = identifier_or_prompt(table, "Table", prompt)?;
            if columns {
                handler.select_columns(&table, &output, prompt).await
            } else {
                handler.select_all(&table, &output, prompt).await
            }
        }
        Command::Insert { table } => {
            let table = identifier_or_prompt(table, "Table", prompt)?;
            handler.insert(&table, prompt).await
        }
        Command::Update { table } => {
            let table = identifier_or_prompt(table, "Table", prompt)?;
            handler.update(&table, prompt).await
        }
        Command::Delete { table } => {
            let table = identifier_or_prompt(table, "Table", prompt)?;
            handler.delete(&table, prompt).await
        }
        Command::Create { table } => {
            let table = identifier_or_prompt(table, "Table", prompt)?;
            handler.create_table(&table, prompt).await
        }
        Command::Truncate { table } => {
            let table = identifier_or_prompt(table, "Table", prompt)?;
            handler.truncate(&table, prompt).await
        }
        Command::Drop { table } => {
            let table = identifier_or_prompt(table, "Table", prompt)?;
            handler.drop_table(&table, prompt).await
        }
        Command::DropDatabase { name } => {
            let name = identifier_or_prompt(name, "Database", prompt)?;
            handler.drop_database(&name, prompt).await
        }
        Command::Execute => handler.execute(prompt).await,
        other @ (Command::Hash { .. } | Command::Setup) => {
            anyhow::bail!("{:?} does not use a database connection", other)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Commands that never connect
    let command = match args.command {
        Command::Setup => return run_setup(),
        Command::Hash { text, file } => return run_hash(text, file),
        command => command,
    };

    let config = Config::load().context("Failed to load configuration")?;
    debug!("Loaded configuration: {:?}", config);

    let cli = CliOverrides {
        host: args.host,
        port: args.port,
        dbname: args.dbname,
        output: args.output,
    };

    let core = PgPromptCore::connect(&config, &cli).await?;
    info!("Running {:?}", command);

    let mut terminal = Terminal;
    let result = run_command(&core, command, &mut terminal).await;

    core.shutdown().await;
    result
}
