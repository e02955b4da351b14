//! Table operations
//!
//! Each operation is split in two: a planner that only talks to the
//! [`Prompt`] (and is unit-tested with a script) and an executor on
//! [`DatabaseHandler`] that fetches column metadata, runs the plan and
//! reports the outcome.

use crate::auth::account;
use crate::constants::{ESCAPE_TOKEN, ID_COLUMN_NAME, TABLE_NAMES_COLUMN_TITLE};
use crate::prompt::{self, Prompt};
use crate::schema::{self, Column};
use crate::sql;
use crate::table::ResultTable;
use anyhow::{Context, Result};
use log::{debug, info};
use sqlx::{PgPool, Row};
use std::path::Path;

fn no_column_found(name: &str) -> String {
    format!("No column found with name {}.", name)
}

/// Values for one INSERT, parallel to `columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan {
    pub columns: Vec<Column>,
    pub values: Vec<String>,
}

/// One UPDATE ... SET col = value WHERE col = value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub set: Column,
    pub set_value: String,
    pub filter: Column,
    pub filter_value: String,
}

/// One DELETE ... WHERE col = value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub filter: Column,
    pub filter_value: String,
}

/// Ask for a value for every column. `id` is only included when confirmed.
///
/// Fails as soon as a column has a type the prompts cannot read.
pub fn plan_insert(columns: &[Column], prompt: &mut dyn Prompt) -> Result<InsertPlan> {
    let mut plan = InsertPlan {
        columns: Vec::with_capacity(columns.len()),
        values: Vec::with_capacity(columns.len()),
    };

    for column in columns {
        if column.name == ID_COLUMN_NAME
            && !prompt::confirm(prompt, "Enter whether id should be included: (y/n): ")?
        {
            prompt.notify("Id column is being skipped.");
            continue;
        }

        let value = prompt::read_column_value(prompt, column)?
            .context("INSERT failed: Cannot insert one or more of the values.")?;

        plan.columns.push(column.clone());
        plan.values.push(value);
    }

    Ok(plan)
}

/// Ask for a column by name and a value for it.
///
/// `Ok(None)` when no such column exists; an error when its type cannot be read.
fn read_column_and_value(
    columns: &[Column],
    prompt: &mut dyn Prompt,
    message: &str,
    failure: &'static str,
) -> Result<Option<(Column, String)>> {
    let name = prompt.read_line(message)?;
    let name = name.trim();

    let Some(column) = schema::find_column(columns, name) else {
        prompt.notify(&no_column_found(name));
        return Ok(None);
    };

    let value = prompt::read_column_value(prompt, column)?.context(failure)?;
    Ok(Some((column.clone(), value)))
}

pub fn plan_update(columns: &[Column], prompt: &mut dyn Prompt) -> Result<UpdatePlan> {
    const FAILURE: &str = "UPDATE failed: Cannot update one or more of the values.";

    let (set, set_value) = read_column_and_value(
        columns,
        prompt,
        "Enter the name of the Column you wish to update:",
        FAILURE,
    )?
    .context("UPDATE failed: unknown column")?;

    let (filter, filter_value) = read_column_and_value(
        columns,
        prompt,
        "Enter the name of the column for the WHERE clause:",
        FAILURE,
    )?
    .context("UPDATE failed: unknown column")?;

    Ok(UpdatePlan {
        set,
        set_value,
        filter,
        filter_value,
    })
}

/// `Ok(None)` when the operator names a column that does not exist.
pub fn plan_delete(columns: &[Column], prompt: &mut dyn Prompt) -> Result<Option<DeletePlan>> {
    let plan = read_column_and_value(
        columns,
        prompt,
        "Enter the name of the column by you wish to delete:",
        "DELETE failed: Cannot delete one or more of the values.",
    )?;

    Ok(plan.map(|(filter, filter_value)| DeletePlan {
        filter,
        filter_value,
    }))
}

/// Collect column names until the escape token, skipping unknown ones.
pub fn plan_select_columns(columns: &[Column], prompt: &mut dyn Prompt) -> Result<Vec<Column>> {
    let mut selected = Vec::new();

    loop {
        let name = prompt::read_identifier(prompt, "Column")?;
        if name == ESCAPE_TOKEN {
            break;
        }
        match schema::find_column(columns, &name) {
            Some(column) => selected.push(column.clone()),
            None => prompt.notify(&no_column_found(&name)),
        }
    }

    if selected.is_empty() {
        anyhow::bail!("SELECT failed: no columns selected.");
    }
    Ok(selected)
}

/// Runs operations against one connected database.
pub struct DatabaseHandler {
    pool: PgPool,
}

impl DatabaseHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Close the connection.
    pub async fn close(self) {
        self.pool.close().await;
    }

    async fn require_authorization(&self, prompt: &mut dyn Prompt) -> Result<()> {
        if !account::authorize(&self.pool, prompt).await? {
            anyhow::bail!("Not authorized.");
        }
        Ok(())
    }

    async fn fetch_table(&self, query: &str, columns: Vec<String>) -> Result<ResultTable> {
        debug!("Running: {}", query);
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .context("SELECT failed")?;

        let mut table = ResultTable::new(columns);
        for row in &rows {
            let cells = (0..row.len())
                .map(|i| row.try_get::<Option<String>, _>(i))
                .collect::<Result<Vec<_>, _>>()
                .context("SELECT failed: unreadable value")?;
            table.push_row(cells);
        }
        Ok(table)
    }

    async fn run_statement(&self, statement: &str, values: &[String]) -> Result<u64> {
        debug!("Running: {}", statement);
        let mut query = sqlx::query(statement);
        for value in values {
            query = query.bind(value.as_str());
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn run_raw(&self, statement: &str) -> Result<u64> {
        debug!("Running: {}", statement);
        let result = sqlx::raw_sql(statement).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    fn write_result(table: &ResultTable, output: &Path, prompt: &mut dyn Prompt) -> Result<()> {
        table.write_to(output)?;
        prompt.notify("SELECT operation was successful.");
        Ok(())
    }

    /// Write the names of all tables in `public` to `output`.
    pub async fn select_all_tables(&self, output: &Path, prompt: &mut dyn Prompt) -> Result<()> {
        let table = self
            .fetch_table(sql::LIST_TABLES, vec![TABLE_NAMES_COLUMN_TITLE.to_string()])
            .await?;
        Self::write_result(&table, output, prompt)
    }

    /// Write every column and row of `table` to `output`.
    pub async fn select_all(&self, table: &str, output: &Path, prompt: &mut dyn Prompt) -> Result<()> {
        let columns = schema::fetch_columns(&self.pool, table).await?;
        let names = columns.iter().map(|c| c.name.clone()).collect();
        let result = self
            .fetch_table(&sql::select_as_text(table, &columns), names)
            .await?;
        Self::write_result(&result, output, prompt)
    }

    /// Prompt for columns, then write those columns of `table` to `output`.
    pub async fn select_columns(
        &self,
        table: &str,
        output: &Path,
        prompt: &mut dyn Prompt,
    ) -> Result<()> {
        let columns = schema::fetch_columns(&self.pool, table).await?;
        let selected = plan_select_columns(&columns, prompt)?;
        let names = selected.iter().map(|c| c.name.clone()).collect();
        let result = self
            .fetch_table(&sql::select_as_text(table, &selected), names)
            .await?;
        Self::write_result(&result, output, prompt)
    }

    pub async fn insert(&self, table: &str, prompt: &mut dyn Prompt) -> Result<()> {
        let columns = schema::fetch_columns(&self.pool, table).await?;
        let plan = plan_insert(&columns, prompt)?;

        let rows = self
            .run_statement(&sql::insert(table, &plan.columns), &plan.values)
            .await
            .context("INSERT failed")?;

        info!("Inserted {} row(s) into {}", rows, table);
        prompt.notify("INSERT operation was successful.");
        Ok(())
    }

    pub async fn update(&self, table: &str, prompt: &mut dyn Prompt) -> Result<()> {
        let columns = schema::fetch_columns(&self.pool, table).await?;
        let plan = plan_update(&columns, prompt)?;

        let rows = self
            .run_statement(
                &sql::update(table, &plan.set, &plan.filter),
                &[plan.set_value, plan.filter_value],
            )
            .await
            .context("UPDATE failed")?;

        info!("Updated {} row(s) in {}", rows, table);
        prompt.notify(&format!("UPDATE operation was successful. {} row(s) updated.", rows));
        Ok(())
    }

    pub async fn delete(&self, table: &str, prompt: &mut dyn Prompt) -> Result<()> {
        let columns = schema::fetch_columns(&self.pool, table).await?;
        let Some(plan) = plan_delete(&columns, prompt)? else {
            return Ok(());
        };

        let rows = self
            .run_statement(&sql::delete(table, &plan.filter), &[plan.filter_value])
            .await
            .context("DELETE failed")?;

        info!("Deleted {} row(s) from {}", rows, table);
        prompt.notify(&format!("DELETE operation was successful. {} row(s) deleted.", rows));
        Ok(())
    }

    /// Run one operator-supplied statement after the credential check.
    pub async fn execute(&self, prompt: &mut dyn Prompt) -> Result<()> {
        self.require_authorization(prompt).await?;

        let statement = prompt::read_required(prompt, "Enter SQL query to be executed:", "query")?;
        self.run_raw(&statement)
            .await
            .context("CUSTOM QUERY failed")?;

        prompt.notify("CUSTOM QUERY operation was successful.");
        Ok(())
    }

    pub async fn create_table(&self, table: &str, prompt: &mut dyn Prompt) -> Result<()> {
        self.require_authorization(prompt).await?;

        let message = format!("Enter column definition line or '{}':", ESCAPE_TOKEN);
        let definitions = prompt::read_until_escape(prompt, &message)?;
        self.run_raw(&sql::create_table(table, &definitions))
            .await
            .context("CREATE TABLE failed")?;

        prompt.notify("CREATE TABLE operation was successful.");
        Ok(())
    }

    pub async fn truncate(&self, table: &str, prompt: &mut dyn Prompt) -> Result<()> {
        self.require_authorization(prompt).await?;

        self.run_raw(&sql::truncate(table))
            .await
            .context("TRUNCATE failed")?;

        prompt.notify("TRUNCATE operation was successful.");
        Ok(())
    }

    pub async fn drop_table(&self, table: &str, prompt: &mut dyn Prompt) -> Result<()> {
        self.require_authorization(prompt).await?;

        self.run_raw(&sql::drop_table(table))
            .await
            .context("DROP TABLE failed")?;

        prompt.notify("DROP TABLE operation was successful.");
        Ok(())
    }

    pub async fn drop_database(&self, name: &str, prompt: &mut dyn Prompt) -> Result<()> {
        self.require_authorization(prompt).await?;

        self.run_raw(&sql::drop_database(name))
            .await
            .context("DROP DATABASE failed")?;

        prompt.notify("DROP DATABASE operation was successful.");
        Ok(())
    }
}
