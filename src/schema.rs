//! Column metadata looked up from `information_schema`
//!
//! The declared type of each column decides how its value is prompted for.
//! Its underlying type name, without any length modifier, is the cast its
//! placeholder gets in statement text.

use crate::sql;
use anyhow::{Context, Result};
use log::debug;
use sqlx::{PgPool, Row};

/// Value kinds the prompts know how to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// varchar, char, text
    Text,
    SmallInt,
    Integer,
    BigInt,
    /// numeric, decimal, real, double precision
    Numeric,
    Date,
    /// Anything else, carrying the server's type name
    Unsupported(String),
}

impl ColumnType {
    /// Map an `information_schema.columns.data_type` value.
    pub fn from_data_type(data_type: &str) -> Self {
        match data_type {
            "character varying" | "character" | "text" => ColumnType::Text,
            "smallint" => ColumnType::SmallInt,
            "integer" => ColumnType::Integer,
            "bigint" => ColumnType::BigInt,
            "numeric" | "real" | "double precision" => ColumnType::Numeric,
            "date" => ColumnType::Date,
            other => ColumnType::Unsupported(other.to_string()),
        }
    }

    /// Label used in "Invalid ... value entered." messages.
    pub fn label(&self) -> &str {
        match self {
            ColumnType::Text => "VARCHAR",
            ColumnType::SmallInt => "INT2",
            ColumnType::Integer => "INT4",
            ColumnType::BigInt => "INT8",
            ColumnType::Numeric => "DECIMAL/NUMERIC",
            ColumnType::Date => "DATE",
            ColumnType::Unsupported(name) => name,
        }
    }

    /// Validate and normalize raw input, `None` when it is not acceptable.
    pub fn parse_input(&self, raw: &str) -> Option<String> {
        match self {
            ColumnType::Text => (!raw.is_empty()).then(|| raw.to_string()),
            ColumnType::SmallInt => raw.trim().parse::<i16>().ok().map(|v| v.to_string()),
            ColumnType::Integer => raw.trim().parse::<i32>().ok().map(|v| v.to_string()),
            ColumnType::BigInt => raw.trim().parse::<i64>().ok().map(|v| v.to_string()),
            ColumnType::Numeric => {
                let trimmed = raw.trim();
                crate::utils::is_numeric_literal(trimmed).then(|| trimmed.to_string())
            }
            ColumnType::Date => {
                let trimmed = raw.trim();
                crate::utils::is_sql_date(trimmed).then(|| trimmed.to_string())
            }
            ColumnType::Unsupported(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ColumnType::Unsupported(_))
    }
}

/// One column of a table, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// `information_schema` type name, e.g. `character varying`
    pub data_type: String,
    /// Underlying type name, e.g. `varchar`, used for placeholder casts.
    /// `character` alone means `character(1)`, `bpchar` keeps any length.
    pub udt_name: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        udt_name: impl Into<String>,
    ) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            kind: ColumnType::from_data_type(&data_type),
            data_type,
            udt_name: udt_name.into(),
        }
    }
}

/// Find a column by exact name.
pub fn find_column<'a>(columns: &'a [Column], name: &str) -> Option<&'a Column> {
    columns.iter().find(|c| c.name == name)
}

/// Fetch the columns of `table` from the current schema.
///
/// Unquoted names fold to lower case on the server, so the lookup does too.
/// Fails when the table has no columns (does not exist).
pub async fn fetch_columns(pool: &PgPool, table: &str) -> Result<Vec<Column>> {
    let rows = sqlx::query(sql::TABLE_COLUMNS)
        .bind(table)
        .fetch_all(pool)
        .await
        .with_context(|| format!("Failed to read columns of {}", table))?;

    let columns = rows
        .iter()
        .map(|row| -> Result<Column> {
            let name: String = row.try_get(0)?;
            let data_type: String = row.try_get(1)?;
            let udt_name: String = row.try_get(2)?;
            Ok(Column::new(name, data_type, udt_name))
        })
        .collect::<Result<Vec<_>>>()?;

    if columns.is_empty() {
        anyhow::bail!("No table found with name {}.", table);
    }

    debug!("{} has {} columns", table, columns.len());
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_type() {
        assert_eq!(ColumnType::from_data_type("character varying"), ColumnType::Text);
        assert_eq!(ColumnType::from_data_type("text"), ColumnType::Text);
        assert_eq!(ColumnType::from_data_type("integer"), ColumnType::Integer);
        assert_eq!(ColumnType::from_data_type("numeric"), ColumnType::Numeric);
        assert_eq!(ColumnType::from_data_type("date"), ColumnType::Date);
        assert_eq!(
            ColumnType::from_data_type("jsonb"),
            ColumnType::Unsupported("jsonb".to_string())
        );
    }

    #[test]
    fn test_parse_integer_ranges() {
        assert_eq!(ColumnType::Integer.parse_input(" 42 "), Some("42".to_string()));
        assert_eq!(ColumnType::Integer.parse_input("-7"), Some("-7".to_string()));
        assert_eq!(ColumnType::Integer.parse_input("2147483648"), None);
        assert_eq!(ColumnType::SmallInt.parse_input("40000"), None);
        assert_eq!(
            ColumnType::BigInt.parse_input("2147483648"),
            Some("2147483648".to_string())
        );
        assert_eq!(ColumnType::Integer.parse_input("4.5"), None);
        assert_eq!(ColumnType::Integer.parse_input("abc"), None);
    }

    #[test]
    fn test_parse_numeric_keeps_digits() {
        assert_eq!(
            ColumnType::Numeric.parse_input("19.990"),
            Some("19.990".to_string())
        );
        assert_eq!(ColumnType::Numeric.parse_input("NaN"), None);
        assert_eq!(ColumnType::Numeric.parse_input("inf"), None);
        assert_eq!(ColumnType::Numeric.parse_input("1,5"), None);
        assert_eq!(
            ColumnType::Numeric.parse_input(" 1e400 "),
            Some("1e400".to_string())
        );
        assert_eq!(
            ColumnType::Numeric.parse_input("123456789012345678901234567890.5"),
            Some("123456789012345678901234567890.5".to_string())
        );
    }

    #[test]
    fn test_parse_text_and_date() {
        assert_eq!(ColumnType::Text.parse_input(""), None);
        assert_eq!(
            ColumnType::Text.parse_input("O'Brien"),
            Some("O'Brien".to_string())
        );
        assert_eq!(
            ColumnType::Date.parse_input("2024-01-31"),
            Some("2024-01-31".to_string())
        );
        assert_eq!(ColumnType::Date.parse_input("31-01-2024"), None);
    }

    #[test]
    fn test_unsupported_never_parses() {
        let kind = ColumnType::Unsupported("bytea".to_string());
        assert!(!kind.is_supported());
        assert_eq!(kind.parse_input("anything"), None);
        assert_eq!(kind.label(), "bytea");
    }

    #[test]
    fn test_find_column() {
        let columns = vec![
            Column::new("id", "integer", "int4"),
            Column::new("name", "text", "text"),
        ];
        assert_eq!(find_column(&columns, "name").map(|c| &c.kind), Some(&ColumnType::Text));
        assert!(find_column(&columns, "Name").is_none());
    }
}
