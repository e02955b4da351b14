//! Statement text for every operation
//!
//! Table and database names reach this module already validated by
//! `utils::is_valid_identifier` and are written unquoted, so the server folds
//! them to lower case. Column names come from `information_schema` and are
//! quoted verbatim. Values never appear in statement text: each one is a
//! placeholder cast to the column's underlying type. The cast never carries a
//! length modifier, so an oversized value is rejected on assignment instead of
//! being cut short by the cast.

use crate::schema::Column;
use crate::utils::quote_ident;

/// Tables in the `public` schema.
pub const LIST_TABLES: &str = "SELECT tablename::text FROM pg_catalog.pg_tables \
     WHERE schemaname = 'public' ORDER BY tablename";

/// Columns of one table, `$1` is the table name.
pub const TABLE_COLUMNS: &str = "SELECT column_name::text, data_type::text, udt_name::text \
     FROM information_schema.columns \
     WHERE table_schema = current_schema() AND table_name = lower($1) \
     ORDER BY ordinal_position";

/// Account lookup, `$1` username and `$2` password digest.
pub const ACCOUNT_LOOKUP: &str = "SELECT 1 FROM account WHERE username = $1 AND password = $2";

fn placeholder(index: usize, column: &Column) -> String {
    format!("${}::{}", index, column.udt_name)
}

/// Select the given columns rendered as text, keeping their names.
pub fn select_as_text(table: &str, columns: &[Column]) -> String {
    let list = columns
        .iter()
        .map(|c| {
            let quoted = quote_ident(&c.name);
            format!("{}::text AS {}", quoted, quoted)
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {} FROM {}", list, table)
}

/// Insert one row; with no columns every column takes its default.
pub fn insert(table: &str, columns: &[Column]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", table);
    }
    let names = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let values = columns
        .iter()
        .enumerate()
        .map(|(i, c)| placeholder(i + 1, c))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {} ({}) VALUES ({})", table, names, values)
}

pub fn update(table: &str, set: &Column, filter: &Column) -> String {
    format!(
        "UPDATE {} SET {} = {} WHERE {} = {}",
        table,
        quote_ident(&set.name),
        placeholder(1, set),
        quote_ident(&filter.name),
        placeholder(2, filter)
    )
}

pub fn delete(table: &str, filter: &Column) -> String {
    format!(
        "DELETE FROM {} WHERE {} = {}",
        table,
        quote_ident(&filter.name),
        placeholder(1, filter)
    )
}

/// Column definitions are passed through as typed by the operator.
pub fn create_table(table: &str, definitions: &[String]) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table,
        definitions.join(", ")
    )
}

pub fn truncate(table: &str) -> String {
    format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", table)
}

pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {} CASCADE", table)
}

pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE IF EXISTS {}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "integer", "int4"),
            Column::new("name", "character varying", "varchar"),
            Column::new("born", "date", "date"),
        ]
    }

    #[test]
    fn test_select_as_text() {
        assert_eq!(
            select_as_text("people", &columns()[..2]),
            "SELECT \"id\"::text AS \"id\", \"name\"::text AS \"name\" FROM people"
        );
    }

    #[test]
    fn test_insert_casts_placeholders() {
        assert_eq!(
            insert("people", &columns()[1..]),
            "INSERT INTO people (\"name\", \"born\") VALUES ($1::varchar, $2::date)"
        );
    }

    #[test]
    fn test_fixed_length_char_keeps_full_value() {
        // `$1::character` would mean character(1) and keep one letter
        let code = Column::new("code", "character", "bpchar");
        let statement = insert("codes", std::slice::from_ref(&code));
        assert_eq!(statement, "INSERT INTO codes (\"code\") VALUES ($1::bpchar)");
        assert!(!statement.contains("::character"));

        assert_eq!(
            delete("codes", &code),
            "DELETE FROM codes WHERE \"code\" = $1::bpchar"
        );
    }

    #[test]
    fn test_insert_without_columns() {
        assert_eq!(insert("people", &[]), "INSERT INTO people DEFAULT VALUES");
    }

    #[test]
    fn test_update_and_delete() {
        let cols = columns();
        assert_eq!(
            update("people", &cols[1], &cols[0]),
            "UPDATE people SET \"name\" = $1::varchar WHERE \"id\" = $2::int4"
        );
        assert_eq!(
            delete("people", &cols[2]),
            "DELETE FROM people WHERE \"born\" = $1::date"
        );
    }

    #[test]
    fn test_ddl() {
        assert_eq!(
            create_table("t", &["id serial PRIMARY KEY".to_string(), "name text".to_string()]),
            "CREATE TABLE IF NOT EXISTS t (id serial PRIMARY KEY, name text)"
        );
        assert_eq!(truncate("t"), "TRUNCATE TABLE t RESTART IDENTITY CASCADE");
        assert_eq!(drop_table("t"), "DROP TABLE IF EXISTS t CASCADE");
        assert_eq!(drop_database("d"), "DROP DATABASE IF EXISTS d");
    }
}
