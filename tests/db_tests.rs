//! Tests against a live PostgreSQL server
//!
//! Skipped unless `DATABASE_URL` points at a database the tests may create
//! and drop tables in.

mod common;

use common::ScriptedPrompt;
use pgprompt::auth::{self, account, Credentials};
use pgprompt::handler::DatabaseHandler;
use pgprompt::{schema, sql};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// One-connection pool, so temporary tables stay visible to every query.
async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to DATABASE_URL");
    Some(pool)
}

/// A temporary `account` table holding `admin` / `secret`.
async fn create_accounts(pool: &PgPool) {
    sqlx::query("CREATE TEMP TABLE account (username text, password text)")
        .execute(pool)
        .await
        .expect("Failed to create account table");
    sqlx::query("INSERT INTO account VALUES ($1, $2)")
        .bind("admin")
        .bind(auth::hash_password("secret"))
        .execute(pool)
        .await
        .expect("Failed to insert account");
}

async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT count(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

#[tokio::test]
async fn test_account_lookup() {
    let Some(pool) = test_pool().await else { return };
    create_accounts(&pool).await;

    let granted = Credentials::new("admin", "secret");
    assert!(account::is_authorized(&pool, &granted).await.unwrap());

    let wrong_password = Credentials::new("admin", "Secret");
    assert!(!account::is_authorized(&pool, &wrong_password).await.unwrap());

    let mut prompt = ScriptedPrompt::new(["nobody", "secret"]);
    assert!(!account::authorize(&pool, &mut prompt).await.unwrap());
    assert!(prompt
        .transcript
        .contains(&"Access Denied. Not authorized.".to_string()));
}

#[tokio::test]
async fn test_fetch_columns_of_missing_table() {
    let Some(pool) = test_pool().await else { return };

    let err = schema::fetch_columns(&pool, "pgprompt_no_such_table")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No table found with name pgprompt_no_such_table."
    );
}

#[tokio::test]
async fn test_fixed_length_char_values_are_kept_whole() {
    let Some(pool) = test_pool().await else { return };
    let table = "pgprompt_char_codes";

    sqlx::raw_sql(
        "DROP TABLE IF EXISTS pgprompt_char_codes; \
         CREATE TABLE pgprompt_char_codes (code char(3))",
    )
    .execute(&pool)
    .await
    .unwrap();

    let columns = schema::fetch_columns(&pool, table).await.unwrap();
    assert_eq!(columns[0].udt_name, "bpchar");

    sqlx::query(&sql::insert(table, &columns))
        .bind("abc")
        .execute(&pool)
        .await
        .unwrap();
    let stored: String = sqlx::query_scalar("SELECT code::text FROM pgprompt_char_codes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "abc");

    // A value sharing only the first letter must not match
    let deleted = sqlx::query(&sql::delete(table, &columns[0]))
        .bind("abd")
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(deleted.rows_affected(), 0);

    // Too long for char(3): refused, not cut short
    let too_long = sqlx::query(&sql::insert(table, &columns))
        .bind("abcd")
        .execute(&pool)
        .await;
    assert!(too_long.is_err());

    sqlx::raw_sql("DROP TABLE pgprompt_char_codes")
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_truncate_requires_credentials() {
    let Some(pool) = test_pool().await else { return };
    create_accounts(&pool).await;
    let table = "pgprompt_gate_rows";

    sqlx::raw_sql(
        "DROP TABLE IF EXISTS pgprompt_gate_rows; \
         CREATE TABLE pgprompt_gate_rows (id serial PRIMARY KEY, name text); \
         INSERT INTO pgprompt_gate_rows (name) VALUES ('a'), ('b')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let handler = DatabaseHandler::new(pool.clone());

    let mut denied = ScriptedPrompt::new(["admin", "wrong"]);
    assert!(handler.truncate(table, &mut denied).await.is_err());
    assert_eq!(count_rows(&pool, table).await, 2);

    let mut granted = ScriptedPrompt::new(["admin", "secret"]);
    handler.truncate(table, &mut granted).await.unwrap();
    assert_eq!(count_rows(&pool, table).await, 0);
    assert!(granted
        .transcript
        .contains(&"TRUNCATE operation was successful.".to_string()));

    sqlx::raw_sql("DROP TABLE pgprompt_gate_rows")
        .execute(&pool)
        .await
        .unwrap();
}
