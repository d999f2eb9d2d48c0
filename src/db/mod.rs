pub mod comment;
pub mod post;
pub mod review;
pub mod user;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::{errors::AppError, state::DbPool};

const SCHEMA: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS book_reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        review TEXT NOT NULL,
        rating INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        date_joined TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        pub_date TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        author TEXT NOT NULL,
        text TEXT NOT NULL,
        created_date TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS comments_post_id ON comments (post_id)",
];

pub async fn connect(database_url: &str) -> Result<DbPool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::DatabaseError(format!("Invalid database url: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection, so keep exactly one.
    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

    tracing::info!("Connected to database at {}", database_url);
    Ok(pool)
}

pub async fn init_schema(db: &DbPool) -> Result<(), AppError> {
    tracing::info!("Initializing schema...");

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(db)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create schema: {}", e)))?;
    }

    Ok(())
}
