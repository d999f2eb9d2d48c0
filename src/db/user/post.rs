use chrono::Utc;

use crate::{
    errors::AppError,
    models::{User, user::USERNAME_TAKEN},
    state::DbPool,
    validation::FieldErrors,
};

/// Inserts a user whose password has already been hashed.
///
/// The `UNIQUE` constraint on `username` is the final word on duplicates: a
/// concurrent registration that slipped past the handler's lookup comes back as
/// a validation error, not a database failure.
pub async fn create_user(
    username: &str,
    email: &str,
    password_hash: &str,
    db: &DbPool,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash, date_joined)
        VALUES (?, ?, ?, ?)
        RETURNING id, username, email, password_hash, date_joined",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Validation(FieldErrors::single("username", USERNAME_TAKEN))
        }
        e => AppError::DatabaseError(format!("Failed to create user: {}", e)),
    })?;

    tracing::info!("Created user {} (ID: {})", user.username, user.id);

    Ok(user)
}
