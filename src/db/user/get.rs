use crate::{errors::AppError, models::User, state::DbPool};

const USER_COLUMNS: &str = "id, username, email, password_hash, date_joined";

pub async fn get_user_by_id(user_id: i64, db: &DbPool) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

pub async fn get_user_by_username(username: &str, db: &DbPool) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(db)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))
}
