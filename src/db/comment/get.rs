use crate::{
    errors::{AppError, NOT_FOUND},
    models::Comment,
    state::DbPool,
};

pub async fn get_all_comments(db: &DbPool) -> Result<Vec<Comment>, AppError> {
    sqlx::query_as::<_, Comment>(
        "SELECT id, post_id, author, text, created_date FROM comments ORDER BY id",
    )
    .fetch_all(db)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch comments: {}", e)))
}

pub async fn get_comment(comment_id: i64, db: &DbPool) -> Result<Comment, AppError> {
    sqlx::query_as::<_, Comment>(
        "SELECT id, post_id, author, text, created_date FROM comments WHERE id = ?",
    )
    .bind(comment_id)
    .fetch_optional(db)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch comment: {}", e)))?
    .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}
