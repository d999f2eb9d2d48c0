use crate::{
    errors::{AppError, NOT_FOUND},
    state::DbPool,
};

pub async fn delete_comment(comment_id: i64, db: &DbPool) -> Result<(), AppError> {
    let deleted = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(comment_id)
        .execute(db)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete comment: {}", e)))?;

    if deleted.rows_affected() == 0 {
        tracing::debug!("No comment {} to delete", comment_id);
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    tracing::info!("Deleted comment {}", comment_id);
    Ok(())
}
