use crate::{
    errors::{AppError, NOT_FOUND},
    state::DbPool,
};

/// Removes the post; its comments go with it through `ON DELETE CASCADE`.
pub async fn delete_post(post_id: i64, db: &DbPool) -> Result<(), AppError> {
    let deleted = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(post_id)
        .execute(db)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete post: {}", e)))?;

    if deleted.rows_affected() == 0 {
        tracing::debug!("No post {} to delete", post_id);
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    tracing::info!("Deleted post {}", post_id);
    Ok(())
}
