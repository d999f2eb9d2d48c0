use crate::{
    db::post::get::get_post,
    errors::{AppError, NOT_FOUND},
    models::{Post, post::PostFields},
    state::DbPool,
};

/// Overwrites every writable field; partial updates merge before calling this.
pub async fn update_post(post_id: i64, fields: PostFields, db: &DbPool) -> Result<Post, AppError> {
    let updated = sqlx::query("UPDATE posts SET title = ?, content = ?, pub_date = ? WHERE id = ?")
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fields.pub_date)
        .bind(post_id)
        .execute(db)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update post: {}", e)))?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    tracing::info!("Updated post {}", post_id);

    get_post(post_id, db).await
}
