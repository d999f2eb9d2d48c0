use crate::{
    db::comment::map_write_error,
    errors::{AppError, NOT_FOUND},
    models::{Comment, comment::CommentFields},
    state::DbPool,
};

/// `created_date` is never touched.
pub async fn update_comment(
    comment_id: i64,
    fields: CommentFields,
    db: &DbPool,
) -> Result<Comment, AppError> {
    let comment = sqlx::query_as::<_, Comment>(
        "UPDATE comments SET post_id = ?, author = ?, text = ?
        WHERE id = ?
        RETURNING id, post_id, author, text, created_date",
    )
    .bind(fields.post_id)
    .bind(&fields.author)
    .bind(&fields.text)
    .bind(comment_id)
    .fetch_optional(db)
    .await
    .map_err(|e| map_write_error(e, fields.post_id, "update"))?
    .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

    tracing::info!("Updated comment {}", comment_id);

    Ok(comment)
}
