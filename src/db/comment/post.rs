use chrono::Utc;

use crate::{
    db::comment::map_write_error,
    errors::AppError,
    models::{Comment, comment::CommentFields},
    state::DbPool,
};

pub async fn create_comment(fields: CommentFields, db: &DbPool) -> Result<Comment, AppError> {
    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (post_id, author, text, created_date)
        VALUES (?, ?, ?, ?)
        RETURNING id, post_id, author, text, created_date",
    )
    .bind(fields.post_id)
    .bind(&fields.author)
    .bind(&fields.text)
    .bind(Utc::now())
    .fetch_one(db)
    .await
    .map_err(|e| map_write_error(e, fields.post_id, "create"))?;

    tracing::info!(
        "Created comment {} on post {} by {}",
        comment.id,
        comment.post_id,
        comment.author
    );

    Ok(comment)
}
