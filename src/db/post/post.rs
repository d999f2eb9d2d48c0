use crate::{
    errors::AppError,
    models::{
        Post,
        post::{PostFields, PostRow},
    },
    state::DbPool,
};

pub async fn create_post(fields: PostFields, db: &DbPool) -> Result<Post, AppError> {
    let row = sqlx::query_as::<_, PostRow>(
        "INSERT INTO posts (title, content, pub_date)
        VALUES (?, ?, ?)
        RETURNING id, title, content, pub_date",
    )
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(fields.pub_date)
    .fetch_one(db)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create post: {}", e)))?;

    tracing::info!("Created post {} ({})", row.id, row.title);

    Ok(row.with_comments(Vec::new()))
}
