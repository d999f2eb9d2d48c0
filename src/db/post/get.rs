use std::collections::HashMap;

use crate::{
    errors::{AppError, NOT_FOUND},
    models::{Comment, Post, post::PostRow},
    state::DbPool,
};

/// Every post with its comments nested, both in creation order.
pub async fn get_all_posts(db: &DbPool) -> Result<Vec<Post>, AppError> {
    // One transaction so the posts and comments come from the same snapshot.
    let mut tx = db
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

    let rows = sqlx::query_as::<_, PostRow>(
        "SELECT id, title, content, pub_date FROM posts ORDER BY id",
    )
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch posts: {}", e)))?;

    let comments = sqlx::query_as::<_, Comment>(
        "SELECT id, post_id, author, text, created_date FROM comments ORDER BY id",
    )
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch comments: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))?;

    let mut by_post: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in comments {
        by_post.entry(comment.post_id).or_default().push(comment);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let comments = by_post.remove(&row.id).unwrap_or_default();
            row.with_comments(comments)
        })
        .collect())
}

pub async fn get_post(post_id: i64, db: &DbPool) -> Result<Post, AppError> {
    let mut tx = db
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

    let row = sqlx::query_as::<_, PostRow>(
        "SELECT id, title, content, pub_date FROM posts WHERE id = ?",
    )
    .bind(post_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch post: {}", e)))?
    .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

    let comments = sqlx::query_as::<_, Comment>(
        "SELECT id, post_id, author, text, created_date FROM comments
        WHERE post_id = ?
        ORDER BY id",
    )
    .bind(post_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch comments: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))?;

    Ok(row.with_comments(comments))
}
