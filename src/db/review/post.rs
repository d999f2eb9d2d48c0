use crate::{
    errors::AppError,
    models::{BookReview, review::NewReview},
    state::DbPool,
};

pub async fn create_review(new_review: NewReview, db: &DbPool) -> Result<BookReview, AppError> {
    let review = sqlx::query_as::<_, BookReview>(
        "INSERT INTO book_reviews (review, rating)
        VALUES (?, ?)
        RETURNING id, review, rating",
    )
    .bind(&new_review.review)
    .bind(new_review.rating)
    .fetch_one(db)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to create review: {}", e)))?;

    tracing::info!("Created review {} (rating {})", review.id, review.rating);

    Ok(review)
}
