use crate::{errors::AppError, models::BookReview, state::DbPool};

/// All reviews in insertion order.
pub async fn get_all_reviews(db: &DbPool) -> Result<Vec<BookReview>, AppError> {
    sqlx::query_as::<_, BookReview>("SELECT id, review, rating FROM book_reviews ORDER BY id")
        .fetch_all(db)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch reviews: {}", e)))
}
