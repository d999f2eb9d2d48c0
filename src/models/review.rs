use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{FieldErrors, REQUIRED, parse_integer};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookReview {
    pub id: i64,
    pub review: String,
    pub rating: i64,
}

/// Raw form submission; every field arrives as text.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub review: String,
    pub rating: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub review: String,
    pub rating: i64,
}

impl ReviewForm {
    pub fn validate(&self) -> Result<NewReview, FieldErrors> {
        let mut errors = FieldErrors::new();

        let review = self.review.trim();
        if review.is_empty() {
            errors.add("review", REQUIRED);
        }

        // Any integer is accepted, there is no documented range.
        let rating = if self.rating.trim().is_empty() {
            errors.add("rating", REQUIRED);
            None
        } else {
            let parsed = parse_integer(&self.rating);
            if parsed.is_none() {
                errors.add("rating", "Enter a whole number.");
            }
            parsed
        };

        errors.finish(())?;
        Ok(NewReview {
            review: review.to_string(),
            rating: rating.unwrap_or_default(),
        })
    }
}
