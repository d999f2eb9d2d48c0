pub mod delete;
pub mod get;
pub mod post;
pub mod put;

pub use delete::delete_comment;
pub use get::{get_all_comments, get_comment};
pub use post::create_comment;
pub use put::update_comment;

use crate::{errors::AppError, models::comment::missing_post_error};

/// The foreign key on `post_id` decides whether the post exists; a violation
/// is a validation problem with the submitted `post`.
fn map_write_error(e: sqlx::Error, post_id: i64, action: &str) -> AppError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::Validation(missing_post_error(post_id))
        }
        e => AppError::DatabaseError(format!("Failed to {action} comment: {e}")),
    }
}
