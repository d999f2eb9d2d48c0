pub mod account;
pub mod comment;
pub mod post;
pub mod review;
pub mod token;

use axum::{Json, extract::rejection::JsonRejection};
use serde_json::Value;

use crate::errors::{AppError, NOT_FOUND};

pub use account::{
    home_handler, login_handler, login_page_handler, logout_handler, profile_handler,
    register_handler, register_page_handler,
};
pub use comment::{
    create_comment_handler, delete_comment_handler, get_comment_handler, list_comments_handler,
    patch_comment_handler, put_comment_handler,
};
pub use post::{
    create_post_handler, delete_post_handler, get_post_handler, list_posts_handler,
    patch_post_handler, put_post_handler,
};
pub use review::{review_page_handler, submit_review_handler};
pub use token::token_handler;

/// Item ids that are not integers simply do not match anything.
fn parse_pk(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(NOT_FOUND.into()))
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
