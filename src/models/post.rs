use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::{
    models::comment::Comment,
    validation::{FieldErrors, char_field, datetime_field, json_object},
};

pub const TITLE_MAX_LEN: usize = 200;

/// A post as stored, without its comments.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pub_date: DateTime<Utc>,
}

/// API representation; comments are nested read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pub_date: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

/// The writable part of a post.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub pub_date: DateTime<Utc>,
}

impl PostRow {
    pub fn with_comments(self, comments: Vec<Comment>) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            pub_date: self.pub_date,
            comments,
        }
    }
}

impl Post {
    pub fn fields(&self) -> PostFields {
        PostFields {
            title: self.title.clone(),
            content: self.content.clone(),
            pub_date: self.pub_date,
        }
    }
}

/// Validates a JSON body into the writable post fields.
///
/// With `current == None` (create, full update) every field is required. With
/// `Some(current)` (partial update) absent fields keep their current values.
pub fn parse_post(body: &Value, current: Option<&PostFields>) -> Result<PostFields, FieldErrors> {
    let obj = json_object(body)?;
    let required = current.is_none();
    let mut errors = FieldErrors::new();

    let title = char_field(obj, "title", Some(TITLE_MAX_LEN), required, &mut errors);
    let content = char_field(obj, "content", None, required, &mut errors);
    let pub_date = datetime_field(obj, "pub_date", required, &mut errors);

    errors.finish(())?;

    let base = current.cloned().unwrap_or_default();
    Ok(PostFields {
        title: title.unwrap_or(base.title),
        content: content.unwrap_or(base.content),
        pub_date: pub_date.unwrap_or(base.pub_date),
    })
}
