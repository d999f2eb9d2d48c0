use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::validation::{FieldErrors, char_field, json_object, pk_field};

pub const AUTHOR_MAX_LEN: usize = 100;

/// Exposed as `{author, text, created_date}` only; the id and the owning post
/// stay internal.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip)]
    pub post_id: i64,
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommentFields {
    pub post_id: i64,
    pub author: String,
    pub text: String,
}

impl Comment {
    pub fn fields(&self) -> CommentFields {
        CommentFields {
            post_id: self.post_id,
            author: self.author.clone(),
            text: self.text.clone(),
        }
    }
}

pub fn missing_post_error(post_id: i64) -> FieldErrors {
    FieldErrors::single(
        "post",
        format!("Invalid pk \"{post_id}\" - object does not exist."),
    )
}

/// Same contract as [`crate::models::post::parse_post`]. `post` is write-only:
/// it is accepted here but never serialized back.
pub fn parse_comment(
    body: &Value,
    current: Option<&CommentFields>,
) -> Result<CommentFields, FieldErrors> {
    let obj = json_object(body)?;
    let required = current.is_none();
    let mut errors = FieldErrors::new();

    let post_id = pk_field(obj, "post", required, &mut errors);
    let author = char_field(obj, "author", Some(AUTHOR_MAX_LEN), required, &mut errors);
    let text = char_field(obj, "text", None, required, &mut errors);

    errors.finish(())?;

    let base = current.cloned().unwrap_or_default();
    Ok(CommentFields {
        post_id: post_id.unwrap_or(base.post_id),
        author: author.unwrap_or(base.author),
        text: text.unwrap_or(base.text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::REQUIRED;
    use serde_json::json;

    #[test]
    fn test_serialized_fields_are_fixed() {
        let comment = Comment {
            id: 7,
            post_id: 3,
            author: "ann".into(),
            text: "hello".into(),
            created_date: "2024-02-03T04:05:06Z".parse().unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&comment).unwrap(),
            json!({ "author": "ann", "text": "hello", "created_date": "2024-02-03T04:05:06Z" })
        );
    }

    #[test]
    fn test_parse_comment() {
        let fields = parse_comment(&json!({ "post": "3", "author": "ann", "text": "hi" }), None)
            .unwrap();
        assert_eq!(fields.post_id, 3);

        let errors = parse_comment(&json!({ "author": "ann" }), None).unwrap_err();
        assert_eq!(errors.get("post"), [REQUIRED]);
        assert_eq!(errors.get("text"), [REQUIRED]);

        let patched = parse_comment(&json!({ "text": "edited" }), Some(&fields)).unwrap();
        assert_eq!(patched.post_id, 3);
        assert_eq!(patched.author, "ann");
        assert_eq!(patched.text, "edited");
    }
}
