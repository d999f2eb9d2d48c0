use axum::{
    Json,
    extract::{OriginalUri, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    db::comment::{create_comment, delete_comment, get_all_comments, get_comment, update_comment},
    errors::AppError,
    http::handlers::{json_body, parse_pk},
    models::{Comment, comment::parse_comment},
    state::AppState,
};

pub async fn list_comments_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = get_all_comments(&state.db).await?;
    Ok(Json(comments))
}

/// The body never carries the generated id, so the `Location` header is the
/// only way a client learns the item URL.
pub async fn create_comment_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = json_body(payload)?;
    let fields = parse_comment(&body, None).map_err(AppError::Validation)?;

    let comment = create_comment(fields, &state.db).await?;
    let location = format!("{}{}/", uri.path(), comment.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(comment),
    )
        .into_response())
}

pub async fn get_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<Json<Comment>, AppError> {
    let comment = get_comment(parse_pk(&comment_id)?, &state.db).await?;
    Ok(Json(comment))
}

pub async fn put_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Comment>, AppError> {
    let comment_id = parse_pk(&comment_id)?;
    get_comment(comment_id, &state.db).await?;

    let body = json_body(payload)?;
    let fields = parse_comment(&body, None).map_err(AppError::Validation)?;

    Ok(Json(update_comment(comment_id, fields, &state.db).await?))
}

pub async fn patch_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Comment>, AppError> {
    let comment_id = parse_pk(&comment_id)?;
    let current = get_comment(comment_id, &state.db).await?;

    let body = json_body(payload)?;
    let fields = parse_comment(&body, Some(&current.fields())).map_err(AppError::Validation)?;

    Ok(Json(update_comment(comment_id, fields, &state.db).await?))
}

pub async fn delete_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, AppError> {
    delete_comment(parse_pk(&comment_id)?, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
