use axum::{
    Json,
    extract::{OriginalUri, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    db::post::{create_post, delete_post, get_all_posts, get_post, update_post},
    errors::AppError,
    http::handlers::{json_body, parse_pk},
    models::{Post, post::parse_post},
    state::AppState,
};

pub async fn list_posts_handler(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    let posts = get_all_posts(&state.db).await?;
    Ok(Json(posts))
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = json_body(payload)?;
    let fields = parse_post(&body, None).map_err(AppError::Validation)?;

    let post = create_post(fields, &state.db).await?;
    let location = format!("{}{}/", uri.path(), post.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(post),
    )
        .into_response())
}

pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let post = get_post(parse_pk(&post_id)?, &state.db).await?;
    Ok(Json(post))
}

pub async fn put_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Post>, AppError> {
    let post_id = parse_pk(&post_id)?;
    get_post(post_id, &state.db).await?;

    let body = json_body(payload)?;
    let fields = parse_post(&body, None).map_err(AppError::Validation)?;

    Ok(Json(update_post(post_id, fields, &state.db).await?))
}

pub async fn patch_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Post>, AppError> {
    let post_id = parse_pk(&post_id)?;
    let current = get_post(post_id, &state.db).await?;

    let body = json_body(payload)?;
    let fields = parse_post(&body, Some(&current.fields())).map_err(AppError::Validation)?;

    Ok(Json(update_post(post_id, fields, &state.db).await?))
}

pub async fn delete_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<StatusCode, AppError> {
    delete_post(parse_pk(&post_id)?, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
