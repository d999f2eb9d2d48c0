use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    auth::{authenticate, generate_jwt},
    errors::AppError,
    models::user::{TokenRequest, TokenResponse},
    state::AppState,
    validation::{FieldErrors, NON_FIELD_ERRORS, REQUIRED},
};

/// Exchanges credentials for a bearer token usable on the API.
pub async fn token_handler(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let mut errors = FieldErrors::new();
    if request.username.trim().is_empty() {
        errors.add("username", REQUIRED);
    }
    if request.password.is_empty() {
        errors.add("password", REQUIRED);
    }
    errors.finish(()).map_err(AppError::Validation)?;

    let user = authenticate(&request.username, &request.password, &state)
        .await?
        .ok_or_else(|| {
            tracing::info!("Token refused for {}", request.username.trim());
            AppError::Validation(FieldErrors::single(
                NON_FIELD_ERRORS,
                "Unable to log in with provided credentials.",
            ))
        })?;

    let token = generate_jwt(&user, &state.config)?;
    tracing::info!("Issued API token for {}", user.username);

    Ok(Json(TokenResponse { token }))
}
