use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    auth::{self, CurrentUser, LoginRequired, authenticate, hash_password},
    db::user::{create_user, get_user_by_username},
    errors::AppError,
    flash::{self, FlashMessage},
    http::pages::{
        PageContext, PageError, home_page, login_page, profile_page, register_page, render,
    },
    models::{
        User,
        user::{LoginForm, RegisterForm, USERNAME_TAKEN},
    },
    state::AppState,
    validation::FieldErrors,
};

const REGISTRATION_OK: &str = "Registration successful.";
const REGISTRATION_FAILED: &str = "Unsuccessful registration. Invalid information.";

#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

pub async fn home_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Response {
    let (jar, messages) = flash::take(jar, &state.config.jwt_secret);
    let ctx = PageContext {
        user: user.as_ref(),
        messages: &messages,
    };
    (jar, home_page(&ctx)).into_response()
}

pub async fn register_page_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Response {
    let (jar, messages) = flash::take(jar, &state.config.jwt_secret);
    let ctx = PageContext {
        user: user.as_ref(),
        messages: &messages,
    };
    (jar, register_page(&ctx, "", "", &FieldErrors::new())).into_response()
}

pub async fn register_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, PageError> {
    let new_user = match form.validate() {
        Ok(new_user) => new_user,
        Err(mut errors) => {
            if !errors.contains("username")
                && get_user_by_username(form.username.trim(), &state.db)
                    .await?
                    .is_some()
            {
                errors.add("username", USERNAME_TAKEN);
            }
            return Ok(registration_failed(user.as_ref(), &form, &errors));
        }
    };

    if get_user_by_username(&new_user.username, &state.db)
        .await?
        .is_some()
    {
        let errors = FieldErrors::single("username", USERNAME_TAKEN);
        return Ok(registration_failed(user.as_ref(), &form, &errors));
    }

    let password_hash = hash_password(&new_user.password)?;
    let created = match create_user(
        &new_user.username,
        &new_user.email,
        &password_hash,
        &state.db,
    )
    .await
    {
        Ok(created) => created,
        Err(AppError::Validation(errors)) => {
            tracing::warn!("Registration lost a race for {}", new_user.username);
            return Ok(registration_failed(user.as_ref(), &form, &errors));
        }
        Err(e) => return Err(e.into()),
    };

    let jar = auth::login(jar, &created, &state.config)?;
    let jar = flash::push(
        jar,
        &state.config.jwt_secret,
        FlashMessage::success(REGISTRATION_OK),
    )?;

    tracing::info!("Registered user {}", created.username);
    Ok((jar, Redirect::to("/")).into_response())
}

fn registration_failed(
    user: Option<&User>,
    form: &RegisterForm,
    errors: &FieldErrors,
) -> Response {
    tracing::info!("Rejected registration: {}", errors);
    let messages = [FlashMessage::error(REGISTRATION_FAILED)];
    let ctx = PageContext {
        user,
        messages: &messages,
    };
    let page = register_page(&ctx, form.username.trim(), form.email.trim(), errors);
    render(StatusCode::BAD_REQUEST, page)
}

pub async fn login_page_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Query(params): Query<NextParam>,
) -> Response {
    let (jar, messages) = flash::take(jar, &state.config.jwt_secret);
    let ctx = PageContext {
        user: user.as_ref(),
        messages: &messages,
    };
    let next = safe_next(params.next.as_deref());
    (jar, login_page(&ctx, "", next, &FieldErrors::new())).into_response()
}

pub async fn login_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let next = safe_next(form.next.as_deref()).to_string();

    let errors = match form.validate() {
        Ok(()) => match authenticate(&form.username, &form.password, &state).await? {
            Some(authenticated) => {
                let jar = auth::login(jar, &authenticated, &state.config)?;
                return Ok((jar, Redirect::to(&next)).into_response());
            }
            None => {
                tracing::info!("Failed login for {}", form.username.trim());
                LoginForm::invalid_credentials()
            }
        },
        Err(errors) => errors,
    };

    let ctx = PageContext {
        user: user.as_ref(),
        messages: &[],
    };
    let page = login_page(&ctx, form.username.trim(), &next, &errors);
    Ok(render(StatusCode::BAD_REQUEST, page))
}

pub async fn logout_handler(CurrentUser(user): CurrentUser, jar: CookieJar) -> Response {
    if let Some(user) = user {
        tracing::info!("Session ended for {}", user.username);
    }
    (auth::logout(jar), Redirect::to("/")).into_response()
}

pub async fn profile_handler(
    State(state): State<AppState>,
    LoginRequired(user): LoginRequired,
    jar: CookieJar,
) -> Response {
    let (jar, messages) = flash::take(jar, &state.config.jwt_secret);
    let ctx = PageContext {
        user: Some(&user),
        messages: &messages,
    };
    (jar, profile_page(&ctx, &user)).into_response()
}
