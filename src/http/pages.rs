//! HTML for the review and account pages. Every interpolated value goes
//! through `html_escape`.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::{
    auth::CurrentUser,
    errors::AppError,
    flash::FlashMessage,
    models::{BookReview, User},
    validation::{FieldErrors, NON_FIELD_ERRORS},
};

/// What every page needs besides its own content.
pub struct PageContext<'a> {
    pub user: Option<&'a User>,
    pub messages: &'a [FlashMessage],
}

fn layout(title: &str, ctx: &PageContext<'_>, body: &str) -> Html<String> {
    let nav = match ctx.user {
        Some(user) => format!(
            r#"<a href="/">Home</a> <a href="/review/">Reviews</a> <a href="/profile">{}</a> <a href="/logout">Logout</a>"#,
            text(&user.username)
        ),
        None => r#"<a href="/">Home</a> <a href="/review/">Reviews</a> <a href="/login">Login</a> <a href="/register">Register</a>"#
            .to_string(),
    };

    let banners: String = ctx
        .messages
        .iter()
        .map(|m| {
            format!(
                r#"<div class="alert alert-{}" role="alert">{}</div>"#,
                m.level.as_str(),
                text(&m.message)
            )
        })
        .collect();

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<nav>{nav}</nav>\n{banners}\n<main>\n<h1>{title}</h1>\n{body}\n</main>\n</body>\n</html>\n",
        title = text(title),
    ))
}

fn error_list(errors: &FieldErrors, field: &str) -> String {
    let messages = errors.get(field);
    if messages.is_empty() {
        return String::new();
    }

    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", text(m)))
        .collect();
    format!(r#"<ul class="errorlist">{items}</ul>"#)
}

fn input(label: &str, name: &str, kind: &str, value: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<p>{errors}<label for="id_{name}">{label}</label> <input type="{kind}" name="{name}" id="id_{name}" value="{value}"></p>"#,
        errors = error_list(errors, name),
        label = text(label),
        value = attr(value),
    )
}

pub fn review_page(
    ctx: &PageContext<'_>,
    review: &str,
    rating: &str,
    errors: &FieldErrors,
    reviews: &[BookReview],
) -> Html<String> {
    let listing: String = reviews
        .iter()
        .map(|r| {
            format!(
                r#"<li class="review"><p>{}</p><p>Rating: {}</p></li>"#,
                text(&r.review),
                r.rating
            )
        })
        .collect();

    let body = format!(
        r#"<form method="post" action="/review/">
<p>{review_errors}<label for="id_review">Review</label> <textarea name="review" id="id_review">{review}</textarea></p>
{rating_input}
<button type="submit">Submit</button>
</form>
<h2>Reviews</h2>
<ul class="reviews">{listing}</ul>"#,
        review_errors = error_list(errors, "review"),
        review = text(review),
        rating_input = input("Rating", "rating", "number", rating, errors),
    );

    layout("Book reviews", ctx, &body)
}

pub fn home_page(ctx: &PageContext<'_>) -> Html<String> {
    let body = match ctx.user {
        Some(user) => format!("<p>Welcome back, {}.</p>", text(&user.username)),
        None => r#"<p>You are not logged in. <a href="/login">Log in</a> or <a href="/register">register</a>.</p>"#
            .to_string(),
    };
    layout("Home", ctx, &body)
}

pub fn register_page(
    ctx: &PageContext<'_>,
    username: &str,
    email: &str,
    errors: &FieldErrors,
) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/register">
{non_field}
{username}
{email}
{password1}
{password2}
<button type="submit">Register</button>
</form>
<p>Already have an account? <a href="/login">Log in</a>.</p>"#,
        non_field = error_list(errors, NON_FIELD_ERRORS),
        username = input("Username", "username", "text", username, errors),
        email = input("Email", "email", "email", email, errors),
        password1 = input("Password", "password1", "password", "", errors),
        password2 = input("Password confirmation", "password2", "password", "", errors),
    );
    layout("Register", ctx, &body)
}

pub fn login_page(
    ctx: &PageContext<'_>,
    username: &str,
    next: &str,
    errors: &FieldErrors,
) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/login">
{non_field}
{username}
{password}
<input type="hidden" name="next" value="{next}">
<button type="submit">Login</button>
</form>
<p>No account yet? <a href="/register">Register</a>.</p>"#,
        non_field = error_list(errors, NON_FIELD_ERRORS),
        username = input("Username", "username", "text", username, errors),
        password = input("Password", "password", "password", "", errors),
        next = attr(next),
    );
    layout("Login", ctx, &body)
}

pub fn profile_page(ctx: &PageContext<'_>, user: &User) -> Html<String> {
    let body = format!(
        r#"<dl class="profile">
<dt>Username</dt><dd>{}</dd>
<dt>Email</dt><dd>{}</dd>
<dt>Member since</dt><dd>{}</dd>
</dl>"#,
        text(&user.username),
        text(&user.email),
        user.date_joined.format("%B %-d, %Y"),
    );
    layout("Profile", ctx, &body)
}

/// Error type for HTML routes: same [`AppError`], rendered as a page.
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

/// Carried on a [`PageError`] response so [`render_error_pages`] can redraw
/// it for the signed-in user.
#[derive(Debug, Clone)]
struct FailedPage {
    status: StatusCode,
    message: String,
}

fn error_page(failure: &FailedPage, user: Option<&User>) -> Response {
    let ctx = PageContext { user, messages: &[] };
    let title = failure.status.canonical_reason().unwrap_or("Error");
    let body = format!("<p>{}</p>", text(&failure.message));
    (failure.status, layout(title, &ctx, &body)).into_response()
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.to_response();
        if status.is_server_error() {
            tracing::error!("Page failed: {}", self.0);
        }

        let failure = FailedPage { status, message };
        let mut response = error_page(&failure, None);
        response.extensions_mut().insert(failure);
        response
    }
}

/// Error pages are built without request context; this redraws them with the
/// navigation of whoever is signed in.
pub async fn render_error_pages(
    CurrentUser(user): CurrentUser,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(user) = user else {
        return response;
    };

    match response.extensions().get::<FailedPage>() {
        Some(failure) => error_page(failure, Some(&user)),
        None => response,
    }
}

pub fn render(status: StatusCode, page: Html<String>) -> Response {
    (status, page).into_response()
}
