use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::CurrentUser,
    db::review::{create_review, get_all_reviews},
    flash,
    http::pages::{PageContext, PageError, render, review_page},
    models::review::ReviewForm,
    state::AppState,
    validation::FieldErrors,
};

pub async fn review_page_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<Response, PageError> {
    let reviews = get_all_reviews(&state.db).await?;
    let (jar, messages) = flash::take(jar, &state.config.jwt_secret);

    let ctx = PageContext {
        user: user.as_ref(),
        messages: &messages,
    };
    let page = review_page(&ctx, "", "", &FieldErrors::new(), &reviews);
    Ok((jar, page).into_response())
}

pub async fn submit_review_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ReviewForm>,
) -> Result<Response, PageError> {
    match form.validate() {
        Ok(new_review) => {
            create_review(new_review, &state.db).await?;
            Ok(Redirect::to("/review/").into_response())
        }
        Err(errors) => {
            tracing::info!("Rejected review submission: {}", errors);
            let reviews = get_all_reviews(&state.db).await?;
            let ctx = PageContext {
                user: user.as_ref(),
                messages: &[],
            };
            let page = review_page(&ctx, &form.review, &form.rating, &errors, &reviews);
            Ok(render(StatusCode::BAD_REQUEST, page))
        }
    }
}
