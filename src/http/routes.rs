use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::{
    auth::{load_current_user, require_api_auth},
    http::handlers::{
        create_comment_handler, create_post_handler, delete_comment_handler, delete_post_handler,
        get_comment_handler, get_post_handler, home_handler, list_comments_handler,
        list_posts_handler, login_handler, login_page_handler, logout_handler,
        patch_comment_handler, patch_post_handler, profile_handler, put_comment_handler,
        put_post_handler, register_handler, register_page_handler, review_page_handler,
        submit_review_handler, token_handler,
    },
    http::pages::render_error_pages,
    state::AppState,
};

fn blog_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/posts/", get(list_posts_handler).post(create_post_handler))
        .route(
            "/posts/{id}/",
            get(get_post_handler)
                .put(put_post_handler)
                .patch(patch_post_handler)
                .delete(delete_post_handler),
        )
        .route(
            "/comments/",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route(
            "/comments/{id}/",
            get(get_comment_handler)
                .put(put_comment_handler)
                .patch(patch_comment_handler)
                .delete(delete_comment_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(state, require_api_auth))
}

pub fn create_http_routes(state: AppState) -> Router {
    let blog = blog_routes(state.clone());

    Router::new()
        .route("/", get(home_handler))
        .route(
            "/review/",
            get(review_page_handler).post(submit_review_handler),
        )
        .route(
            "/register",
            get(register_page_handler).post(register_handler),
        )
        .route("/login", get(login_page_handler).post(login_handler))
        .route("/logout", get(logout_handler).post(logout_handler))
        .route("/profile", get(profile_handler))
        .route("/api/token/", post(token_handler))
        .merge(blog.clone())
        .nest("/api", blog)
        .layer(axum_middleware::from_fn(render_error_pages))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            load_current_user,
        ))
        .with_state(state)
}
