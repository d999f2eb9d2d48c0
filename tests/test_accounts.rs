mod common;

use axum::http::StatusCode;
use common::{
    assert_status, body_text, cookie_header, form_post, get, location, send, set_cookies,
    test_app,
};
use lectures_be::{
    db::user::{create_user, get_user_by_username},
    errors::AppError,
    models::user::USERNAME_TAKEN,
};

const ALICE: &str = "username=alice&email=alice%40example.com&password1=s3cret-pass&password2=s3cret-pass";

async fn count_users(state: &lectures_be::state::AppState) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_home_is_public() {
    let (app, _) = test_app().await;

    let response = send(&app, get("/", None)).await;
    assert_status(&response, StatusCode::OK);
    assert!(body_text(response).await.contains("You are not logged in."));
}

#[tokio::test]
async fn test_register_logs_in_and_flashes_once() {
    let (app, state) = test_app().await;

    let response = send(&app, form_post("/register", ALICE, None)).await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let cookies = cookie_header(&response);
    assert!(cookies.contains("sessionid="));
    assert!(cookies.contains("messages="));

    let user = get_user_by_username("alice", &state.db).await.unwrap().unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_ne!(user.password_hash, "s3cret-pass");

    // The session is live immediately and the flash shows up on the next page.
    let response = send(&app, get("/", Some(&cookies))).await;
    assert_status(&response, StatusCode::OK);
    let cleared = set_cookies(&response);
    assert!(
        cleared
            .iter()
            .any(|c| c.starts_with("messages=") && c.contains("Max-Age=0"))
    );
    let html = body_text(response).await;
    assert!(html.contains("Welcome back, alice."));
    assert!(html.contains("Registration successful."));

    // Without the consumed flash cookie the banner is gone.
    let session_only = cookies
        .split("; ")
        .filter(|c| c.starts_with("sessionid="))
        .collect::<Vec<_>>()
        .join("; ");
    let html = body_text(send(&app, get("/", Some(&session_only))).await).await;
    assert!(html.contains("Welcome back, alice."));
    assert!(!html.contains("Registration successful."));
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let (app, state) = test_app().await;

    let first = send(&app, form_post("/register", ALICE, None)).await;
    assert_status(&first, StatusCode::SEE_OTHER);

    let second = send(&app, form_post("/register", ALICE, None)).await;
    assert_status(&second, StatusCode::BAD_REQUEST);
    assert!(cookie_header(&second).is_empty());

    let html = body_text(second).await;
    assert!(html.contains("A user with that username already exists."));
    assert!(html.contains("Unsuccessful registration. Invalid information."));

    assert_eq!(count_users(&state).await, 1);
}

#[tokio::test]
async fn test_store_rejects_duplicate_username_as_validation_error() {
    let (_, state) = test_app().await;

    create_user("bob", "bob@example.com", "hash-one", &state.db)
        .await
        .unwrap();
    let second = create_user("bob", "other@example.com", "hash-two", &state.db).await;

    match second {
        Err(AppError::Validation(errors)) => {
            assert_eq!(errors.get("username"), [USERNAME_TAKEN]);
        }
        other => panic!("expected a validation error, got {:?}", other.map(|u| u.id)),
    }
    assert_eq!(count_users(&state).await, 1);
}

#[tokio::test]
async fn test_invalid_registration_keeps_input_but_not_passwords() {
    let (app, state) = test_app().await;

    let response = send(
        &app,
        form_post(
            "/register",
            "username=bob&email=bob%40example.com&password1=first-pass&password2=other-pass",
            None,
        ),
    )
    .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let html = body_text(response).await;
    assert!(html.contains("The two password fields didn't match."));
    assert!(html.contains(r#"value="bob""#));
    assert!(!html.contains("first-pass"));
    assert_eq!(count_users(&state).await, 0);
}

#[tokio::test]
async fn test_profile_requires_a_session() {
    let (app, _) = test_app().await;

    let response = send(&app, get("/profile", None)).await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Fprofile");
    assert!(!body_text(response).await.contains("Member since"));

    let response = send(&app, get("/profile?tab=posts&page=2", None)).await;
    assert_status(&response, StatusCode::SEE_OTHER);
    let login_url = location(&response);
    assert_eq!(login_url, "/login?next=%2Fprofile%3Ftab%3Dposts%26page%3D2");

    let response = send(&app, get(&login_url, None)).await;
    assert_status(&response, StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains(r#"name="next" value="/profile?tab=posts&amp;page=2""#)
    );

    let response = send(&app, get("/profile", Some("sessionid=forged.token.value"))).await;
    assert_status(&response, StatusCode::SEE_OTHER);

    let registered = send(&app, form_post("/register", ALICE, None)).await;
    let cookies = cookie_header(&registered);

    let response = send(&app, get("/profile", Some(&cookies))).await;
    assert_status(&response, StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Member since"));
    assert!(html.contains("alice@example.com"));
}

#[tokio::test]
async fn test_login_and_logout() {
    let (app, _) = test_app().await;
    send(&app, form_post("/register", ALICE, None)).await;

    let response = send(
        &app,
        form_post("/login", "username=alice&password=wrong-pass&next=%2Fprofile", None),
    )
    .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert!(cookie_header(&response).is_empty());
    assert!(
        body_text(response)
            .await
            .contains("Please enter a correct username and password.")
    );

    let response = send(
        &app,
        form_post("/login", "username=alice&password=s3cret-pass&next=%2Fprofile", None),
    )
    .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/profile");
    let cookies = cookie_header(&response);
    assert!(cookies.starts_with("sessionid="));

    let response = send(&app, get("/profile", Some(&cookies))).await;
    assert_status(&response, StatusCode::OK);

    let response = send(&app, get("/logout", Some(&cookies))).await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(
        set_cookies(&response)
            .iter()
            .any(|c| c.starts_with("sessionid=") && c.contains("Max-Age=0"))
    );
}

#[tokio::test]
async fn test_login_ignores_offsite_next() {
    let (app, _) = test_app().await;
    send(&app, form_post("/register", ALICE, None)).await;

    let response = send(
        &app,
        form_post(
            "/login",
            "username=alice&password=s3cret-pass&next=%2F%2Fevil.example.com",
            None,
        ),
    )
    .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_error_page_keeps_signed_in_navigation() {
    let (app, state) = test_app().await;
    let registered = send(&app, form_post("/register", ALICE, None)).await;
    let cookies = cookie_header(&registered);

    sqlx::query("DROP TABLE book_reviews")
        .execute(&state.db)
        .await
        .unwrap();

    let response = send(&app, get("/review/", Some(&cookies))).await;
    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(response).await;
    assert!(html.contains("Unexpected server error"));
    assert!(html.contains(r#"<a href="/profile">alice</a>"#));
    assert!(html.contains(r#"<a href="/logout">Logout</a>"#));
    assert!(!html.contains(r#"<a href="/login">Login</a>"#));

    let response = send(&app, get("/review/", None)).await;
    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains(r#"<a href="/login">Login</a>"#));
}
