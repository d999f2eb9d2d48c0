mod common;

use axum::http::StatusCode;
use common::{assert_status, body_text, form_post, get, location, send, test_app};
use lectures_be::db::review::get_all_reviews;

#[tokio::test]
async fn test_empty_review_page_renders_form() {
    let (app, _) = test_app().await;

    let response = send(&app, get("/review/", None)).await;
    assert_status(&response, StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(r#"<form method="post" action="/review/">"#));
    assert!(html.contains(r#"<ul class="reviews"></ul>"#));
}

#[tokio::test]
async fn test_valid_review_is_stored_once_and_redirects() {
    let (app, state) = test_app().await;

    let response = send(&app, form_post("/review/", "review=Loved+it&rating=5", None)).await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/review/");

    let response = send(&app, form_post("/review/", "review=Too+long&rating=2", None)).await;
    assert_status(&response, StatusCode::SEE_OTHER);

    let stored = get_all_reviews(&state.db).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].review, "Loved it");
    assert_eq!(stored[0].rating, 5);
    assert_eq!(stored[1].rating, 2);

    let html = body_text(send(&app, get("/review/", None)).await).await;
    assert_eq!(html.matches("<p>Loved it</p>").count(), 1);
    let first = html.find("Loved it").unwrap();
    let second = html.find("Too long").unwrap();
    assert!(first < second, "reviews should be listed in insertion order");
    assert!(html.contains("<p>Rating: 5</p>"));
}

#[tokio::test]
async fn test_invalid_review_is_not_persisted() {
    let (app, state) = test_app().await;
    send(&app, form_post("/review/", "review=Kept&rating=3", None)).await;

    let response = send(&app, form_post("/review/", "review=Nope&rating=abc", None)).await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("Enter a whole number."));
    // submitted values are echoed back
    assert!(html.contains(">Nope</textarea>"));
    assert!(html.contains(r#"value="abc""#));

    let response = send(&app, form_post("/review/", "rating=4", None)).await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("This field is required."));

    let stored = get_all_reviews(&state.db).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].review, "Kept");
}

#[tokio::test]
async fn test_review_text_is_escaped() {
    let (app, _) = test_app().await;
    send(
        &app,
        form_post("/review/", "review=%3Cscript%3Ealert(1)%3C%2Fscript%3E&rating=1", None),
    )
    .await;

    let html = body_text(send(&app, get("/review/", None)).await).await;
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}
