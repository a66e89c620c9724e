use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use minibin::cache::PasteCache;
use minibin::commands::serve::router;
use minibin::config::Config;
use minibin::db::Database;
use minibin::App;

const IDENTITY_HEADER: &str = "x-auth-request-email";

async fn test_app(cache_enabled: bool) -> (App, Router, tempfile::TempPath) {
    let path = tempfile::NamedTempFile::new()
        .expect("temp file")
        .into_temp_path();

    let mut config = Config::default();
    config.cache.enabled = cache_enabled;

    let database = Database::connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await
        .expect("connect");
    let cache = PasteCache::new(&config.cache);

    let app = App {
        config,
        database,
        cache,
    };

    (app.clone(), router(app), path)
}

/// POST a paste as `author` and return `(public id, delid cookie value)`.
async fn save(router: &Router, author: &str, content: &str) -> (String, String) {
    let body = format!("content={}", urlencoding::encode(content));
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/paste")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(IDENTITY_HEADER, author)
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response.headers()[header::LOCATION]
        .to_str()
        .expect("location")
        .to_owned();
    let id = location.trim_start_matches('/').to_owned();

    let set_cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .expect("set-cookie");
    let delid = set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("delid="))
        .expect("delid cookie")
        .to_owned();

    (id, delid)
}

async fn show(router: &Router, id: &str, viewer: Option<&str>) -> (StatusCode, String) {
    let mut request = Request::builder().uri(format!("/{id}"));
    if let Some(email) = viewer {
        request = request.header(IDENTITY_HEADER, email);
    }
    let response = router
        .clone()
        .oneshot(request.body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await.expect("body");
    (status, String::from_utf8(body.to_vec()).expect("utf-8"))
}

#[tokio::test]
async fn save_then_show_round_trip() {
    let (_app, router, _path) = test_app(true).await;

    let (id, _delid) = save(&router, "alice@example.com", "hello world").await;
    assert_eq!(id.len(), 8);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));

    let (status, body) = show(&router, &id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("hello world"));
}

#[tokio::test]
async fn content_is_html_escaped() {
    let (_app, router, _path) = test_app(true).await;

    let (id, _delid) = save(&router, "alice@example.com", "<script>alert(\"x\")</script>").await;

    let (status, body) = show(&router, &id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<script>alert"));
}

#[tokio::test]
async fn show_is_consistent_with_and_without_cache() {
    for cache_enabled in [true, false] {
        let (_app, router, _path) = test_app(cache_enabled).await;

        let (id, _delid) = save(&router, "alice@example.com", "same either way").await;

        let (status, body) = show(&router, &id, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("same either way"));
    }
}

#[tokio::test]
async fn show_is_served_from_cache_after_store_loss() {
    let (mut app, router, _path) = test_app(true).await;

    let (id, delid) = save(&router, "alice@example.com", "cached copy").await;

    // Remove the backing row directly; the projection added on save
    // still serves reads.
    app.database.delete_paste(&delid).await.expect("delete row");

    let (status, body) = show(&router, &id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("cached copy"));
}

#[tokio::test]
async fn show_misses_store_loss_with_cache_disabled() {
    let (mut app, router, _path) = test_app(false).await;

    let (id, delid) = save(&router, "alice@example.com", "gone").await;
    app.database.delete_paste(&delid).await.expect("delete row");

    let (status, _body) = show(&router, &id, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn email_hidden_from_unauthenticated_viewers() {
    let (_app, router, _path) = test_app(true).await;

    let (id, _delid) = save(&router, "alice@example.com", "attributed").await;

    let (_status, body) = show(&router, &id, None).await;
    assert!(!body.contains("alice@example.com"));

    let (_status, body) = show(&router, &id, Some("bob@example.com")).await;
    assert!(body.contains("alice@example.com"));
}

#[tokio::test]
async fn delete_then_show_is_not_found() {
    let (_app, router, _path) = test_app(true).await;

    let (id, delid) = save(&router, "alice@example.com", "short-lived").await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/oops")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(IDENTITY_HEADER, "alice@example.com")
                .body(Body::from(format!("delid={delid}")))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let (status, _body) = show(&router, &id, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_unknown_key_still_redirects_home() {
    let (_app, router, _path) = test_app(true).await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/oops")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(IDENTITY_HEADER, "alice@example.com")
                .body(Body::from("delid=never-existed"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn deletion_cookie_is_single_use() {
    let (_app, router, _path) = test_app(true).await;

    let (id, delid) = save(&router, "alice@example.com", "deletable").await;

    // First view with the cookie surfaces the delete affordance and
    // clears the cookie.
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{id}"))
                .header(header::COOKIE, format!("delid={delid}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|value| {
            let value = value.to_str().unwrap_or_default();
            value.starts_with("delid=") && value.contains("Max-Age=0")
        });
    assert!(cleared, "first view should clear the deletion cookie");

    let body = hyper::body::to_bytes(response.into_body()).await.expect("body");
    let body = String::from_utf8(body.to_vec()).expect("utf-8");
    assert!(body.contains("/oops"));
    assert!(body.contains(&delid));

    // A later view without the cookie does not re-offer it.
    let (_status, body) = show(&router, &id, None).await;
    assert!(!body.contains("/oops"));
}

#[tokio::test]
async fn gated_routes_redirect_to_login() {
    let (_app, router, _path) = test_app(true).await;

    for request in [
        Request::builder().uri("/").body(Body::empty()).unwrap(),
        Request::builder()
            .method("POST")
            .uri("/paste")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("content=nope"))
            .unwrap(),
        Request::builder()
            .method("POST")
            .uri("/oops")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("delid=nope"))
            .unwrap(),
    ] {
        let response = router.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION]
            .to_str()
            .expect("location");
        assert!(location.starts_with("/login?next="), "got {location}");
    }
}

#[tokio::test]
async fn show_requires_no_authentication() {
    let (_app, router, _path) = test_app(true).await;

    let (id, _delid) = save(&router, "alice@example.com", "public").await;
    let (status, _body) = show(&router, &id, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn show_unknown_id_is_not_found() {
    let (_app, router, _path) = test_app(true).await;

    let (status, _body) = show(&router, "Missing1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn title_is_stored_and_rendered() {
    let (_app, router, _path) = test_app(true).await;

    let body = format!(
        "content={}&title={}",
        urlencoding::encode("fn main() {}"),
        urlencoding::encode("my snippet")
    );
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/paste")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(IDENTITY_HEADER, "alice@example.com")
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let id = response.headers()[header::LOCATION]
        .to_str()
        .expect("location")
        .trim_start_matches('/')
        .to_owned();

    let (status, body) = show(&router, &id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("my snippet"));
}
