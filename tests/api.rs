//! End-to-end API tests driving the router directly.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use charity_portal::config::Config;
use charity_portal::{create_router, AppState};

struct TestApp {
    app: Router,
    _dir: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.database.path = dir.path().join("test.db").to_str().unwrap().to_string();
    config.storage.uploads_path = dir.path().join("uploads").to_str().unwrap().to_string();
    config.jwt.secret = "integration-test-secret".to_string();
    std::fs::create_dir_all(&config.storage.uploads_path).unwrap();

    let state = AppState::new(config).await.unwrap();
    TestApp {
        app: create_router(state),
        _dir: dir,
    }
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register the first (admin) user and log in, returning the `token=` cookie
async fn login_admin(app: &Router) -> String {
    let (status, _) = send_json(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "admin@example.org",
            "name": "Admin",
            "password": "a-long-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "admin@example.org", "password": "a-long-password"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));

    set_cookie.split(';').next().unwrap().to_string()
}

fn multipart_request(uri: &str, cookie: &str, field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn login_with_wrong_password_sets_no_cookie() {
    let TestApp { app, _dir } = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "admin@example.org",
            "name": "Admin",
            "password": "a-long-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "admin@example.org", "password": "wrong"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn register_never_returns_the_password_hash() {
    let TestApp { app, _dir } = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "admin@example.org",
            "name": "Admin",
            "password": "a-long-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["role"], json!("admin"));
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());
    // Registration confirmation is attempted but reported separately
    assert_eq!(body["data"]["notification"]["delivered"], json!(false));
}

#[tokio::test]
async fn mutating_routes_require_admin() {
    let TestApp { app, _dir } = spawn_app().await;
    let cookie = login_admin(&app).await;

    // No cookie: unauthorized
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/directors",
        None,
        Some(json!({"name": "Jane", "position": "Chair"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Second registered user is not an admin: forbidden
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "user@example.org",
            "name": "User",
            "password": "another-long-one"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "user@example.org", "password": "another-long-one"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let user_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/directors",
        Some(&user_cookie),
        Some(json!({"name": "Jane", "position": "Chair"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin succeeds
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/directors",
        Some(&cookie),
        Some(json!({"name": "Jane", "position": "Chair"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], json!("Jane"));
}

#[tokio::test]
async fn donation_and_inquiry_reads_are_admin_only() {
    let TestApp { app, _dir } = spawn_app().await;
    let cookie = login_admin(&app).await;

    // Public submission works unauthenticated
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/donations",
        None,
        Some(json!({
            "donor_name": "Sam",
            "donor_email": "sam@example.org",
            "amount": 25.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], json!("pending"));
    assert_eq!(body["data"]["notification"]["delivered"], json!(false));

    // Reads are gated
    let (status, _) = send_json(&app, "GET", "/api/donations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(&app, "GET", "/api/donations", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["count"], json!(1));
}

#[tokio::test]
async fn gallery_scenario_upload_forces_image_type() {
    let TestApp { app, _dir } = spawn_app().await;
    let cookie = login_admin(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/gallery",
        Some(&cookie),
        Some(json!({"title": "X", "media_type": "video", "category": "events"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["media_url"], json!(""));

    // Upload an image; media_type must follow the payload, not the record
    let request = multipart_request(
        &format!("/api/gallery/{}/media", id),
        &cookie,
        "media",
        "photo.png",
        "image/png",
        b"not really a png",
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["data"]["media_type"], json!("image"));
    let media_url = body["data"]["media_url"].as_str().unwrap();
    assert!(media_url.starts_with("/uploads/images/"));

    // The stored file is served back from the uploads tree
    let request = Request::builder()
        .method("GET")
        .uri(media_url)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&served[..], b"not really a png");
}

#[tokio::test]
async fn upload_without_file_is_invalid_input_and_changes_nothing() {
    let TestApp { app, _dir } = spawn_app().await;
    let cookie = login_admin(&app).await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/gallery",
        Some(&cookie),
        Some(json!({"title": "X", "category": "events"})),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Multipart body with no `media` field
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let body_bytes = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/gallery/{}/media", id))
        .header(header::COOKIE, &cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body_bytes))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, body) = send_json(&app, "GET", &format!("/api/gallery/{}", id), None, None).await;
    assert_eq!(body["data"]["media_url"], json!(""));
}

#[tokio::test]
async fn gallery_list_paginates_with_filters() {
    let TestApp { app, _dir } = spawn_app().await;
    let cookie = login_admin(&app).await;

    for i in 0..25 {
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/gallery",
            Some(&cookie),
            Some(json!({"title": format!("Item {}", i), "category": "events"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/gallery?category=events&page=2&limit=12",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(25));
    assert_eq!(body["count"], json!(12));
    assert_eq!(body["pagination"]["page"], json!(2));
    assert_eq!(body["pagination"]["pages"], json!(3));
}

#[tokio::test]
async fn validation_errors_name_the_failing_fields() {
    let TestApp { app, _dir } = spawn_app().await;
    let cookie = login_admin(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/gallery",
        Some(&cookie),
        Some(json!({"title": "  ", "category": "nonsense"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["fields"], json!(["title", "category"]));
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let TestApp { app, _dir } = spawn_app().await;
    let cookie = login_admin(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("Max-Age=0") || set_cookie.contains("Expires="));
}
