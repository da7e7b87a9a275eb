// SPDX-License-Identifier: MIT

//! End-to-end HTTP flows over a real MongoDB: signup, signin, profile
//! fetch, multipart post creation, and comment round-trips, all through
//! the router with the envelope shape asserted at the wire.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sign a user up and in over HTTP; returns (user id, session token).
async fn signup_and_signin(app: &axum::Router, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/signup",
            serde_json::json!({
                "name": "Flow User",
                "email": email,
                "password": "hunter22",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true, "signup failed: {}", json["msg"]);
    let user_id = json["details"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/signin",
            serde_json::json!({ "email": email, "password": "hunter22" }),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["success"], true, "signin failed: {}", json["msg"]);
    let token = json["token"].as_str().unwrap().to_string();

    (user_id, token)
}

#[tokio::test]
async fn test_signup_signin_get_details_flow() {
    require_mongo!();
    let (app, _state) = common::create_mongo_app().await;
    let email = common::unique_email("flow");

    let (user_id, token) = signup_and_signin(&app, &email).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/users/get-details/{}", user_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["details"]["email"], email);
    assert!(json["details"].get("password").is_none());
    assert!(json["details"].get("login_tokens").is_none());
}

#[tokio::test]
async fn test_signin_with_wrong_password_is_200_failure() {
    require_mongo!();
    let (app, _state) = common::create_mongo_app().await;
    let email = common::unique_email("wrongpw");

    signup_and_signin(&app, &email).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/users/signin",
            serde_json::json!({ "email": email, "password": "not-it" }),
        ))
        .await
        .unwrap();

    // Domain failures ride a 200 with success=false, never an error status
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["msg"], "Incorrect password.");
    assert!(json.get("token").is_none());
}

#[tokio::test]
async fn test_signup_validation_failure_names_the_problem() {
    require_mongo!();
    let (app, _state) = common::create_mongo_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/users/signup",
            serde_json::json!({
                "name": "Short",
                "email": common::unique_email("shortpw"),
                "password": "abc",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["msg"], "Password must be at least 6 characters.");
}

#[tokio::test]
async fn test_multipart_post_upload_and_public_fetch() {
    require_mongo!();
    let (app, state) = common::create_mongo_app().await;
    let email = common::unique_email("upload");
    let (_user_id, token) = signup_and_signin(&app, &email).await;

    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let image_bytes = b"\x89PNG\r\n\x1a\nfakeimagedata";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\ncontent-disposition: form-data; name=\"caption\"\r\n\r\nhello world\r\n--{b}\r\ncontent-disposition: form-data; name=\"imageUrl\"; filename=\"pic.png\"\r\ncontent-type: image/png\r\n\r\n",
            b = boundary
        )
        .as_bytes(),
    );
    body.extend_from_slice(image_bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/posts")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true, "upload failed: {}", json["msg"]);
    assert_eq!(json["details"]["caption"], "hello world");

    let image_url = json["details"]["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(".png"));

    // The bytes landed under the upload dir
    let filename = image_url.trim_start_matches("/uploads/");
    let stored = std::fs::read(state.config.upload_dir.join(filename)).unwrap();
    assert_eq!(stored, image_bytes);

    // Single-post fetch is public: no token needed
    let post_id = json["details"]["id"].as_str().unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/posts/{}", post_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["details"]["image_url"], image_url);
}

#[tokio::test]
async fn test_post_without_caption_is_rejected() {
    require_mongo!();
    let (app, _state) = common::create_mongo_app().await;
    let email = common::unique_email("nocap");
    let (_user_id, token) = signup_and_signin(&app, &email).await;

    let boundary = "test-boundary-empty";
    let body = format!("--{b}--\r\n", b = boundary);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/posts")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["msg"], "Caption is required.");
}

#[tokio::test]
async fn test_comment_http_round_trip() {
    require_mongo!();
    let (app, state) = common::create_mongo_app().await;
    let email = common::unique_email("chttp");
    let (user_id, token) = signup_and_signin(&app, &email).await;

    // Create the post through the repository to keep this test about comments
    let user_oid = mongodb::bson::oid::ObjectId::parse_str(&user_id).unwrap();
    let post = state
        .posts
        .create(&user_oid, "commentable".into(), None)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/comments/{}", post.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "body": "first!" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true, "comment failed: {}", json["msg"]);
    assert_eq!(json["details"]["body"], "first!");

    // Listing a post's comments is public
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/comments/{}", post.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["details"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_logout_over_http_revokes_the_cookie_token() {
    require_mongo!();
    let db = common::test_db().await;
    let state = common::state_with(db.clone());
    let app = postboard::routes::create_router(state);
    let email = common::unique_email("hlogout");
    let (_user_id, token) = signup_and_signin(&app, &email).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/logout")
                .header(header::COOKIE, format!("session_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let stored = db
        .users()
        .unwrap()
        .find_one(mongodb::bson::doc! { "email": &email })
        .await
        .unwrap()
        .expect("user should still exist");
    assert!(
        stored.login_tokens.is_empty(),
        "the only session token must be revoked"
    );
}
