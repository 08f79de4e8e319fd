mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

use common::{generate_unique_username, send, setup_test_app};

async fn signup(app: &axum::Router, username: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@test.com", username),
            "password": "secret123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_returns_token_pair(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = generate_unique_username();

    let body = signup(&app, &username).await;

    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    let access_expiry = body["access_token_expires_at"].as_i64().unwrap();
    let refresh_expiry = body["refresh_token_expires_at"].as_i64().unwrap();
    assert!(refresh_expiry > access_expiry);
    assert_eq!(body["user"]["username"], username.as_str());
    assert!(body["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_persists_one_family(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    signup(&app, &generate_unique_username()).await;

    let (families,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM refresh_tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(families, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_duplicate_username(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = generate_unique_username();
    signup(&app, &username).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "username": username,
            "email": "someone.else@test.com",
            "password": "secret123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "duplicate_user");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_validation(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "username": "al",
            "email": "a@b.com",
            "password": "secret123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation_error");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_rejects_usernames_login_cannot_reach(pool: PgPool) {
    let app = setup_test_app(pool);

    for username in ["bob@home", "  bob  "] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "username": username,
                "email": "real@b.com",
                "password": "secret123"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{username:?}");
        assert_eq!(body["code"], "validation_error");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_by_username_and_email(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = generate_unique_username();
    signup(&app, &username).await;

    for identifier in [username.clone(), format!("{}@test.com", username)] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": identifier, "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["user"]["username"], username.as_str());
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_failures_are_indistinguishable(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = generate_unique_username();
    signup(&app, &username).await;

    let (wrong_status, wrong_body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": "wrongpass" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "nobody_here", "password": "wrongpass" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["code"], "invalid_credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_issues_access_token(pool: PgPool) {
    let app = setup_test_app(pool);
    let tokens = signup(&app, &generate_unique_username()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": tokens["refresh_token"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["refresh_token"], tokens["refresh_token"]);
    assert_eq!(body["refresh_token_expires_at"], tokens["refresh_token_expires_at"]);

    let access_token = body["access_token"].as_str().unwrap();
    let (status, _) = send(&app, "GET", "/api/users/me", Some(access_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_access_token(pool: PgPool) {
    let app = setup_test_app(pool);
    let tokens = signup(&app, &generate_unique_username()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": tokens["access_token"] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_wrong_type");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_returns_claims(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = generate_unique_username();
    let tokens = signup(&app, &username).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/verify",
        None,
        Some(json!({ "token": tokens["access_token"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["typ"], "access");
    assert_eq!(body["sub"], tokens["user"]["id"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_garbage_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/verify",
        None,
        Some(json!({ "token": "not.a.jwt" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_malformed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signup_verify_logout_refresh(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, tokens) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "username": "alice", "email": "a@b.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let access_token = tokens["access_token"].as_str().unwrap();
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    let (status, claims) = send(
        &app,
        "POST",
        "/api/auth/verify",
        None,
        Some(json!({ "token": access_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claims["username"], "alice");

    let (status, _) = send(&app, "POST", "/api/auth/logout", Some(refresh_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_revoked");

    let (status, body) = send(&app, "GET", "/api/users/me", Some(access_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_revoked");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_is_idempotent(pool: PgPool) {
    let app = setup_test_app(pool);
    let tokens = signup(&app, &generate_unique_username()).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    for _ in 0..2 {
        let (status, _) = send(&app, "POST", "/api/auth/logout", Some(refresh_token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_header_errors(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "POST", "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "missing_token");

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revoke_only_ends_one_session(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = generate_unique_username();
    let first = signup(&app, &username).await;

    let (status, second) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/revoke",
        None,
        Some(json!({ "refresh_token": first["refresh_token"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let first_access = first["access_token"].as_str().unwrap();
    let second_access = second["access_token"].as_str().unwrap();

    let (status, _) = send(&app, "GET", "/api/users/me", Some(first_access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, me) = send(&app, "GET", "/api/users/me", Some(second_access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], username.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_requires_access_token(pool: PgPool) {
    let app = setup_test_app(pool);
    let tokens = signup(&app, &generate_unique_username()).await;

    let (status, _) = send(&app, "GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let refresh_token = tokens["refresh_token"].as_str().unwrap();
    let (status, body) = send(&app, "GET", "/api/users/me", Some(refresh_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_wrong_type");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health(pool: PgPool) {
    let app = setup_test_app(pool);
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_reports_unreachable_database(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    pool.close().await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}
