use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

mod common;

use common::{PASSWORD, TestContext, init_app, send};

#[actix_web::test]
async fn test_login_returns_token_and_user() {
    let ctx = TestContext::new();
    let employee = ctx.employee(500).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({
            "email": employee.user.email.to_uppercase(),
            "password": PASSWORD,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["id"], employee.id().to_string());
    assert_eq!(body["user"]["role"], "Employee");
    assert_eq!(body["user"]["budget"], json!(500.0));
    assert!(body["user"].get("passwordHash").is_none());

    // The issued token works against protected routes
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(common::auth_header(body["token"].as_str().unwrap()))
        .to_request();
    let (status, me) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], employee.user.email);
    assert_eq!(me["name"], employee.user.full_name());
}

#[actix_web::test]
async fn test_login_requires_both_fields() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "someone@example.com" }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Email and password are required" }));
}

#[actix_web::test]
async fn test_login_failures_do_not_reveal_which_factor() {
    let ctx = TestContext::new();
    let employee = ctx.employee(0).await;
    let app = init_app!(ctx);

    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": employee.user.email, "password": "wrong" }))
        .to_request();
    let (status, wrong_password_body) = send(&app, wrong_password).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let unknown_email = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ghost@example.com", "password": PASSWORD }))
        .to_request();
    let (status, unknown_email_body) = send(&app, unknown_email).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password_body, unknown_email_body);
    assert_eq!(
        wrong_password_body,
        json!({ "message": "Invalid email or password" })
    );
}

#[actix_web::test]
async fn test_protected_routes_require_a_valid_token() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "No token, authorization denied" }));

    let req = test::TestRequest::get()
        .uri("/api/expenses")
        .insert_header(common::auth_header("not-a-jwt"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Token is not valid" }));
}

#[actix_web::test]
async fn test_me_returns_not_found_for_deleted_user() {
    let ctx = TestContext::new();
    let employer = ctx.employer().await;
    let employee = ctx.employee(100).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/employees/{}", employee.id()))
        .insert_header(employer.auth_header())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(employee.auth_header())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "User not found" }));
}

#[actix_web::test]
async fn test_health_is_public_and_carries_correlation_id() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Correlation-ID", "trace-42"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-correlation-id").unwrap(), "trace-42");
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({ "status": "OK", "message": "CorticoExpense API is running" })
    );
}

#[actix_web::test]
async fn test_malformed_json_is_a_bad_request() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid request body" }));
}
