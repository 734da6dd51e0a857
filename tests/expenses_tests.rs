use actix_web::http::StatusCode;
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

mod common;

use common::{TestContext, init_app, send};

fn expense(amount: Value) -> Value {
    json!({
        "description": "Client dinner",
        "amount": amount,
        "category": "Meals",
        "date": "2024-06-01",
        "notes": "Q2 kickoff"
    })
}

#[actix_web::test]
async fn test_post_expense_deducts_from_balance() {
    let ctx = TestContext::new();
    let employee = ctx.employee(1000).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(employee.auth_header())
        .set_json(expense(json!(250.5)))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], json!(250.5));
    assert_eq!(body["userId"], employee.id().to_string());
    assert_eq!(body["date"], "2024-06-01");
    assert!(body.get("status").is_none());

    let req = test::TestRequest::get()
        .uri("/api/expenses/balance")
        .insert_header(employee.auth_header())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "budget": 1000.0, "spent": 250.5, "balance": 749.5 })
    );
}

#[actix_web::test]
async fn test_insufficient_balance_reports_both_figures() {
    let ctx = TestContext::new();
    let employee = ctx.employee(1000).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(employee.auth_header())
        .set_json(expense(json!(200)))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(employee.auth_header())
        .set_json(expense(json!(900)))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "Insufficient balance", "balance": 800.0, "requested": 900.0 })
    );

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(employee.auth_header())
        .set_json(expense(json!("800")))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/expenses/balance")
        .insert_header(employee.auth_header())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["spent"], json!(1000.0));
    assert_eq!(body["balance"], json!(0.0));
}

#[actix_web::test]
async fn test_post_expense_validates_input() {
    let ctx = TestContext::new();
    let employee = ctx.employee(1000).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(employee.auth_header())
        .set_json(json!({ "amount": 10, "category": "Meals", "date": "2024-06-01" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Required fields missing" }));

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(employee.auth_header())
        .set_json(expense(json!(-5)))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_expense_listing_is_scoped_by_role() {
    let ctx = TestContext::new();
    let employer = ctx.employer().await;
    let alice = ctx.employee(500).await;
    let bob = ctx.employee(500).await;
    let app = init_app!(ctx);

    for (user, amount) in [(&alice, 10), (&bob, 20), (&bob, 30)] {
        let req = test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(user.auth_header())
            .set_json(expense(json!(amount)))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/expenses")
        .insert_header(bob.auth_header())
        .to_request();
    let (_, body) = send(&app, req).await;
    let own = body.as_array().unwrap();
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|e| e["userId"] == bob.id().to_string()));
    // Newest first
    assert_eq!(own[0]["amount"], json!(30.0));

    let req = test::TestRequest::get()
        .uri("/api/expenses")
        .insert_header(employer.auth_header())
        .to_request();
    let (_, body) = send(&app, req).await;
    let all = body.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2]["userName"], alice.user.full_name());
    assert_eq!(all[2]["userEmail"], alice.user.email);
}

#[actix_web::test]
async fn test_stats_shape_depends_on_role() {
    let ctx = TestContext::new();
    let employer = ctx.employer().await;
    let employee = ctx.employee(1000).await;
    ctx.employee(500).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(employee.auth_header())
        .set_json(expense(json!(100)))
        .to_request();
    send(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/budget-requests")
        .insert_header(employee.auth_header())
        .set_json(json!({ "requestedAmount": 300, "reason": "Conference" }))
        .to_request();
    send(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/expenses/stats")
        .insert_header(employee.auth_header())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "totalBudget": 1000.0,
            "spent": 100.0,
            "balance": 900.0,
            "pendingRequest": 300.0,
            "totalExpenses": 1
        })
    );

    let req = test::TestRequest::get()
        .uri("/api/expenses/stats")
        .insert_header(employer.auth_header())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "totalEmployees": 2,
            "totalBudget": 1500.0,
            "totalSpent": 100.0,
            "pendingApproval": 300.0
        })
    );
}
