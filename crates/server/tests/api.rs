use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::ServerOptions;

async fn app() -> Router {
    app_with(&ServerOptions::default()).await.0
}

/// Router plus a handle on the connection it uses.
async fn app_with(options: &ServerOptions) -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (server::router(engine, options), db)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, amount: Value, description: &str, category: &str, date: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/expenses",
        Some(json!({
            "amount": amount,
            "description": description,
            "category": category,
            "date": date,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn health_reports_connected_store() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK", "database": "Connected"}));
}

#[tokio::test]
async fn categories_lists_fixed_labels() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let labels = body.as_array().unwrap();
    assert_eq!(labels.len(), 10);
    assert_eq!(labels[0], "Food & Dining");
    assert_eq!(labels[9], "Other");
}

#[tokio::test]
async fn create_echoes_fields_with_generated_id() {
    let app = app().await;
    let body = create(&app, json!(12.5), "Lunch", "Food & Dining", "2024-03-01").await;

    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["amount"], "12.50");
    assert_eq!(body["description"], "Lunch");
    assert_eq!(body["category"], "Food & Dining");
    assert_eq!(body["date"], "2024-03-01");
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn create_rejects_invalid_bodies_with_reason() {
    let app = app().await;
    let cases = [
        (json!({"amount": 5, "description": "x", "category": "Other"}), "All fields are required"),
        (
            json!({"amount": "abc", "description": "x", "category": "Other", "date": "2024-01-01"}),
            "Invalid amount",
        ),
        (
            json!({"amount": -4, "description": "x", "category": "Other", "date": "2024-01-01"}),
            "Invalid amount",
        ),
        (
            json!({"amount": 4, "description": "   ", "category": "Other", "date": "2024-01-01"}),
            "Description cannot be empty",
        ),
    ];

    for (body, message) in cases {
        let (status, response) = send(&app, Method::POST, "/api/expenses", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], message);
    }

    let (_, listing) = send(&app, Method::GET, "/api/expenses", None).await;
    assert_eq!(listing["pagination"]["totalItems"], 0);
}

#[tokio::test]
async fn store_validation_errors_list_details() {
    let app = app().await;
    let long = "x".repeat(256);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({"amount": 1, "description": long, "category": "Other", "date": "2024-01-01"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(body["details"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_then_list_returns_new_values() {
    let app = app().await;
    let created = create(&app, json!("10"), "Taxi", "Transportation", "2024-02-01").await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/expenses/{id}"),
        Some(json!({"amount": "22.40", "description": "Taxi home", "category": "Travel", "date": "2024-02-02"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["amount"], "22.40");

    let (_, listing) = send(&app, Method::GET, "/api/expenses", None).await;
    let row = &listing["expenses"][0];
    assert_eq!(row["description"], "Taxi home");
    assert_eq!(row["category"], "Travel");
    assert_eq!(row["date"], "2024-02-02");
}

#[tokio::test]
async fn update_and_delete_unknown_id_are_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/expenses/999",
        Some(json!({"amount": 1, "description": "x", "category": "Other", "date": "2024-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Expense not found");

    let (status, body) = send(&app, Method::DELETE, "/api/expenses/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Expense not found");
}

#[tokio::test]
async fn delete_confirms_and_removes_from_listing() {
    let app = app().await;
    let created = create(&app, json!(3), "Coffee", "Food & Dining", "2024-01-05").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/expenses/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Expense deleted", "id": id}));

    let (_, listing) = send(&app, Method::GET, "/api/expenses", None).await;
    assert_eq!(listing["expenses"], json!([]));
}

#[tokio::test]
async fn list_paginates_and_filters() {
    let app = app().await;
    for day in 1..=12 {
        let category = if day % 2 == 0 { "Shopping" } else { "Other" };
        create(&app, json!(1), &format!("item {day}"), category, &format!("2024-01-{day:02}")).await;
    }

    let (_, page3) = send(&app, Method::GET, "/api/expenses?page=3&limit=5", None).await;
    assert_eq!(page3["expenses"].as_array().unwrap().len(), 2);
    assert_eq!(
        page3["pagination"],
        json!({"currentPage": 3, "totalPages": 3, "totalItems": 12})
    );

    let (_, page4) = send(&app, Method::GET, "/api/expenses?page=4&limit=5", None).await;
    assert_eq!(page4["expenses"], json!([]));
    assert_eq!(page4["pagination"]["currentPage"], 4);

    let (_, shopping) = send(
        &app,
        Method::GET,
        "/api/expenses?category=Shopping&startDate=2024-01-04&endDate=2024-01-08",
        None,
    )
    .await;
    assert_eq!(shopping["pagination"]["totalItems"], 3);

    let (_, all) = send(
        &app,
        Method::GET,
        "/api/expenses?category=all&startDate=&endDate=",
        None,
    )
    .await;
    assert_eq!(all["pagination"]["totalItems"], 12);
}

#[tokio::test]
async fn summary_matches_expected_shares() {
    let app = app().await;
    create(&app, json!(100), "Groceries", "Food & Dining", "2024-04-01").await;
    create(&app, json!(200), "Dinner", "Food & Dining", "2024-04-02").await;
    create(&app, json!(100), "Train", "Transportation", "2024-04-03").await;

    let (status, body) = send(&app, Method::GET, "/api/expenses/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"category": "Food & Dining", "total": "300.00", "count": 2, "percentage": "75.0"},
            {"category": "Transportation", "total": "100.00", "count": 1, "percentage": "25.0"},
        ])
    );

    let (status, empty) = send(
        &app,
        Method::GET,
        "/api/expenses/summary?startDate=2030-01-01&endDate=2030-12-31",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!([]));
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/api/expenses?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/api/expenses/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({"amount": 1, "description": 7, "category": "Other", "date": "2024-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_lost_store() {
    let (app, db) = app_with(&ServerOptions::default()).await;
    db.close().await.unwrap();

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "Error", "database": "Disconnected"}));
}

#[tokio::test]
async fn huge_page_or_limit_returns_empty_page() {
    let app = app().await;
    create(&app, json!(1), "Tea", "Other", "2024-01-01").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/expenses?page=4611686018427387904&limit=5",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expenses"], json!([]));
    assert_eq!(
        body["pagination"],
        json!({"currentPage": 4611686018427387904u64, "totalPages": 1, "totalItems": 1})
    );

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/expenses?limit=18446744073709551615",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expenses"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["pagination"],
        json!({"currentPage": 1, "totalPages": 1, "totalItems": 1})
    );
}

#[tokio::test]
async fn exponent_amounts_are_accepted() {
    let app = app().await;
    let body = create(&app, json!("1e3"), "Rent share", "Bills & Utilities", "2024-02-01").await;
    assert_eq!(body["amount"], "1000.00");

    let body = create(&app, json!("2.5E2"), "Groceries", "Food & Dining", "2024-02-02").await;
    assert_eq!(body["amount"], "250.00");
}

#[tokio::test]
async fn unrepresentable_amount_is_a_store_violation() {
    let app = app().await;
    for amount in [json!(1e17), json!("1e30")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/expenses",
            Some(json!({"amount": amount, "description": "x", "category": "Other", "date": "2024-01-01"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Validation Error", "details": ["amount must not exceed 99999999.99"]})
        );
    }
}

#[tokio::test]
async fn category_filter_matches_exact_text() {
    let app = app().await;
    create(&app, json!(5), "Misc", "Other", "2024-01-01").await;

    let (_, padded) = send(&app, Method::GET, "/api/expenses?category=%20Other", None).await;
    assert_eq!(padded["pagination"]["totalItems"], 0);

    let (_, exact) = send(&app, Method::GET, "/api/expenses?category=Other", None).await;
    assert_eq!(exact["pagination"]["totalItems"], 1);
}

#[tokio::test]
async fn wildcard_origin_is_ignored() {
    let (app, _db) = app_with(&ServerOptions {
        allowed_origins: vec!["*".to_string(), "http://localhost:3000".to_string()],
    })
    .await;

    let request = Request::builder()
        .uri("/api/categories")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let request = Request::builder()
        .uri("/api/categories")
        .header(header::ORIGIN, "http://elsewhere.test")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
