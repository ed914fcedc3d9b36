mod common;

use axum::http::StatusCode;
use common::{ALICE, TestApp, seed_budget};
use serde_json::json;

#[tokio::test]
async fn one_allocation_per_category_and_month() {
    let app = TestApp::spawn().await;
    let (_, group_id, rent) = seed_budget(&app, ALICE).await;

    let (status, body) = app
        .post(
            ALICE,
            "/api/budget",
            json!({"category_id": rent, "month": "2025-03", "amount": "1500.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["month"], "2025-03");
    assert_eq!(body["amount"], "1500.00");

    let (status, body) = app
        .post(
            ALICE,
            "/api/budget",
            json!({"category_id": rent, "month": "2025-03", "amount": "1600.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(
        body["error"]["message"],
        "Budget allocation already exists for this category and month"
    );

    let (status, _) = app
        .post(
            ALICE,
            "/api/budget",
            json!({"category_id": rent, "month": "2025-04", "amount": "1500.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let utilities = app
        .create(
            ALICE,
            "/api/categories",
            json!({"name": "Utilities", "category_group_id": group_id}),
        )
        .await;
    let (status, _) = app
        .post(
            ALICE,
            "/api/budget",
            json!({"category_id": utilities, "month": "2025-03", "amount": "120"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(app.count("budget_allocations").await, 3);
}

#[tokio::test]
async fn malformed_months_are_rejected() {
    let app = TestApp::spawn().await;
    let (_, _, rent) = seed_budget(&app, ALICE).await;

    for month in ["2025-13", "2025-3", "25-03", "2025-00", "2025-03-01"] {
        let (status, body) = app
            .post(
                ALICE,
                "/api/budget",
                json!({"category_id": rent, "month": month, "amount": "10.00"}),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "month {month}");
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(body["error"]["fields"][0]["field"], "month");
    }

    let (status, _) = app.get(ALICE, "/api/budget?month=2025-13").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.count("budget_allocations").await, 0);
}

#[tokio::test]
async fn list_filters_by_month_and_category() {
    let app = TestApp::spawn().await;
    let (_, group_id, rent) = seed_budget(&app, ALICE).await;
    let food = app
        .create(
            ALICE,
            "/api/categories",
            json!({"name": "Food", "category_group_id": group_id}),
        )
        .await;

    for (category, month) in [(rent, "2025-03"), (rent, "2025-04"), (food, "2025-03")] {
        app.create(
            ALICE,
            "/api/budget",
            json!({"category_id": category, "month": month, "amount": "10.00"}),
        )
        .await;
    }

    let (status, body) = app.get(ALICE, "/api/budget?month=2025-03").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (_, body) = app
        .get(ALICE, &format!("/api/budget?category_id={rent}"))
        .await;
    let months: Vec<_> = body
        .as_array()
        .expect("list is an array")
        .iter()
        .map(|a| a["month"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(months, vec!["2025-03", "2025-04"]);

    let (_, body) = app
        .get(ALICE, &format!("/api/budget?month=2025-03&category_id={food}"))
        .await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn update_cannot_move_onto_an_occupied_month() {
    let app = TestApp::spawn().await;
    let (_, _, rent) = seed_budget(&app, ALICE).await;
    let march = app
        .create(
            ALICE,
            "/api/budget",
            json!({"category_id": rent, "month": "2025-03", "amount": "1500.00"}),
        )
        .await;
    app.create(
        ALICE,
        "/api/budget",
        json!({"category_id": rent, "month": "2025-04", "amount": "1500.00"}),
    )
    .await;
    let uri = format!("/api/budget/{march}");

    let (status, _) = app.put(ALICE, &uri, json!({"month": "2025-04"})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .put(ALICE, &uri, json!({"month": "2025-03", "amount": "1550.5"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["month"], "2025-03");
    assert_eq!(body["amount"], "1550.50");

    let (status, body) = app.put(ALICE, &uri, json!({"month": "2025-05"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["month"], "2025-05");
    assert_eq!(body["amount"], "1550.50");
}

#[tokio::test]
async fn amounts_with_too_many_decimals_are_rejected() {
    let app = TestApp::spawn().await;
    let (_, _, rent) = seed_budget(&app, ALICE).await;

    let (status, body) = app
        .post(
            ALICE,
            "/api/budget",
            json!({"category_id": rent, "month": "2025-03", "amount": "10.001"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["fields"][0]["field"], "amount");
}
