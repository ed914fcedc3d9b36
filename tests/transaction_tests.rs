mod common;

use axum::http::StatusCode;
use common::{ALICE, TestApp, seed_budget};
use serde_json::{Value, json};

fn payees(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("list is an array")
        .iter()
        .map(|t| t["payee"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn cleared_only_update_keeps_every_other_field() {
    let app = TestApp::spawn().await;
    let (account_id, _, category_id) = seed_budget(&app, ALICE).await;
    let (status, created) = app
        .post(
            ALICE,
            "/api/transactions",
            json!({
                "account_id": account_id,
                "category_id": category_id,
                "date": "2025-03-01",
                "payee": "Landlord",
                "amount": "-1500",
                "memo": "March rent"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["amount"], "-1500.00");
    assert_eq!(created["cleared"], false);

    let uri = format!("/api/transactions/{}", created["id"]);
    let (status, updated) = app.put(ALICE, &uri, json!({"cleared": true})).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = created.clone();
    expected["cleared"] = json!(true);
    assert_eq!(updated, expected);

    let (_, fetched) = app.get(ALICE, &uri).await;
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn explicit_null_clears_optional_fields_only() {
    let app = TestApp::spawn().await;
    let (account_id, _, category_id) = seed_budget(&app, ALICE).await;
    let id = app
        .create(
            ALICE,
            "/api/transactions",
            json!({
                "account_id": account_id,
                "category_id": category_id,
                "date": "2025-03-01",
                "payee": "Landlord",
                "amount": "-1500.00",
                "memo": "March rent"
            }),
        )
        .await;
    let uri = format!("/api/transactions/{id}");

    let (status, body) = app
        .put(ALICE, &uri, json!({"category_id": null, "memo": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category_id"], Value::Null);
    assert_eq!(body["memo"], Value::Null);
    assert_eq!(body["payee"], "Landlord");

    let (status, body) = app.put(ALICE, &uri, json!({"payee": null})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["fields"][0]["field"], "payee");
}

#[tokio::test]
async fn list_is_newest_first_and_filters_inclusively() {
    let app = TestApp::spawn().await;
    let (checking, _, rent) = seed_budget(&app, ALICE).await;
    let savings = app
        .create(
            ALICE,
            "/api/accounts",
            json!({"name": "Savings", "type": "savings"}),
        )
        .await;

    let rows = [
        (checking, Some(rent), "2025-03-01", "Landlord", true),
        (checking, None, "2025-03-15", "Grocer", false),
        (savings, None, "2025-03-31", "Interest", true),
        (checking, None, "2025-04-02", "Cafe", false),
    ];
    for (account_id, category_id, date, payee, cleared) in rows {
        app.create(
            ALICE,
            "/api/transactions",
            json!({
                "account_id": account_id,
                "category_id": category_id,
                "date": date,
                "payee": payee,
                "amount": "-10.00",
                "cleared": cleared
            }),
        )
        .await;
    }

    let (status, body) = app.get(ALICE, "/api/transactions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payees(&body), vec!["Cafe", "Interest", "Grocer", "Landlord"]);

    let (_, body) = app
        .get(
            ALICE,
            "/api/transactions?start_date=2025-03-01&end_date=2025-03-31",
        )
        .await;
    assert_eq!(payees(&body), vec!["Interest", "Grocer", "Landlord"]);

    let (_, body) = app
        .get(ALICE, &format!("/api/transactions?account_id={checking}&cleared=false"))
        .await;
    assert_eq!(payees(&body), vec!["Cafe", "Grocer"]);

    let (_, body) = app
        .get(ALICE, &format!("/api/transactions?category_id={rent}"))
        .await;
    assert_eq!(payees(&body), vec!["Landlord"]);
}

#[tokio::test]
async fn invalid_payloads_report_every_field() {
    let app = TestApp::spawn().await;
    let (account_id, _, _) = seed_budget(&app, ALICE).await;

    let (status, body) = app
        .post(
            ALICE,
            "/api/transactions",
            json!({
                "account_id": account_id,
                "date": "2025-03-01",
                "payee": "",
                "amount": "1.234"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["error"]["fields"]
        .as_array()
        .expect("fields listed")
        .iter()
        .map(|f| f["field"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(fields, vec!["payee", "amount"]);

    let (status, body) = app
        .post(ALICE, "/api/transactions", json!({"payee": "No account"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["fields"][0]["field"], "body");

    assert_eq!(app.count("transactions").await, 0);
}

#[tokio::test]
async fn deleting_twice_reports_missing() {
    let app = TestApp::spawn().await;
    let (account_id, _, _) = seed_budget(&app, ALICE).await;
    let id = app
        .create(
            ALICE,
            "/api/transactions",
            json!({
                "account_id": account_id,
                "date": "2025-03-01",
                "payee": "Refund",
                "amount": "25.00"
            }),
        )
        .await;
    let uri = format!("/api/transactions/{id}");

    let (status, body) = app.delete(ALICE, &uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app.delete(ALICE, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_a_validation_failure() {
    let app = TestApp::spawn().await;

    for uri in [
        "/api/transactions/abc",
        "/api/accounts/abc",
        "/api/categories/groups/1.5",
        "/api/budget/x",
    ] {
        let (status, body) = app.get(ALICE, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "GET {uri}");
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(body["error"]["fields"][0]["field"], "path");
    }

    let (status, _) = app.delete(ALICE, "/api/transactions/abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
