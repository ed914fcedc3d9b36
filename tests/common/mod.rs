#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use envelope_budget::identity::{ExternalProfile, IdentityProvider};
use envelope_budget::{BudgetError, BudgetState, BudgetStorage, budget_router};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::Barrier;
use tower::ServiceExt;

pub const ALICE: &str = "tok:alice";
pub const BOB: &str = "tok:bob";

static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Tokens look like `tok:<subject>`; anything else fails verification.
///
/// - subject `ghost` verifies but has no profile
/// - subjects starting with `noemail` have a profile without email
/// - with a barrier set, `fetch_profile` waits on it, lining up concurrent logins
#[derive(Default)]
pub struct FakeIdentity {
    pub barrier: Option<Arc<Barrier>>,
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify_token(&self, token: &str) -> Result<String, BudgetError> {
        token
            .strip_prefix("tok:")
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| BudgetError::Unauthorized("unknown token".to_string()))
    }

    async fn fetch_profile(&self, subject: &str) -> Result<Option<ExternalProfile>, BudgetError> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if subject == "ghost" {
            return Ok(None);
        }
        let email = (!subject.starts_with("noemail")).then(|| format!("{subject}@example.com"));
        Ok(Some(ExternalProfile { email }))
    }
}

pub struct TestApp {
    pub app: Router,
    pub storage: BudgetStorage,
    db_path: PathBuf,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(FakeIdentity::default()).await
    }

    pub async fn spawn_with(identity: FakeIdentity) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut db_path = std::env::temp_dir();
        db_path.push(format!(
            "envelope-budget-test-{}-{}-{}.sqlite",
            std::process::id(),
            nanos,
            DB_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let database_url = format!("sqlite:{}", db_path.display());
        let storage = BudgetStorage::connect(&database_url)
            .await
            .expect("failed to open test database");
        let state = BudgetState::new(storage.clone(), Arc::new(identity), "Test API", "test");

        Self {
            app: budget_router(state),
            storage,
            db_path,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let resp = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("request failed");

        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body was not json")
        };
        (status, value)
    }

    pub async fn get(&self, token: &str, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, token: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, token: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, token: &str, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, Some(token), None).await
    }

    /// POST and return the new row's id, asserting 201.
    pub async fn create(&self, token: &str, uri: &str, body: Value) -> i64 {
        let (status, json) = self.post(token, uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {json}");
        json["id"].as_i64().expect("created row has an id")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.storage.pool())
            .await
            .expect("count query failed")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
    }
}

/// Account + group + category owned by `token`: returns (account_id, group_id, category_id).
pub async fn seed_budget(app: &TestApp, token: &str) -> (i64, i64, i64) {
    let account_id = app
        .create(
            token,
            "/api/accounts",
            serde_json::json!({"name": "Checking", "type": "checking", "balance": "100.00"}),
        )
        .await;
    let group_id = app
        .create(
            token,
            "/api/categories/groups",
            serde_json::json!({"name": "Bills", "sort_order": 0}),
        )
        .await;
    let category_id = app
        .create(
            token,
            "/api/categories",
            serde_json::json!({"name": "Rent", "category_group_id": group_id}),
        )
        .await;
    (account_id, group_id, category_id)
}
