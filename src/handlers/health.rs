use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::router::BudgetState;

/// GET / -> static service metadata, no authentication.
pub async fn service_info(State(state): State<BudgetState>) -> Json<Value> {
    Json(json!({
        "message": format!("{} is running", state.app_name),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.environment.as_ref(),
    }))
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
