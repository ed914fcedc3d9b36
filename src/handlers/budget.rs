use axum::{Json, extract::State, http::StatusCode};

use crate::db::models::BudgetAllocation;
use crate::error::BudgetError;
use crate::middleware::auth::CurrentUser;
use crate::middleware::extract::{ValidJson, ValidPath, ValidQuery};
use crate::router::BudgetState;
use crate::types::budget::{BudgetFilter, CreateBudgetAllocation, UpdateBudgetAllocation};

/// GET /api/budget?month=YYYY-MM&category_id=
pub async fn list_budget_allocations(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidQuery(filter): ValidQuery<BudgetFilter>,
) -> Result<Json<Vec<BudgetAllocation>>, BudgetError> {
    Ok(Json(
        state.storage.list_budget_allocations(user.id, filter).await?,
    ))
}

pub async fn get_budget_allocation(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<BudgetAllocation>, BudgetError> {
    Ok(Json(state.storage.get_budget_allocation(user.id, id).await?))
}

/// POST /api/budget -> 409 when the category already has an allocation that month.
pub async fn create_budget_allocation(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<CreateBudgetAllocation>,
) -> Result<(StatusCode, Json<BudgetAllocation>), BudgetError> {
    let allocation = state
        .storage
        .create_budget_allocation(user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(allocation)))
}

pub async fn update_budget_allocation(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(patch): ValidJson<UpdateBudgetAllocation>,
) -> Result<Json<BudgetAllocation>, BudgetError> {
    Ok(Json(
        state
            .storage
            .update_budget_allocation(user.id, id, patch)
            .await?,
    ))
}

pub async fn delete_budget_allocation(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, BudgetError> {
    state.storage.delete_budget_allocation(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
