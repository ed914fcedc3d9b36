use axum::{Json, extract::State, http::StatusCode};

use crate::db::models::Transaction;
use crate::error::BudgetError;
use crate::middleware::auth::CurrentUser;
use crate::middleware::extract::{ValidJson, ValidPath, ValidQuery};
use crate::router::BudgetState;
use crate::types::transaction::{CreateTransaction, TransactionFilter, UpdateTransaction};

/// GET /api/transactions?account_id=&category_id=&start_date=&end_date=&cleared=
pub async fn list_transactions(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidQuery(filter): ValidQuery<TransactionFilter>,
) -> Result<Json<Vec<Transaction>>, BudgetError> {
    Ok(Json(state.storage.list_transactions(user.id, filter).await?))
}

pub async fn get_transaction(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Transaction>, BudgetError> {
    Ok(Json(state.storage.get_transaction(user.id, id).await?))
}

pub async fn create_transaction(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<CreateTransaction>,
) -> Result<(StatusCode, Json<Transaction>), BudgetError> {
    let transaction = state.storage.create_transaction(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn update_transaction(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(patch): ValidJson<UpdateTransaction>,
) -> Result<Json<Transaction>, BudgetError> {
    Ok(Json(state.storage.update_transaction(user.id, id, patch).await?))
}

pub async fn delete_transaction(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, BudgetError> {
    state.storage.delete_transaction(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
