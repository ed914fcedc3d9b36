use axum::{Json, extract::State, http::StatusCode};

use crate::db::models::Account;
use crate::error::BudgetError;
use crate::middleware::auth::CurrentUser;
use crate::middleware::extract::{ValidJson, ValidPath};
use crate::router::BudgetState;
use crate::types::account::{CreateAccount, UpdateAccount};

/// GET /api/accounts
pub async fn list_accounts(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Account>>, BudgetError> {
    Ok(Json(state.storage.list_accounts(user.id).await?))
}

/// GET /api/accounts/{id}
pub async fn get_account(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Account>, BudgetError> {
    Ok(Json(state.storage.get_account(user.id, id).await?))
}

/// POST /api/accounts
pub async fn create_account(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<CreateAccount>,
) -> Result<(StatusCode, Json<Account>), BudgetError> {
    let account = state.storage.create_account(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /api/accounts/{id}
pub async fn update_account(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(patch): ValidJson<UpdateAccount>,
) -> Result<Json<Account>, BudgetError> {
    Ok(Json(state.storage.update_account(user.id, id, patch).await?))
}

/// DELETE /api/accounts/{id}
pub async fn delete_account(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, BudgetError> {
    state.storage.delete_account(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
