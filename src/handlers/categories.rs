use axum::{Json, extract::State, http::StatusCode};

use crate::db::models::{Category, CategoryGroup};
use crate::error::BudgetError;
use crate::middleware::auth::CurrentUser;
use crate::middleware::extract::{ValidJson, ValidPath, ValidQuery};
use crate::router::BudgetState;
use crate::types::category::{
    CategoryFilter, CreateCategory, CreateCategoryGroup, UpdateCategory, UpdateCategoryGroup,
};

// Category groups: /api/categories/groups

pub async fn list_category_groups(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CategoryGroup>>, BudgetError> {
    Ok(Json(state.storage.list_category_groups(user.id).await?))
}

pub async fn get_category_group(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<CategoryGroup>, BudgetError> {
    Ok(Json(state.storage.get_category_group(user.id, id).await?))
}

pub async fn create_category_group(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<CreateCategoryGroup>,
) -> Result<(StatusCode, Json<CategoryGroup>), BudgetError> {
    let group = state.storage.create_category_group(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn update_category_group(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(patch): ValidJson<UpdateCategoryGroup>,
) -> Result<Json<CategoryGroup>, BudgetError> {
    Ok(Json(
        state.storage.update_category_group(user.id, id, patch).await?,
    ))
}

pub async fn delete_category_group(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, BudgetError> {
    state.storage.delete_category_group(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Categories: /api/categories

/// GET /api/categories?group_id=
pub async fn list_categories(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidQuery(filter): ValidQuery<CategoryFilter>,
) -> Result<Json<Vec<Category>>, BudgetError> {
    Ok(Json(state.storage.list_categories(user.id, filter).await?))
}

pub async fn get_category(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Category>, BudgetError> {
    Ok(Json(state.storage.get_category(user.id, id).await?))
}

/// POST /api/categories -> 404 naming the group when it is not the caller's.
pub async fn create_category(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<CreateCategory>,
) -> Result<(StatusCode, Json<Category>), BudgetError> {
    let category = state.storage.create_category(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(patch): ValidJson<UpdateCategory>,
) -> Result<Json<Category>, BudgetError> {
    Ok(Json(state.storage.update_category(user.id, id, patch).await?))
}

pub async fn delete_category(
    State(state): State<BudgetState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, BudgetError> {
    state.storage.delete_category(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
