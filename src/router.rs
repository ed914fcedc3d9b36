use axum::{Router, routing::get};
use std::sync::Arc;

use crate::db::sqlite::BudgetStorage;
use crate::handlers::{accounts, budget, categories, health, transactions};
use crate::identity::IdentityProvider;

/// Shared per-process handles; every request borrows a pooled connection from `storage`.
#[derive(Clone)]
pub struct BudgetState {
    pub storage: BudgetStorage,
    pub identity: Arc<dyn IdentityProvider>,
    pub app_name: Arc<str>,
    pub environment: Arc<str>,
}

impl BudgetState {
    pub fn new(
        storage: BudgetStorage,
        identity: Arc<dyn IdentityProvider>,
        app_name: impl Into<Arc<str>>,
        environment: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            storage,
            identity,
            app_name: app_name.into(),
            environment: environment.into(),
        }
    }
}

pub fn budget_router(state: BudgetState) -> Router {
    let api = Router::new()
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/accounts/{id}",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/groups",
            get(categories::list_category_groups).post(categories::create_category_group),
        )
        .route(
            "/categories/groups/{id}",
            get(categories::get_category_group)
                .put(categories::update_category_group)
                .delete(categories::delete_category_group),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/budget",
            get(budget::list_budget_allocations).post(budget::create_budget_allocation),
        )
        .route(
            "/budget/{id}",
            get(budget::get_budget_allocation)
                .put(budget::update_budget_allocation)
                .delete(budget::delete_budget_allocation),
        );

    Router::new()
        .route("/", get(health::service_info))
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .with_state(state)
}
