pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod router;
pub mod types;
pub mod validation;

pub use db::BudgetStorage;
pub use error::BudgetError;
pub use identity::{HttpIdentityProvider, IdentityProvider};
pub use router::{BudgetState, budget_router};
