//! Database module: models, schema and ownership-scoped repositories.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and their row decoding
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the pooled storage handle and user get-or-create
//! - `ownership.rs`: the shared "row belongs to user" check
//! - `accounts.rs`, `categories.rs`, `transactions.rs`, `budget.rs`:
//!   per-entity operations, every query filtered by the requesting user

pub mod accounts;
pub mod budget;
pub mod categories;
pub mod models;
pub mod ownership;
pub mod schema;
pub mod sqlite;
pub mod transactions;

pub use models::{
    Account, AccountType, BudgetAllocation, Category, CategoryGroup, Transaction, User,
};
pub use ownership::Entity;
pub use schema::SQLITE_INIT;
pub use sqlite::{BudgetStorage, SqlitePool};
