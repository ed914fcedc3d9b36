pub mod accounts;
pub mod budget;
pub mod categories;
pub mod health;
pub mod transactions;
