//! The one reusable "does row X belong to user U" check.
//!
//! Foreign-owned and missing rows are reported identically as
//! [`BudgetError::NotFound`] naming the entity that was referenced.

use sqlx::SqliteConnection;
use std::fmt;

use crate::error::BudgetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Account,
    CategoryGroup,
    Category,
    Transaction,
    BudgetAllocation,
}

impl Entity {
    pub fn table(&self) -> &'static str {
        match self {
            Entity::Account => "accounts",
            Entity::CategoryGroup => "category_groups",
            Entity::Category => "categories",
            Entity::Transaction => "transactions",
            Entity::BudgetAllocation => "budget_allocations",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Entity::Account => "Account",
            Entity::CategoryGroup => "Category group",
            Entity::Category => "Category",
            Entity::Transaction => "Transaction",
            Entity::BudgetAllocation => "Budget allocation",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub async fn ensure_owned(
    conn: &mut SqliteConnection,
    entity: Entity,
    id: i64,
    user_id: i64,
) -> Result<(), BudgetError> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE id = ? AND user_id = ?",
        entity.table()
    );
    let found: Option<(i64,)> = sqlx::query_as(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(BudgetError::NotFound(entity)),
    }
}

/// Turn "no row matched (id, user_id)" into a NotFound for `entity`.
pub fn found<T>(row: Option<T>, entity: Entity) -> Result<T, BudgetError> {
    row.ok_or(BudgetError::NotFound(entity))
}
