use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::info;

use crate::db::models::BudgetAllocation;
use crate::db::ownership::{Entity, ensure_owned, found};
use crate::db::sqlite::BudgetStorage;
use crate::error::{BudgetError, is_unique_violation};
use crate::types::budget::{BudgetAllocationPatch, BudgetFilter, CreateBudgetAllocation};

const COLUMNS: &str = "id, user_id, category_id, month, amount";
const DUPLICATE_ALLOCATION: &str = "Budget allocation already exists for this category and month";

async fn fetch(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<BudgetAllocation, BudgetError> {
    let sql = format!("SELECT {COLUMNS} FROM budget_allocations WHERE id = ? AND user_id = ?");
    let row = sqlx::query_as::<_, BudgetAllocation>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    found(row, Entity::BudgetAllocation)
}

/// Reject a second allocation for (user, category, month). `except` skips the
/// row being updated. The unique index remains the authoritative guard.
async fn ensure_slot_free(
    conn: &mut SqliteConnection,
    user_id: i64,
    category_id: i64,
    month: &str,
    except: Option<i64>,
) -> Result<(), BudgetError> {
    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM budget_allocations WHERE user_id = ? AND category_id = ? AND month = ?",
    )
    .bind(user_id)
    .bind(category_id)
    .bind(month)
    .fetch_optional(conn)
    .await?;
    match existing {
        Some((id,)) if Some(id) != except => {
            Err(BudgetError::Conflict(DUPLICATE_ALLOCATION.to_string()))
        }
        _ => Ok(()),
    }
}

fn conflict_on_unique(err: sqlx::Error) -> BudgetError {
    if is_unique_violation(&err) {
        BudgetError::Conflict(DUPLICATE_ALLOCATION.to_string())
    } else {
        err.into()
    }
}

impl BudgetStorage {
    pub async fn list_budget_allocations(
        &self,
        user_id: i64,
        filter: BudgetFilter,
    ) -> Result<Vec<BudgetAllocation>, BudgetError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {COLUMNS} FROM budget_allocations WHERE user_id = "
        ));
        qb.push_bind(user_id);
        if let Some(month) = filter.month {
            qb.push(" AND month = ").push_bind(month);
        }
        if let Some(category_id) = filter.category_id {
            qb.push(" AND category_id = ").push_bind(category_id);
        }
        qb.push(" ORDER BY id");

        let rows = qb
            .build_query_as::<BudgetAllocation>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_budget_allocation(
        &self,
        user_id: i64,
        id: i64,
    ) -> Result<BudgetAllocation, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, user_id, id).await
    }

    pub async fn create_budget_allocation(
        &self,
        user_id: i64,
        input: CreateBudgetAllocation,
    ) -> Result<BudgetAllocation, BudgetError> {
        let mut tx = self.begin_write().await?;
        ensure_owned(&mut tx, Entity::Category, input.category_id, user_id).await?;
        ensure_slot_free(&mut tx, user_id, input.category_id, &input.month, None).await?;

        let sql = format!(
            "INSERT INTO budget_allocations (user_id, category_id, month, amount) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        let allocation = sqlx::query_as::<_, BudgetAllocation>(&sql)
            .bind(user_id)
            .bind(input.category_id)
            .bind(&input.month)
            .bind(input.amount.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(conflict_on_unique)?;
        tx.commit().await?;

        info!(
            user_id,
            allocation_id = allocation.id,
            category_id = allocation.category_id,
            month = %allocation.month,
            "budget allocation created"
        );
        Ok(allocation)
    }

    pub async fn update_budget_allocation(
        &self,
        user_id: i64,
        id: i64,
        patch: BudgetAllocationPatch,
    ) -> Result<BudgetAllocation, BudgetError> {
        let mut tx = self.begin_write().await?;
        let mut allocation = fetch(&mut tx, user_id, id).await?;

        let moves = patch.category_id.is_some_and(|c| c != allocation.category_id)
            || patch.month.as_ref().is_some_and(|m| *m != allocation.month);
        if let Some(category_id) = patch.category_id {
            ensure_owned(&mut tx, Entity::Category, category_id, user_id).await?;
            allocation.category_id = category_id;
        }
        if let Some(month) = patch.month {
            allocation.month = month;
        }
        if let Some(amount) = patch.amount {
            allocation.amount = amount;
        }
        if moves {
            ensure_slot_free(
                &mut tx,
                user_id,
                allocation.category_id,
                &allocation.month,
                Some(id),
            )
            .await?;
        }

        sqlx::query(
            "UPDATE budget_allocations SET category_id = ?, month = ?, amount = ? WHERE id = ? AND user_id = ?",
        )
        .bind(allocation.category_id)
        .bind(&allocation.month)
        .bind(allocation.amount.to_string())
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(conflict_on_unique)?;
        tx.commit().await?;

        info!(user_id, allocation_id = id, "budget allocation updated");
        Ok(allocation)
    }

    pub async fn delete_budget_allocation(&self, user_id: i64, id: i64) -> Result<(), BudgetError> {
        let result = sqlx::query("DELETE FROM budget_allocations WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BudgetError::NotFound(Entity::BudgetAllocation));
        }
        info!(user_id, allocation_id = id, "budget allocation deleted");
        Ok(())
    }
}
