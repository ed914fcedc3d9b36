use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::info;

use crate::db::models::Transaction;
use crate::db::ownership::{Entity, ensure_owned, found};
use crate::db::sqlite::BudgetStorage;
use crate::error::BudgetError;
use crate::types::transaction::{CreateTransaction, TransactionFilter, TransactionPatch};

const COLUMNS: &str = "id, user_id, account_id, category_id, date, payee, amount, memo, cleared";

async fn fetch(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<Transaction, BudgetError> {
    let sql = format!("SELECT {COLUMNS} FROM transactions WHERE id = ? AND user_id = ?");
    let row = sqlx::query_as::<_, Transaction>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    found(row, Entity::Transaction)
}

impl BudgetStorage {
    /// Newest first. Date bounds are inclusive.
    pub async fn list_transactions(
        &self,
        user_id: i64,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, BudgetError> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {COLUMNS} FROM transactions WHERE user_id = "
        ));
        qb.push_bind(user_id);
        if let Some(account_id) = filter.account_id {
            qb.push(" AND account_id = ").push_bind(account_id);
        }
        if let Some(category_id) = filter.category_id {
            qb.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(start) = filter.start_date {
            qb.push(" AND date >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            qb.push(" AND date <= ").push_bind(end);
        }
        if let Some(cleared) = filter.cleared {
            qb.push(" AND cleared = ").push_bind(cleared);
        }
        qb.push(" ORDER BY date DESC, id DESC");

        let rows = qb
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_transaction(&self, user_id: i64, id: i64) -> Result<Transaction, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, user_id, id).await
    }

    pub async fn create_transaction(
        &self,
        user_id: i64,
        input: CreateTransaction,
    ) -> Result<Transaction, BudgetError> {
        let mut tx = self.begin_write().await?;
        ensure_owned(&mut tx, Entity::Account, input.account_id, user_id).await?;
        if let Some(category_id) = input.category_id {
            ensure_owned(&mut tx, Entity::Category, category_id, user_id).await?;
        }

        let sql = format!(
            "INSERT INTO transactions (user_id, account_id, category_id, date, payee, amount, memo, cleared) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        let transaction = sqlx::query_as::<_, Transaction>(&sql)
            .bind(user_id)
            .bind(input.account_id)
            .bind(input.category_id)
            .bind(input.date)
            .bind(input.payee)
            .bind(input.amount.to_string())
            .bind(input.memo)
            .bind(input.cleared)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(
            user_id,
            transaction_id = transaction.id,
            account_id = transaction.account_id,
            "transaction created"
        );
        Ok(transaction)
    }

    pub async fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        patch: TransactionPatch,
    ) -> Result<Transaction, BudgetError> {
        let mut tx = self.begin_write().await?;
        let mut transaction = fetch(&mut tx, user_id, id).await?;

        if let Some(account_id) = patch.account_id {
            ensure_owned(&mut tx, Entity::Account, account_id, user_id).await?;
            transaction.account_id = account_id;
        }
        if let Some(category_id) = patch.category_id {
            if let Some(category_id) = category_id {
                ensure_owned(&mut tx, Entity::Category, category_id, user_id).await?;
            }
            transaction.category_id = category_id;
        }
        if let Some(date) = patch.date {
            transaction.date = date;
        }
        if let Some(payee) = patch.payee {
            transaction.payee = payee;
        }
        if let Some(amount) = patch.amount {
            transaction.amount = amount;
        }
        if let Some(memo) = patch.memo {
            transaction.memo = memo;
        }
        if let Some(cleared) = patch.cleared {
            transaction.cleared = cleared;
        }

        sqlx::query(
            r#"UPDATE transactions SET
                account_id = ?,
                category_id = ?,
                date = ?,
                payee = ?,
                amount = ?,
                memo = ?,
                cleared = ?
              WHERE id = ? AND user_id = ?"#,
        )
        .bind(transaction.account_id)
        .bind(transaction.category_id)
        .bind(transaction.date)
        .bind(&transaction.payee)
        .bind(transaction.amount.to_string())
        .bind(&transaction.memo)
        .bind(transaction.cleared)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(user_id, transaction_id = id, "transaction updated");
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, user_id: i64, id: i64) -> Result<(), BudgetError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BudgetError::NotFound(Entity::Transaction));
        }
        info!(user_id, transaction_id = id, "transaction deleted");
        Ok(())
    }
}
