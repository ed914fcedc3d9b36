use sqlx::SqliteConnection;
use tracing::info;

use crate::db::models::Account;
use crate::db::ownership::{Entity, found};
use crate::db::sqlite::BudgetStorage;
use crate::error::BudgetError;
use crate::types::account::{AccountPatch, NewAccount};

const COLUMNS: &str = "id, user_id, name, account_type, balance";

async fn fetch(conn: &mut SqliteConnection, user_id: i64, id: i64) -> Result<Account, BudgetError> {
    let sql = format!("SELECT {COLUMNS} FROM accounts WHERE id = ? AND user_id = ?");
    let row = sqlx::query_as::<_, Account>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    found(row, Entity::Account)
}

impl BudgetStorage {
    pub async fn list_accounts(&self, user_id: i64) -> Result<Vec<Account>, BudgetError> {
        let sql = format!("SELECT {COLUMNS} FROM accounts WHERE user_id = ? ORDER BY id");
        let rows = sqlx::query_as::<_, Account>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_account(&self, user_id: i64, id: i64) -> Result<Account, BudgetError> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, user_id, id).await
    }

    pub async fn create_account(
        &self,
        user_id: i64,
        input: NewAccount,
    ) -> Result<Account, BudgetError> {
        let sql = format!(
            "INSERT INTO accounts (user_id, name, account_type, balance) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(user_id)
            .bind(input.name)
            .bind(input.account_type.as_str())
            .bind(input.balance.to_string())
            .fetch_one(&self.pool)
            .await?;
        info!(user_id, account_id = account.id, "account created");
        Ok(account)
    }

    pub async fn update_account(
        &self,
        user_id: i64,
        id: i64,
        patch: AccountPatch,
    ) -> Result<Account, BudgetError> {
        let mut tx = self.begin_write().await?;
        let mut account = fetch(&mut tx, user_id, id).await?;

        if let Some(name) = patch.name {
            account.name = name;
        }
        if let Some(account_type) = patch.account_type {
            account.account_type = account_type;
        }
        if let Some(balance) = patch.balance {
            account.balance = balance;
        }

        sqlx::query(
            "UPDATE accounts SET name = ?, account_type = ?, balance = ? WHERE id = ? AND user_id = ?",
        )
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(account.balance.to_string())
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(user_id, account_id = id, "account updated");
        Ok(account)
    }

    /// Deleting an account removes its transactions through the FK cascade.
    pub async fn delete_account(&self, user_id: i64, id: i64) -> Result<(), BudgetError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BudgetError::NotFound(Entity::Account));
        }
        info!(user_id, account_id = id, "account deleted");
        Ok(())
    }
}
