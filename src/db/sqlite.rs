use crate::db::models::User;
use crate::db::schema::SQLITE_INIT;
use crate::error::{BudgetError, is_unique_violation};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub type SqlitePool = Pool<Sqlite>;

pub(crate) const USER_COLUMNS: &str = "id, external_id, email, created_at";

/// Request-scoped access to the budgeting tables. Cloning shares the pool.
#[derive(Clone)]
pub struct BudgetStorage {
    pub(crate) pool: SqlitePool,
}

impl BudgetStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, BudgetError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction that reads before it writes.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so concurrent writers
    /// wait on the busy timeout instead of failing the deferred lock upgrade.
    pub(crate) async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, BudgetError> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), BudgetError> {
        // execute multiple statements one by one; sqlx::query runs a single statement
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, BudgetError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Return the user for `external_id`, inserting it with `email` on first sight.
    ///
    /// The UNIQUE constraint on `external_id` decides concurrent first logins:
    /// the losing insert re-reads and returns the winner's row.
    pub async fn get_or_create_user(
        &self,
        external_id: &str,
        email: &str,
    ) -> Result<User, BudgetError> {
        if let Some(user) = self.find_user_by_external_id(external_id).await? {
            return Ok(user);
        }

        let created_at = Utc::now().to_rfc3339();
        let sql = format!(
            "INSERT INTO users (external_id, email, created_at) VALUES (?, ?, ?) RETURNING {USER_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, User>(&sql)
            .bind(external_id)
            .bind(email)
            .bind(created_at)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(user) => {
                info!(user_id = user.id, external_id, "created user on first login");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => {
                match self.find_user_by_external_id(external_id).await? {
                    Some(user) => Ok(user),
                    None => {
                        // The collision was on email, owned by a different identity.
                        warn!(external_id, "email already registered to another identity");
                        Err(e.into())
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}
