use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub external_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Cash,
    Investment,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::CreditCard,
        AccountType::Cash,
        AccountType::Investment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::CreditCard => "credit_card",
            AccountType::Cash => "cash",
            AccountType::Investment => "investment",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(AccountType::as_str).collect();
                format!("must be one of: {}", allowed.join(", "))
            })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct CategoryGroup {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub category_group_id: i64,
    pub name: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    pub payee: String,
    pub amount: Decimal,
    pub memo: Option<String>,
    pub cleared: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetAllocation {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub month: String,
    pub amount: Decimal,
}

fn decode_money(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let text: String = row.try_get(column)?;
    Decimal::from_str(&text).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl FromRow<'_, SqliteRow> for User {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let created_at: String = row.try_get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);
        Ok(User {
            id: row.try_get("id")?,
            external_id: row.try_get("external_id")?,
            email: row.try_get("email")?,
            created_at,
        })
    }
}

impl FromRow<'_, SqliteRow> for Account {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let type_str: String = row.try_get("account_type")?;
        let account_type = AccountType::from_str(&type_str)
            .map_err(|e| sqlx::Error::Decode(format!("account_type {type_str:?} {e}").into()))?;
        Ok(Account {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            account_type,
            balance: decode_money(row, "balance")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for Transaction {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Transaction {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            account_id: row.try_get("account_id")?,
            category_id: row.try_get("category_id")?,
            date: row.try_get("date")?,
            payee: row.try_get("payee")?,
            amount: decode_money(row, "amount")?,
            memo: row.try_get("memo")?,
            cleared: row.try_get("cleared")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for BudgetAllocation {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(BudgetAllocation {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            category_id: row.try_get("category_id")?,
            month: row.try_get("month")?,
            amount: decode_money(row, "amount")?,
        })
    }
}
