use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::present;
use crate::validation::{Validate, ValidationErrors, to_money};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransaction {
    pub account_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    pub payee: String,
    pub amount: Decimal,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub cleared: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransaction {
    #[serde(default, deserialize_with = "present")]
    pub account_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub payee: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub amount: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "present")]
    pub memo: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub cleared: Option<Option<bool>>,
}

/// Checked partial update. `category_id` and `memo` are nullable columns, so
/// `Some(None)` clears them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionPatch {
    pub account_id: Option<i64>,
    pub category_id: Option<Option<i64>>,
    pub date: Option<NaiveDate>,
    pub payee: Option<String>,
    pub amount: Option<Decimal>,
    pub memo: Option<Option<String>>,
    pub cleared: Option<bool>,
}

/// `GET /api/transactions` query; date bounds are inclusive.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionFilter {
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cleared: Option<bool>,
}

fn check_memo(errors: &mut ValidationErrors, memo: Option<&str>) {
    if let Some(memo) = memo {
        errors.text("memo", memo, 0, 500);
    }
}

impl Validate for CreateTransaction {
    type Valid = Self;

    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.text("payee", &self.payee, 1, 200);
        errors.money("amount", &self.amount);
        check_memo(&mut errors, self.memo.as_deref());
        errors.into_result()?;
        Ok(Self {
            amount: to_money(self.amount),
            ..self
        })
    }
}

impl Validate for UpdateTransaction {
    type Valid = TransactionPatch;

    fn validate(self) -> Result<TransactionPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_null("account_id", &self.account_id);
        errors.not_null("date", &self.date);
        errors.not_null("payee", &self.payee);
        errors.not_null("amount", &self.amount);
        errors.not_null("cleared", &self.cleared);

        let patch = TransactionPatch {
            account_id: self.account_id.flatten(),
            category_id: self.category_id,
            date: self.date.flatten(),
            payee: self.payee.flatten(),
            amount: self.amount.flatten(),
            memo: self.memo,
            cleared: self.cleared.flatten(),
        };
        if let Some(payee) = &patch.payee {
            errors.text("payee", payee, 1, 200);
        }
        if let Some(amount) = &patch.amount {
            errors.money("amount", amount);
        }
        check_memo(&mut errors, patch.memo.as_ref().and_then(|m| m.as_deref()));
        errors.into_result()?;
        Ok(TransactionPatch {
            amount: patch.amount.map(to_money),
            ..patch
        })
    }
}

impl Validate for TransactionFilter {
    type Valid = Self;

    fn validate(self) -> Result<Self, ValidationErrors> {
        Ok(self)
    }
}
