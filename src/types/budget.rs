use rust_decimal::Decimal;
use serde::Deserialize;

use super::present;
use crate::validation::{Validate, ValidationErrors, to_money};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetAllocation {
    pub category_id: i64,
    pub month: String,
    pub amount: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBudgetAllocation {
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub month: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub amount: Option<Option<Decimal>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BudgetAllocationPatch {
    pub category_id: Option<i64>,
    pub month: Option<String>,
    pub amount: Option<Decimal>,
}

/// `GET /api/budget?month=&category_id=`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BudgetFilter {
    pub month: Option<String>,
    pub category_id: Option<i64>,
}

impl Validate for CreateBudgetAllocation {
    type Valid = Self;

    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.month("month", &self.month);
        errors.money("amount", &self.amount);
        errors.into_result()?;
        Ok(Self {
            amount: to_money(self.amount),
            ..self
        })
    }
}

impl Validate for UpdateBudgetAllocation {
    type Valid = BudgetAllocationPatch;

    fn validate(self) -> Result<BudgetAllocationPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_null("category_id", &self.category_id);
        errors.not_null("month", &self.month);
        errors.not_null("amount", &self.amount);

        let patch = BudgetAllocationPatch {
            category_id: self.category_id.flatten(),
            month: self.month.flatten(),
            amount: self.amount.flatten(),
        };
        if let Some(month) = &patch.month {
            errors.month("month", month);
        }
        if let Some(amount) = &patch.amount {
            errors.money("amount", amount);
        }
        errors.into_result()?;
        Ok(BudgetAllocationPatch {
            amount: patch.amount.map(to_money),
            ..patch
        })
    }
}

impl Validate for BudgetFilter {
    type Valid = Self;

    fn validate(self) -> Result<Self, ValidationErrors> {
        if let Some(month) = &self.month {
            let mut errors = ValidationErrors::new();
            errors.month("month", month);
            errors.into_result()?;
        }
        Ok(self)
    }
}
