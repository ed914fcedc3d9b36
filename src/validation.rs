//! Field-level input checks shared by every request type.
//!
//! Request types implement [`Validate`], turning raw wire input into the
//! checked value the repositories accept. Each check appends to a
//! [`ValidationErrors`] so one rejection reports every offending field.

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").expect("month pattern is a valid regex")
});

/// Stored as NUMERIC(15, 2): two fraction digits leave thirteen integer digits.
const MONEY_SCALE: u32 = 2;
const MONEY_LIMIT: i64 = 10_000_000_000_000;

pub trait Validate: Sized {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ValidationErrors>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn text(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min {
            self.push(field, format!("must be at least {min} characters"));
        } else if len > max {
            self.push(field, format!("must be at most {max} characters"));
        }
    }

    pub fn sort_order(&mut self, field: &str, value: i64) {
        if value < 0 {
            self.push(field, "must be greater than or equal to 0");
        } else if value > i64::from(i32::MAX) {
            self.push(field, "is too large");
        }
    }

    pub fn money(&mut self, field: &str, value: &Decimal) {
        if value.normalize().scale() > MONEY_SCALE {
            self.push(field, "must have at most 2 decimal places");
        } else if value.abs() >= Decimal::from(MONEY_LIMIT) {
            self.push(field, "must have at most 13 integer digits");
        }
    }

    pub fn month(&mut self, field: &str, value: &str) {
        if !is_valid_month(value) {
            self.push(
                field,
                "must be in YYYY-MM format with valid month (01-12)",
            );
        }
    }

    /// Non-nullable columns reject an explicit `null` in a partial update.
    pub fn not_null<T>(&mut self, field: &str, value: &Option<Option<T>>) {
        if matches!(value, Some(None)) {
            self.push(field, "may not be null");
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{} {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn is_valid_month(value: &str) -> bool {
    MONTH_RE.is_match(value)
}

/// Fix a validated amount to exactly two fraction digits for storage.
pub fn to_money(mut value: Decimal) -> Decimal {
    value.rescale(MONEY_SCALE);
    value
}
