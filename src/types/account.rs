use rust_decimal::Decimal;
use serde::Deserialize;

use super::present;
use crate::db::models::AccountType;
use crate::validation::{Validate, ValidationErrors, to_money};

#[derive(Debug, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    pub balance: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccount {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub account_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub balance: Option<Option<Decimal>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub balance: Option<Decimal>,
}

fn parse_type(errors: &mut ValidationErrors, raw: &str) -> Option<AccountType> {
    match raw.parse::<AccountType>() {
        Ok(t) => Some(t),
        Err(e) => {
            errors.push("type", e);
            None
        }
    }
}

impl Validate for CreateAccount {
    type Valid = NewAccount;

    fn validate(self) -> Result<NewAccount, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.text("name", &self.name, 1, 100);
        let account_type = parse_type(&mut errors, &self.account_type);
        errors.money("balance", &self.balance);

        match account_type {
            Some(account_type) if errors.is_empty() => Ok(NewAccount {
                name: self.name,
                account_type,
                balance: to_money(self.balance),
            }),
            _ => Err(errors),
        }
    }
}

impl Validate for UpdateAccount {
    type Valid = AccountPatch;

    fn validate(self) -> Result<AccountPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_null("name", &self.name);
        errors.not_null("type", &self.account_type);
        errors.not_null("balance", &self.balance);

        let name = self.name.flatten();
        if let Some(name) = &name {
            errors.text("name", name, 1, 100);
        }
        let account_type = self
            .account_type
            .flatten()
            .and_then(|raw| parse_type(&mut errors, &raw));
        let balance = self.balance.flatten();
        if let Some(balance) = &balance {
            errors.money("balance", balance);
        }

        errors.into_result()?;
        Ok(AccountPatch {
            name,
            account_type,
            balance: balance.map(to_money),
        })
    }
}
