use serde::Deserialize;

use super::present;
use crate::validation::{Validate, ValidationErrors};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryGroup {
    pub name: String,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryGroup {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub sort_order: Option<Option<i64>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CategoryGroupPatch {
    pub name: Option<String>,
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub category_group_id: i64,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategory {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category_group_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub sort_order: Option<Option<i64>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub category_group_id: Option<i64>,
    pub sort_order: Option<i64>,
}

/// `GET /api/categories?group_id=`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CategoryFilter {
    pub group_id: Option<i64>,
}

impl Validate for CreateCategoryGroup {
    type Valid = Self;

    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.text("name", &self.name, 1, 100);
        errors.sort_order("sort_order", self.sort_order);
        errors.into_result()?;
        Ok(self)
    }
}

impl Validate for UpdateCategoryGroup {
    type Valid = CategoryGroupPatch;

    fn validate(self) -> Result<CategoryGroupPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_null("name", &self.name);
        errors.not_null("sort_order", &self.sort_order);

        let patch = CategoryGroupPatch {
            name: self.name.flatten(),
            sort_order: self.sort_order.flatten(),
        };
        if let Some(name) = &patch.name {
            errors.text("name", name, 1, 100);
        }
        if let Some(sort_order) = patch.sort_order {
            errors.sort_order("sort_order", sort_order);
        }
        errors.into_result()?;
        Ok(patch)
    }
}

impl Validate for CreateCategory {
    type Valid = Self;

    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.text("name", &self.name, 1, 100);
        errors.sort_order("sort_order", self.sort_order);
        errors.into_result()?;
        Ok(self)
    }
}

impl Validate for UpdateCategory {
    type Valid = CategoryPatch;

    fn validate(self) -> Result<CategoryPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_null("name", &self.name);
        errors.not_null("category_group_id", &self.category_group_id);
        errors.not_null("sort_order", &self.sort_order);

        let patch = CategoryPatch {
            name: self.name.flatten(),
            category_group_id: self.category_group_id.flatten(),
            sort_order: self.sort_order.flatten(),
        };
        if let Some(name) = &patch.name {
            errors.text("name", name, 1, 100);
        }
        if let Some(sort_order) = patch.sort_order {
            errors.sort_order("sort_order", sort_order);
        }
        errors.into_result()?;
        Ok(patch)
    }
}

impl Validate for CategoryFilter {
    type Valid = Self;

    fn validate(self) -> Result<Self, ValidationErrors> {
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_sort_order_is_rejected() {
        let input = CreateCategoryGroup {
            name: "Bills".to_string(),
            sort_order: -1,
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["sort_order"]);
    }

    #[test]
    fn category_requires_group_id() {
        let parsed = serde_json::from_value::<CreateCategory>(serde_json::json!({"name": "Rent"}));
        assert!(parsed.is_err());
    }
}
