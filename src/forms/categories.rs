use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryDescription, CategoryName};
use crate::forms::validation::{FieldErrors, Rejection, TextRule, escape};
use crate::repository::CategoryLookup;

/// Raw category form as submitted by the create and update pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Sanitized values rendered back into the category form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryFormValues {
    pub name: String,
    pub description: String,
}

impl From<&Category> for CategoryFormValues {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.as_str().to_string(),
            description: category.description.as_str().to_string(),
        }
    }
}

/// Per-operation rule set for category forms.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRules {
    pub name: TextRule,
    pub description: TextRule,
}

impl CategoryRules {
    /// The create form requires at least three characters for the name,
    /// stricter than the one character the stored record allows.
    pub const CREATE: Self = Self {
        name: TextRule::new(
            "Category name",
            3,
            Some(50),
            "Category name must contain at least 3 characters",
        ),
        description: TextRule::new(
            "Description",
            1,
            Some(300),
            "Description must not be empty.",
        ),
    };

    pub const UPDATE: Self = Self::CREATE;
}

/// Validated and sanitized category fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
    pub description: CategoryDescription,
}

impl CategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Lookup matching an existing category with the same name and description.
    pub fn exact_lookup(&self) -> CategoryLookup {
        CategoryLookup::name(self.name.clone()).description(self.description.clone())
    }

    /// Lookup matching any category with the same name.
    pub fn name_lookup(&self) -> CategoryLookup {
        CategoryLookup::name(self.name.clone())
    }

    /// Values to echo back when a store-level check rejects the payload.
    pub fn values(&self) -> CategoryFormValues {
        CategoryFormValues {
            name: self.name.as_str().to_string(),
            description: self.description.as_str().to_string(),
        }
    }
}

impl CategoryForm {
    /// Trims, checks and escapes every field against `rules`.
    pub fn validate_with(
        self,
        rules: &CategoryRules,
    ) -> Result<CategoryFormPayload, Rejection<CategoryFormValues>> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        let description = self.description.trim();
        rules.name.check("name", name, &mut errors);
        rules.description.check("description", description, &mut errors);

        let values = CategoryFormValues {
            name: escape(name),
            description: escape(description),
        };

        let name = errors.typed("name", CategoryName::new(values.name.clone()));
        let description = errors.typed(
            "description",
            CategoryDescription::new(values.description.clone()),
        );

        match (name, description) {
            (Some(name), Some(description)) if errors.is_empty() => {
                Ok(CategoryFormPayload { name, description })
            }
            _ => Err(Rejection {
                values,
                errors: errors.into_vec(),
            }),
        }
    }
}
