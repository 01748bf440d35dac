use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryDescription, CategoryId, CategoryName};

/// Catalog category record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: CategoryDescription,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    /// Canonical detail page for the category.
    pub fn url(&self) -> String {
        format!("/catalog/category/{}", self.id)
    }
}

/// Data required to insert a new [`Category`] or overwrite an existing one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub description: CategoryDescription,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
