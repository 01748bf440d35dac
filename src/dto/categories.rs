use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::product::ProductSummary;
use crate::forms::categories::CategoryFormValues;
use crate::forms::validation::{FieldError, Rejection};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub url: String,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            url: value.url(),
            name: value.name.into_inner(),
            description: value.description.into_inner(),
        }
    }
}

/// Product row listed on category detail and delete pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummaryDto {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub number_in_stock: i64,
    pub url: String,
}

impl From<ProductSummary> for ProductSummaryDto {
    fn from(value: ProductSummary) -> Self {
        Self {
            id: value.id.get(),
            url: format!("/catalog/product/{}", value.id),
            name: value.name.into_inner(),
            price: value.price.get(),
            number_in_stock: value.number_in_stock.get(),
        }
    }
}

/// A category together with the products referencing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDetail {
    pub category: CategoryDto,
    pub products: Vec<ProductSummaryDto>,
}

/// Category form state: echoed values plus any field errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryFormView {
    pub values: CategoryFormValues,
    pub errors: Vec<FieldError>,
}

impl From<Rejection<CategoryFormValues>> for CategoryFormView {
    fn from(rejection: Rejection<CategoryFormValues>) -> Self {
        Self {
            values: rejection.values,
            errors: rejection.errors,
        }
    }
}

/// Category checkbox on the product form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOption {
    pub id: i32,
    pub name: String,
    pub selected: bool,
}

impl CategoryOption {
    /// Marks every category whose id appears in `selected`.
    pub fn annotate(categories: Vec<Category>, selected: &[String]) -> Vec<Self> {
        categories
            .into_iter()
            .map(|c| Self {
                selected: selected.iter().any(|s| *s == c.id.to_string()),
                id: c.id.get(),
                name: c.name.into_inner(),
            })
            .collect()
    }
}
