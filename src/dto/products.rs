use std::collections::HashMap;

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::product::Product;
use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryOption;
use crate::forms::products::ProductFormValues;
use crate::forms::validation::FieldError;

/// Resolved `(id, name)` category reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRefDto {
    pub id: i32,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub number_in_stock: i64,
    pub url: String,
    pub categories: Vec<CategoryRefDto>,
}

impl ProductDto {
    /// Resolves the product's category ids against `names`, keeping ref order.
    /// Refs to categories that no longer exist are skipped.
    pub fn resolve(product: Product, names: &HashMap<CategoryId, String>) -> Self {
        let categories = product
            .category_ids
            .iter()
            .filter_map(|id| {
                names.get(id).map(|name| CategoryRefDto {
                    id: id.get(),
                    name: name.clone(),
                    url: format!("/catalog/category/{id}"),
                })
            })
            .collect();

        Self {
            id: product.id.get(),
            url: product.url(),
            name: product.name.into_inner(),
            description: product.description.into_inner(),
            price: product.price.get(),
            number_in_stock: product.number_in_stock.get(),
            categories,
        }
    }
}

/// Builds the id → name map used by [`ProductDto::resolve`].
pub fn category_names(categories: &[Category]) -> HashMap<CategoryId, String> {
    categories
        .iter()
        .map(|c| (c.id, c.name.as_str().to_string()))
        .collect()
}

/// Product form state: echoed values, annotated categories and field errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFormView {
    pub values: ProductFormValues,
    pub categories: Vec<CategoryOption>,
    pub errors: Vec<FieldError>,
}
