use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, ProductDescription, ProductId, ProductName, ProductPrice, StockCount,
};

/// A catalog product together with its ordered category references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: ProductPrice,
    pub number_in_stock: StockCount,
    /// Soft references; the store does not cascade on category removal.
    pub category_ids: Vec<CategoryId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Canonical detail page for the product.
    pub fn url(&self) -> String {
        format!("/catalog/product/{}", self.id)
    }
}

/// Information required to create a new [`Product`] or replace an existing one.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: ProductPrice,
    pub number_in_stock: StockCount,
    pub category_ids: Vec<CategoryId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Name/price/stock projection of a product listed under a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: ProductName,
    pub price: ProductPrice,
    pub number_in_stock: StockCount,
}
