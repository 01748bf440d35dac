use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductSummary,
};
use crate::domain::types::{
    CategoryId, ProductDescription, ProductName, ProductPrice, StockCount, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub number_in_stock: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`]. Category links are written separately.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub number_in_stock: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Row of the `product_categories` link table.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::product_categories)]
pub struct ProductCategory {
    pub product_id: i32,
    pub category_id: i32,
    pub position: i32,
}

impl ProductCategory {
    /// Builds ordered link rows for `product_id`.
    pub fn links_for(product_id: i32, category_ids: &[CategoryId]) -> Vec<Self> {
        category_ids
            .iter()
            .zip(0..)
            .map(|(category_id, position)| Self {
                product_id,
                category_id: category_id.get(),
                position,
            })
            .collect()
    }
}

impl Product {
    /// Converts the row into a domain product carrying `category_ids` in link order.
    pub fn into_domain(self, category_ids: Vec<i32>) -> Result<DomainProduct, TypeConstraintError> {
        Ok(DomainProduct {
            id: self.id.try_into()?,
            name: ProductName::new(self.name)?,
            description: ProductDescription::new(self.description)?,
            price: ProductPrice::new(self.price)?,
            number_in_stock: StockCount::new(self.number_in_stock)?,
            category_ids: category_ids
                .into_iter()
                .map(CategoryId::new)
                .collect::<Result<Vec<_>, _>>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&DomainNewProduct> for NewProduct {
    fn from(product: &DomainNewProduct) -> Self {
        Self {
            name: product.name.as_str().to_string(),
            description: product.description.as_str().to_string(),
            price: product.price.get(),
            number_in_stock: product.number_in_stock.get(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// `(id, name, price, number_in_stock)` projection loaded for category pages.
pub type ProductSummaryRow = (i32, String, f64, i64);

/// Converts a projected row into a [`ProductSummary`].
pub fn summary_from_row(row: ProductSummaryRow) -> Result<ProductSummary, TypeConstraintError> {
    let (id, name, price, number_in_stock) = row;
    Ok(ProductSummary {
        id: id.try_into()?,
        name: ProductName::new(name)?,
        price: ProductPrice::new(price)?,
        number_in_stock: StockCount::new(number_in_stock)?,
    })
}
