use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, NewCategory};
use crate::domain::collation::eq_secondary;
use crate::domain::product::{NewProduct, Product, ProductSummary};
use crate::domain::types::{CategoryDescription, CategoryId, CategoryName, ProductId};

pub mod category;
pub mod product;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers and scoped reader threads.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Case- and accent-insensitive lookup of a category.
///
/// Matching happens on demand in the repository rather than through a unique
/// index, so callers decide what a match means.
#[derive(Debug, Clone)]
pub struct CategoryLookup {
    /// Name to compare against.
    pub name: CategoryName,
    /// Optional description that must match as well.
    pub description: Option<CategoryDescription>,
}

impl CategoryLookup {
    pub fn name(name: CategoryName) -> Self {
        Self {
            name,
            description: None,
        }
    }

    pub fn description(mut self, description: CategoryDescription) -> Self {
        self.description = Some(description);
        self
    }

    /// Returns `true` when `category` matches at secondary strength.
    pub fn matches(&self, category: &Category) -> bool {
        eq_secondary(&self.name, &category.name)
            && self
                .description
                .as_ref()
                .is_none_or(|description| eq_secondary(description, &category.description))
    }
}

/// Outcome of a product write guarded by the unique `name` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductWrite {
    /// The product row and its category links were written.
    Saved(ProductId),
    /// Another product already uses the name; nothing was written.
    DuplicateName,
    /// The product to update does not exist.
    Missing,
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories sorted by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Find the first category matching `lookup` at secondary strength.
    fn find_category_case_insensitive(
        &self,
        lookup: &CategoryLookup,
    ) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return its identifier.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<CategoryId>;
    /// Overwrite name and description in place. `None` when `id` is unknown.
    fn update_category(
        &self,
        id: CategoryId,
        category: &NewCategory,
    ) -> RepositoryResult<Option<Category>>;
    /// Delete a category by id. Does not touch product links.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List all products sorted by name, each with its ordered category ids.
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
    /// Number of stored products.
    fn count_products(&self) -> RepositoryResult<usize>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// List name/price/stock of the products referencing `category_id`.
    fn list_products_in_category(
        &self,
        category_id: CategoryId,
    ) -> RepositoryResult<Vec<ProductSummary>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Insert a product together with its category links.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<ProductWrite>;
    /// Replace a product wholesale, including its category links.
    fn update_product(&self, id: ProductId, product: &NewProduct)
    -> RepositoryResult<ProductWrite>;
    /// Delete a product and its category links.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}
