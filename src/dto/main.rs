use serde::Serialize;

use crate::dto::categories::CategoryDto;

/// Catalog landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogOverview {
    pub categories: Vec<CategoryDto>,
    pub product_count: usize,
}
