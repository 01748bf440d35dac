use crate::dto::main::CatalogOverview;
use crate::repository::{CategoryReader, ProductReader};

use super::{ServiceError, ServiceResult, join_reads};

/// Core business logic for rendering the catalog home page.
///
/// The category list and the product count are read concurrently.
pub fn show_index<R>(repo: &R) -> ServiceResult<CatalogOverview>
where
    R: CategoryReader + ProductReader + Sync,
{
    let (categories, product_count) =
        join_reads(|| repo.list_categories(), || repo.count_products());

    let categories = match categories {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let product_count = match product_count {
        Ok(product_count) => product_count,
        Err(e) => {
            log::error!("Failed to count products: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(CatalogOverview {
        categories: categories.into_iter().map(Into::into).collect(),
        product_count,
    })
}
