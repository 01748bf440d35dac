use crate::domain::types::CategoryId;
use crate::dto::categories::{CategoryDetail, CategoryDto, CategoryFormView};
use crate::forms::categories::{CategoryForm, CategoryFormPayload, CategoryRules};
use crate::forms::validation::FieldError;
use crate::repository::{CategoryReader, CategoryWriter, ProductReader};

use super::{ServiceError, ServiceResult, Submission, join_reads};

/// Outcome of a category delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryDeletion {
    Deleted,
    /// Products still reference the category; nothing was deleted.
    Blocked(CategoryDetail),
}

fn category_id(id: i32) -> ServiceResult<CategoryId> {
    CategoryId::new(id).map_err(|_| ServiceError::NotFound)
}

fn name_taken(payload: &CategoryFormPayload) -> CategoryFormView {
    CategoryFormView {
        values: payload.values(),
        errors: vec![FieldError {
            field: "name",
            message: "Category name already exists".to_string(),
        }],
    }
}

/// Lists every category sorted by name.
pub fn show_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Loads a category and the products referencing it.
///
/// Both reads run concurrently.
pub fn show_category<R>(id: i32, repo: &R) -> ServiceResult<CategoryDetail>
where
    R: CategoryReader + ProductReader + Sync,
{
    let id = category_id(id)?;

    let (category, products) = join_reads(
        || repo.get_category_by_id(id),
        || repo.list_products_in_category(id),
    );

    let category = match category {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let products = match products {
        Ok(products) => products,
        Err(e) => {
            log::error!("Failed to list products of category {id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(CategoryDetail {
        category: category.into(),
        products: products.into_iter().map(Into::into).collect(),
    })
}

/// What deleting the category would affect: the category and its dependents.
pub fn category_deletion_impact<R>(id: i32, repo: &R) -> ServiceResult<CategoryDetail>
where
    R: CategoryReader + ProductReader + Sync,
{
    show_category(id, repo)
}

/// Prefills the update form with the stored values.
pub fn category_form<R>(id: i32, repo: &R) -> ServiceResult<CategoryFormView>
where
    R: CategoryReader,
{
    let id = category_id(id)?;

    match repo.get_category_by_id(id) {
        Ok(Some(category)) => Ok(CategoryFormView {
            values: (&category).into(),
            errors: vec![],
        }),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Validates and stores a new category.
///
/// A category equal in name and description under case- and accent-insensitive
/// comparison is returned instead of inserting a duplicate. A category that
/// only shares the name rejects the submission.
///
/// The lookup and the insert are separate store calls and categories carry no
/// unique index, so two concurrent identical submissions can both insert.
pub fn create_category<R>(
    form: CategoryForm,
    repo: &R,
) -> ServiceResult<Submission<CategoryId, CategoryFormView>>
where
    R: CategoryReader + CategoryWriter,
{
    let payload = match form.validate_with(&CategoryRules::CREATE) {
        Ok(payload) => payload,
        Err(rejection) => return Ok(Submission::Rejected(rejection.into())),
    };

    match repo.find_category_case_insensitive(&payload.exact_lookup()) {
        Ok(Some(existing)) => {
            log::info!("Category '{}' already exists with id {}", payload.name, existing.id);
            return Ok(Submission::Saved(existing.id));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.find_category_case_insensitive(&payload.name_lookup()) {
        Ok(Some(_)) => return Ok(Submission::Rejected(name_taken(&payload))),
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.create_category(&payload.into_new_category()) {
        Ok(id) => {
            log::info!("Created category {id}");
            Ok(Submission::Saved(id))
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Validates the form and overwrites the category in place.
pub fn update_category<R>(
    id: i32,
    form: CategoryForm,
    repo: &R,
) -> ServiceResult<Submission<CategoryId, CategoryFormView>>
where
    R: CategoryReader + CategoryWriter,
{
    let id = category_id(id)?;

    let payload = match form.validate_with(&CategoryRules::UPDATE) {
        Ok(payload) => payload,
        Err(rejection) => return Ok(Submission::Rejected(rejection.into())),
    };

    match repo.find_category_case_insensitive(&payload.name_lookup()) {
        Ok(Some(other)) if other.id != id => {
            return Ok(Submission::Rejected(name_taken(&payload)));
        }
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to look up category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.update_category(id, &payload.into_new_category()) {
        Ok(Some(category)) => {
            log::info!("Updated category {id}");
            Ok(Submission::Saved(category.id))
        }
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Deletes a category unless products still reference it.
pub fn delete_category<R>(id: i32, repo: &R) -> ServiceResult<CategoryDeletion>
where
    R: CategoryReader + CategoryWriter + ProductReader + Sync,
{
    let detail = show_category(id, repo)?;

    if !detail.products.is_empty() {
        log::info!(
            "Refusing to delete category {id}: {} products reference it",
            detail.products.len()
        );
        return Ok(CategoryDeletion::Blocked(detail));
    }

    match repo.delete_category(category_id(id)?) {
        Ok(_) => {
            log::info!("Deleted category {id}");
            Ok(CategoryDeletion::Deleted)
        }
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}
