use crate::domain::category::Category;
use crate::domain::types::ProductId;
use crate::dto::categories::CategoryOption;
use crate::dto::products::{ProductDto, ProductFormView, category_names};
use crate::forms::products::{ProductForm, ProductFormValues, ProductRules};
use crate::forms::validation::{FieldError, Rejection};
use crate::repository::{CategoryReader, ProductReader, ProductWrite, ProductWriter};

use super::{ServiceError, ServiceResult, Submission, join_reads};

fn product_id(id: i32) -> ServiceResult<ProductId> {
    ProductId::new(id).map_err(|_| ServiceError::NotFound)
}

fn load_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn form_view(
    values: ProductFormValues,
    errors: Vec<FieldError>,
    categories: Vec<Category>,
) -> ProductFormView {
    ProductFormView {
        categories: CategoryOption::annotate(categories, &values.category),
        values,
        errors,
    }
}

fn rejected(rejection: Rejection<ProductFormValues>, categories: Vec<Category>) -> ProductFormView {
    form_view(rejection.values, rejection.errors, categories)
}

fn name_taken(values: ProductFormValues, categories: Vec<Category>) -> ProductFormView {
    form_view(
        values,
        vec![FieldError {
            field: "name",
            message: "Product name already exists".to_string(),
        }],
        categories,
    )
}

/// Lists every product sorted by name with its categories resolved.
pub fn show_products<R>(repo: &R) -> ServiceResult<Vec<ProductDto>>
where
    R: ProductReader + CategoryReader + Sync,
{
    let (products, categories) = join_reads(|| repo.list_products(), || repo.list_categories());

    let products = match products {
        Ok(products) => products,
        Err(e) => {
            log::error!("Failed to list products: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let categories = match categories {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let names = category_names(&categories);
    Ok(products
        .into_iter()
        .map(|product| ProductDto::resolve(product, &names))
        .collect())
}

/// Loads one product with its categories resolved.
pub fn show_product<R>(id: i32, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader + CategoryReader + Sync,
{
    let id = product_id(id)?;

    let (product, categories) =
        join_reads(|| repo.get_product_by_id(id), || repo.list_categories());

    let product = match product {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let categories = match categories {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(ProductDto::resolve(product, &category_names(&categories)))
}

/// The product shown on the delete confirmation page.
pub fn product_deletion<R>(id: i32, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader + CategoryReader + Sync,
{
    show_product(id, repo)
}

/// Empty create form offering every category, none selected.
pub fn new_product_form<R>(repo: &R) -> ServiceResult<ProductFormView>
where
    R: CategoryReader,
{
    let categories = load_categories(repo)?;
    Ok(form_view(ProductFormValues::default(), vec![], categories))
}

/// Update form prefilled with the stored product and its selected categories.
pub fn product_form<R>(id: i32, repo: &R) -> ServiceResult<ProductFormView>
where
    R: ProductReader + CategoryReader + Sync,
{
    let id = product_id(id)?;

    let (product, categories) =
        join_reads(|| repo.get_product_by_id(id), || repo.list_categories());

    let product = match product {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let categories = match categories {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(form_view((&product).into(), vec![], categories))
}

/// Validates and inserts a new product.
///
/// A name already used by another product is reported as a field error; the
/// existing record is never returned in its place.
pub fn create_product<R>(
    form: ProductForm,
    repo: &R,
) -> ServiceResult<Submission<ProductId, ProductFormView>>
where
    R: CategoryReader + ProductWriter,
{
    let categories = load_categories(repo)?;

    let payload = match form.validate_with(&ProductRules::CREATE, &categories) {
        Ok(payload) => payload,
        Err(rejection) => return Ok(Submission::Rejected(rejected(rejection, categories))),
    };

    let values = payload.values.clone();
    match repo.create_product(&payload.into_new_product()) {
        Ok(ProductWrite::Saved(id)) => {
            log::info!("Created product {id}");
            Ok(Submission::Saved(id))
        }
        Ok(ProductWrite::DuplicateName) => {
            Ok(Submission::Rejected(name_taken(values, categories)))
        }
        Ok(ProductWrite::Missing) => Err(ServiceError::Internal),
        Err(e) => {
            log::error!("Failed to create product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Validates the form and replaces the product wholesale.
///
/// Category refs are replaced, never merged.
pub fn update_product<R>(
    id: i32,
    form: ProductForm,
    repo: &R,
) -> ServiceResult<Submission<ProductId, ProductFormView>>
where
    R: CategoryReader + ProductWriter,
{
    let id = product_id(id)?;
    let categories = load_categories(repo)?;

    let payload = match form.validate_with(&ProductRules::UPDATE, &categories) {
        Ok(payload) => payload,
        Err(rejection) => return Ok(Submission::Rejected(rejected(rejection, categories))),
    };

    let values = payload.values.clone();
    match repo.update_product(id, &payload.into_new_product()) {
        Ok(ProductWrite::Saved(id)) => {
            log::info!("Updated product {id}");
            Ok(Submission::Saved(id))
        }
        Ok(ProductWrite::DuplicateName) => {
            Ok(Submission::Rejected(name_taken(values, categories)))
        }
        Ok(ProductWrite::Missing) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Deletes a product unconditionally.
///
/// Returns `Ok(false)` when there was nothing to delete.
pub fn delete_product<R>(id: i32, repo: &R) -> ServiceResult<bool>
where
    R: ProductWriter,
{
    let Ok(id) = ProductId::new(id) else {
        return Ok(false);
    };

    match repo.delete_product(id) {
        Ok(0) => Ok(false),
        Ok(_) => {
            log::info!("Deleted product {id}");
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Product;
    use crate::domain::types::{
        CategoryDescription, CategoryId, CategoryName, ProductDescription, ProductName,
        ProductPrice, StockCount,
    };
    use crate::forms::categories::CategoryForm;
    use crate::forms::products::CategoryRefsInput;
    use crate::repository::test::TestRepository;
    use crate::services::categories::create_category;
    use chrono::DateTime;

    fn sample_category(id: i32, name: &str) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            description: CategoryDescription::new("Description").unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn sample_product(id: i32, name: &str, category_ids: &[i32]) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            name: ProductName::new(name).unwrap(),
            description: ProductDescription::new("Description").unwrap(),
            price: ProductPrice::new(3.0).unwrap(),
            number_in_stock: StockCount::new(10).unwrap(),
            category_ids: category_ids
                .iter()
                .map(|id| CategoryId::new(*id).unwrap())
                .collect(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn form(name: &str, price: &str, refs: &[&str]) -> ProductForm {
        ProductForm {
            name: name.into(),
            description: "Fresh".into(),
            price: price.into(),
            number_in_stock: "10".into(),
            category: Some(CategoryRefsInput::Many(
                refs.iter().map(|r| r.to_string()).collect(),
            )),
        }
    }

    #[test]
    fn negative_price_is_rejected_without_insert() {
        let repo = TestRepository::new(vec![sample_category(1, "Dairy")], vec![]);

        let Submission::Rejected(view) = create_product(form("Milk", "-5", &["1"]), &repo).unwrap()
        else {
            panic!("expected rejection");
        };

        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].field, "price");
        assert_eq!(view.values.price, "-5");
        assert!(view.categories[0].selected);
        assert_eq!(repo.product_count(), 0);
    }

    #[test]
    fn unknown_category_ref_is_rejected() {
        let repo = TestRepository::new(vec![sample_category(1, "Dairy")], vec![]);

        let Submission::Rejected(view) =
            create_product(form("Milk", "3", &["1", "42"]), &repo).unwrap()
        else {
            panic!("expected rejection");
        };

        assert_eq!(view.errors[0].field, "category");
        assert_eq!(repo.product_count(), 0);
    }

    #[test]
    fn duplicate_name_is_a_field_error() {
        let repo = TestRepository::new(vec![], vec![sample_product(1, "Milk", &[])]);

        let Submission::Rejected(view) = create_product(form("Milk", "3", &[]), &repo).unwrap()
        else {
            panic!("expected rejection");
        };

        assert_eq!(view.errors[0].field, "name");
        assert_eq!(view.errors[0].message, "Product name already exists");
        assert_eq!(repo.product_count(), 1);
    }

    #[test]
    fn update_replaces_refs_instead_of_merging() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Dairy"), sample_category(2, "Fresh")],
            vec![sample_product(5, "Milk", &[2])],
        );

        update_product(5, form("Milk", "3", &["1"]), &repo).unwrap();
        let refs: Vec<_> = show_product(5, &repo)
            .unwrap()
            .categories
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(refs, vec![1]);

        update_product(5, form("Milk", "3", &[]), &repo).unwrap();
        assert!(show_product(5, &repo).unwrap().categories.is_empty());
    }

    #[test]
    fn update_allows_keeping_the_same_name() {
        let repo = TestRepository::new(vec![], vec![sample_product(5, "Milk", &[])]);

        let submission = update_product(5, form("Milk", "4", &[]), &repo).unwrap();

        assert_eq!(submission, Submission::Saved(ProductId::new(5).unwrap()));
        assert_eq!(show_product(5, &repo).unwrap().price, 4.0);
    }

    #[test]
    fn update_of_unknown_product_is_not_found() {
        let repo = TestRepository::default();
        assert_eq!(
            update_product(9, form("Milk", "3", &[]), &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn product_form_marks_selected_categories() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Dairy"), sample_category(2, "Bakery")],
            vec![sample_product(5, "Milk", &[1])],
        );

        let view = product_form(5, &repo).unwrap();

        assert_eq!(view.values.name, "Milk");
        let selected: Vec<_> = view
            .categories
            .iter()
            .map(|c| (c.name.as_str(), c.selected))
            .collect();
        assert_eq!(selected, vec![("Bakery", false), ("Dairy", true)]);

        let empty = new_product_form(&repo).unwrap();
        assert!(empty.categories.iter().all(|c| !c.selected));
        assert_eq!(product_form(6, &repo).unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn dangling_refs_are_skipped_in_display() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Dairy")],
            vec![sample_product(5, "Milk", &[7, 1])],
        );

        let product = product_deletion(5, &repo).unwrap();

        assert_eq!(product.categories.len(), 1);
        assert_eq!(product.categories[0].name, "Dairy");
    }

    #[test]
    fn delete_reports_missing_products_as_already_gone() {
        let repo = TestRepository::new(vec![], vec![sample_product(5, "Milk", &[])]);

        assert!(delete_product(5, &repo).unwrap());
        assert!(!delete_product(5, &repo).unwrap());
        assert!(!delete_product(0, &repo).unwrap());
        assert_eq!(show_product(5, &repo).unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn created_product_lists_with_its_category_name() {
        let repo = TestRepository::default();

        let Submission::Saved(dairy) = create_category(
            CategoryForm {
                name: "Dairy".into(),
                description: "Milk products".into(),
            },
            &repo,
        )
        .unwrap() else {
            panic!("expected category to be saved");
        };

        let dairy = dairy.to_string();
        let milk = form("Milk", "3", &[dairy.as_str()]);
        assert!(matches!(
            create_product(milk, &repo).unwrap(),
            Submission::Saved(_)
        ));

        let products = show_products(&repo).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Milk");
        assert_eq!(products[0].price, 3.0);
        assert_eq!(products[0].number_in_stock, 10);
        assert_eq!(products[0].categories[0].name, "Dairy");
    }
}
