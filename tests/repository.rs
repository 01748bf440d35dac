use chrono::Utc;
use diesel::prelude::*;
use pushkind_catalog::domain::category::NewCategory;
use pushkind_catalog::domain::product::NewProduct;
use pushkind_catalog::domain::types::{
    CategoryDescription, CategoryId, CategoryName, ProductDescription, ProductId, ProductName,
    ProductPrice, StockCount,
};
use pushkind_catalog::models::product::NewProduct as DbNewProduct;
use pushkind_catalog::repository::{
    CategoryLookup, CategoryReader, CategoryWriter, DieselRepository, ProductReader, ProductWrite,
    ProductWriter,
};
use pushkind_catalog::schema::products;

mod common;

fn new_category(name: &str, description: &str) -> NewCategory {
    let now = Utc::now().naive_utc();
    NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
        description: CategoryDescription::new(description).expect("valid description"),
        created_at: now,
        updated_at: now,
    }
}

fn new_product(name: &str, category_ids: &[CategoryId]) -> NewProduct {
    let now = Utc::now().naive_utc();
    NewProduct {
        name: ProductName::new(name).expect("valid product name"),
        description: ProductDescription::new("Fresh").expect("valid description"),
        price: ProductPrice::new(3.0).expect("valid price"),
        number_in_stock: StockCount::new(10).expect("valid stock"),
        category_ids: category_ids.to_vec(),
        created_at: now,
        updated_at: now,
    }
}

fn saved(write: ProductWrite) -> ProductId {
    match write {
        ProductWrite::Saved(id) => id,
        other => panic!("expected product to be saved, got {other:?}"),
    }
}

fn create(repo: &DieselRepository, name: &str) -> CategoryId {
    repo.create_category(&new_category(name, "Description"))
        .expect("should create category")
}

#[test]
fn category_crud() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let id = repo
        .create_category(&new_category("Dairy", "Milk products"))
        .expect("should create category");

    let stored = repo
        .get_category_by_id(id)
        .expect("should read category")
        .expect("category should exist");
    assert_eq!(stored.name.as_str(), "Dairy");
    assert_eq!(stored.description.as_str(), "Milk products");

    let updated = repo
        .update_category(id, &new_category("Dairy & Eggs", "Fresh"))
        .expect("should update category")
        .expect("category should exist");
    assert_eq!(updated.id, id);
    assert_eq!(updated.name.as_str(), "Dairy & Eggs");

    assert_eq!(repo.delete_category(id).expect("should delete"), 1);
    assert!(repo.get_category_by_id(id).unwrap().is_none());
    assert_eq!(repo.delete_category(id).expect("should delete nothing"), 0);
}

#[test]
fn update_of_missing_category_returns_none() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let missing = CategoryId::new(42).unwrap();
    assert!(
        repo.update_category(missing, &new_category("Dairy", "Milk"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn categories_are_listed_by_name() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    create(&repo, "Vegetables");
    create(&repo, "Bakery");
    create(&repo, "Dairy");

    let names: Vec<_> = repo
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|c| c.name.into_inner())
        .collect();
    assert_eq!(names, vec!["Bakery", "Dairy", "Vegetables"]);
}

#[test]
fn category_lookup_ignores_case_and_accents() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let id = repo
        .create_category(&new_category("Crème Brûlée", "Desserts"))
        .unwrap();

    let by_name = repo
        .find_category_case_insensitive(&CategoryLookup::name(
            CategoryName::new("CREME BRULEE").unwrap(),
        ))
        .unwrap()
        .expect("name should match");
    assert_eq!(by_name.id, id);

    let exact = CategoryLookup::name(CategoryName::new("creme brulee").unwrap())
        .description(CategoryDescription::new("DESSERTS").unwrap());
    assert!(repo.find_category_case_insensitive(&exact).unwrap().is_some());

    let other_description = CategoryLookup::name(CategoryName::new("creme brulee").unwrap())
        .description(CategoryDescription::new("Pastry").unwrap());
    assert!(
        repo.find_category_case_insensitive(&other_description)
            .unwrap()
            .is_none()
    );
}

#[test]
fn product_crud_keeps_ordered_refs() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let dairy = create(&repo, "Dairy");
    let fresh = create(&repo, "Fresh");

    let id = saved(
        repo.create_product(&new_product("Milk", &[fresh, dairy]))
            .unwrap(),
    );

    let stored = repo.get_product_by_id(id).unwrap().expect("product exists");
    assert_eq!(stored.name.as_str(), "Milk");
    assert_eq!(stored.price.get(), 3.0);
    assert_eq!(stored.number_in_stock.get(), 10);
    assert_eq!(stored.category_ids, vec![fresh, dairy]);

    assert_eq!(repo.delete_product(id).unwrap(), 1);
    assert!(repo.get_product_by_id(id).unwrap().is_none());
    assert!(repo.list_products_in_category(dairy).unwrap().is_empty());
}

#[test]
fn update_replaces_product_refs() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let dairy = create(&repo, "Dairy");
    let fresh = create(&repo, "Fresh");
    let id = saved(repo.create_product(&new_product("Milk", &[dairy])).unwrap());

    saved(
        repo.update_product(id, &new_product("Milk", &[fresh]))
            .unwrap(),
    );
    assert_eq!(
        repo.get_product_by_id(id).unwrap().unwrap().category_ids,
        vec![fresh]
    );

    saved(repo.update_product(id, &new_product("Milk", &[])).unwrap());
    assert!(
        repo.get_product_by_id(id)
            .unwrap()
            .unwrap()
            .category_ids
            .is_empty()
    );
}

#[test]
fn duplicate_product_names_are_reported() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let milk = saved(repo.create_product(&new_product("Milk", &[])).unwrap());
    let cheese = saved(repo.create_product(&new_product("Cheese", &[])).unwrap());

    assert_eq!(
        repo.create_product(&new_product("Milk", &[])).unwrap(),
        ProductWrite::DuplicateName
    );
    assert_eq!(
        repo.update_product(cheese, &new_product("Milk", &[]))
            .unwrap(),
        ProductWrite::DuplicateName
    );
    assert_eq!(
        repo.update_product(milk, &new_product("Milk", &[])).unwrap(),
        ProductWrite::Saved(milk)
    );
    assert_eq!(repo.list_products().unwrap().len(), 2);
}

#[test]
fn update_of_missing_product_is_reported() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let missing = ProductId::new(7).unwrap();
    assert_eq!(
        repo.update_product(missing, &new_product("Milk", &[]))
            .unwrap(),
        ProductWrite::Missing
    );
}

#[test]
fn lists_products_referencing_a_category() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let dairy = create(&repo, "Dairy");
    let bakery = create(&repo, "Bakery");
    saved(repo.create_product(&new_product("Milk", &[dairy])).unwrap());
    saved(
        repo.create_product(&new_product("Cheese", &[bakery, dairy]))
            .unwrap(),
    );
    saved(repo.create_product(&new_product("Bread", &[bakery])).unwrap());

    let names: Vec<_> = repo
        .list_products_in_category(dairy)
        .unwrap()
        .into_iter()
        .map(|p| p.name.into_inner())
        .collect();
    assert_eq!(names, vec!["Cheese", "Milk"]);
}

#[test]
fn deleting_a_category_leaves_product_refs_dangling() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let dairy = create(&repo, "Dairy");
    let id = saved(repo.create_product(&new_product("Milk", &[dairy])).unwrap());

    repo.delete_category(dairy).unwrap();

    assert_eq!(
        repo.get_product_by_id(id).unwrap().unwrap().category_ids,
        vec![dairy]
    );
}

#[test]
fn repeated_category_ids_are_an_error_not_a_duplicate_name() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    let dairy = create(&repo, "Dairy");

    let result = repo.create_product(&new_product("Milk", &[dairy, dairy]));

    assert!(result.is_err());
    assert!(repo.list_products().unwrap().is_empty());

    // The name is still free.
    saved(repo.create_product(&new_product("Milk", &[dairy])).unwrap());
}

#[test]
fn counts_products() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();

    assert_eq!(repo.count_products().unwrap(), 0);
    saved(repo.create_product(&new_product("Milk", &[])).unwrap());
    saved(repo.create_product(&new_product("Cheese", &[])).unwrap());
    assert_eq!(repo.count_products().unwrap(), 2);
}

#[test]
fn lists_a_catalog_larger_than_the_bind_parameter_limit() {
    const TOTAL: usize = 33_000;

    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let mut conn = test_db.pool().get().expect("should acquire DB connection");

    let now = Utc::now().naive_utc();
    let rows: Vec<DbNewProduct> = (0..TOTAL)
        .map(|i| DbNewProduct {
            name: format!("Product {i:05}"),
            description: "Bulk".to_string(),
            price: 1.0,
            number_in_stock: 1,
            created_at: now,
            updated_at: now,
        })
        .collect();

    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        for chunk in rows.chunks(1_000) {
            diesel::insert_into(products::table)
                .values(chunk)
                .execute(conn)?;
        }
        Ok(())
    })
    .expect("should insert products");

    let dairy = create(&repo, "Dairy");
    let milk = saved(repo.create_product(&new_product("Milk", &[dairy])).unwrap());

    let listed = repo.list_products().expect("should list the whole catalog");

    assert_eq!(listed.len(), TOTAL + 1);
    let listed_milk = listed.iter().find(|p| p.id == milk).unwrap();
    assert_eq!(listed_milk.category_ids, vec![dairy]);
}
