use std::collections::HashMap;

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::product::{NewProduct, Product, ProductSummary};
use crate::domain::types::{CategoryId, ProductId};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductCategory, ProductSummaryRow,
    summary_from_row,
};
use crate::repository::{DieselRepository, ProductReader, ProductWrite, ProductWriter};

/// Loads ordered category ids grouped by product.
///
/// `None` loads every link row, so listing the whole catalog never binds one
/// parameter per product.
fn load_links(
    conn: &mut SqliteConnection,
    product_ids: Option<&[i32]>,
) -> QueryResult<HashMap<i32, Vec<i32>>> {
    use crate::schema::product_categories;

    let mut query = product_categories::table
        .order((
            product_categories::product_id.asc(),
            product_categories::position.asc(),
        ))
        .into_boxed::<Sqlite>();

    if let Some(product_ids) = product_ids {
        query = query.filter(product_categories::product_id.eq_any(product_ids));
    }

    let links = query.load::<ProductCategory>(conn)?;

    let mut grouped: HashMap<i32, Vec<i32>> = HashMap::new();
    for link in links {
        grouped
            .entry(link.product_id)
            .or_default()
            .push(link.category_id);
    }
    Ok(grouped)
}

fn insert_links(
    conn: &mut SqliteConnection,
    product_id: i32,
    category_ids: &[CategoryId],
) -> QueryResult<usize> {
    use crate::schema::product_categories;

    let links = ProductCategory::links_for(product_id, category_ids);
    if links.is_empty() {
        return Ok(0);
    }

    diesel::insert_into(product_categories::table)
        .values(&links)
        .execute(conn)
}

/// Turns a violation of the unique `products.name` index into `None`.
///
/// Other constraint failures, such as a repeated link row, stay errors.
fn guard_unique_name<T>(result: QueryResult<T>) -> RepositoryResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info))
            if info.message().contains("products.name") =>
        {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

impl ProductReader for DieselRepository {
    fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let rows = products::table
            .order((products::name.asc(), products::id.asc()))
            .load::<DbProduct>(&mut conn)?;

        let mut links = load_links(&mut conn, None)?;

        let items = rows
            .into_iter()
            .map(|p| {
                let category_ids = links.remove(&p.id).unwrap_or_default();
                p.into_domain(category_ids)
            })
            .collect::<Result<Vec<Product>, _>>()?;

        Ok(items)
    }

    fn count_products(&self) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let total = products::table.count().get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let Some(row) = products::table
            .filter(products::id.eq(id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let category_ids = load_links(&mut conn, Some(&[row.id]))?
            .remove(&row.id)
            .unwrap_or_default();

        Ok(Some(row.into_domain(category_ids)?))
    }

    fn list_products_in_category(
        &self,
        category_id: CategoryId,
    ) -> RepositoryResult<Vec<ProductSummary>> {
        use crate::schema::{product_categories, products};

        let mut conn = self.conn()?;

        let items = products::table
            .inner_join(product_categories::table)
            .filter(product_categories::category_id.eq(category_id.get()))
            .select((
                products::id,
                products::name,
                products::price,
                products::number_in_stock,
            ))
            .order(products::name.asc())
            .load::<ProductSummaryRow>(&mut conn)?
            .into_iter()
            .map(summary_from_row)
            .collect::<Result<Vec<ProductSummary>, _>>()?;

        Ok(items)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<ProductWrite> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product = DbNewProduct::from(product);

        let result = conn.transaction::<_, DieselError, _>(|conn| {
            let id = diesel::insert_into(products::table)
                .values(&db_product)
                .returning(products::id)
                .get_result::<i32>(conn)?;

            insert_links(conn, id, &product.category_ids)?;
            Ok(id)
        });

        match guard_unique_name(result)? {
            Some(id) => Ok(ProductWrite::Saved(ProductId::new(id)?)),
            None => Ok(ProductWrite::DuplicateName),
        }
    }

    fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> RepositoryResult<ProductWrite> {
        use crate::schema::{product_categories, products};

        let mut conn = self.conn()?;

        let result = conn.transaction::<_, DieselError, _>(|conn| {
            let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
                .set((
                    products::name.eq(product.name.as_str()),
                    products::description.eq(product.description.as_str()),
                    products::price.eq(product.price.get()),
                    products::number_in_stock.eq(product.number_in_stock.get()),
                    products::updated_at.eq(product.updated_at),
                ))
                .execute(conn)?;

            if affected == 0 {
                return Ok(ProductWrite::Missing);
            }

            // Category refs are replaced, never merged.
            diesel::delete(
                product_categories::table.filter(product_categories::product_id.eq(id.get())),
            )
            .execute(conn)?;
            insert_links(conn, id.get(), &product.category_ids)?;

            Ok(ProductWrite::Saved(id))
        });

        Ok(guard_unique_name(result)?.unwrap_or(ProductWrite::DuplicateName))
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::{product_categories, products};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(
                product_categories::table.filter(product_categories::product_id.eq(id.get())),
            )
            .execute(conn)?;

            diesel::delete(products::table.filter(products::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
