use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::{CategoryLookup, CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order((categories::name.asc(), categories::id.asc()))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn find_category_case_insensitive(
        &self,
        lookup: &CategoryLookup,
    ) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        // SQLite NOCASE only folds ASCII, so the comparison runs in Rust.
        let rows = categories::table
            .order(categories::id.asc())
            .load::<DbCategory>(&mut conn)?;

        for row in rows {
            let category: Category = row.try_into()?;
            if lookup.matches(&category) {
                return Ok(Some(category));
            }
        }

        Ok(None)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<CategoryId> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let id = diesel::insert_into(categories::table)
            .values(db_category)
            .returning(categories::id)
            .get_result::<i32>(&mut conn)?;

        Ok(CategoryId::new(id)?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        category: &NewCategory,
    ) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let updated = diesel::update(categories::table.filter(categories::id.eq(id.get())))
            .set((
                categories::name.eq(category.name.as_str()),
                categories::description.eq(category.description.as_str()),
                categories::updated_at.eq(category.updated_at),
            ))
            .get_result::<DbCategory>(&mut conn)
            .optional()?;

        let updated = updated.map(TryInto::try_into).transpose()?;
        Ok(updated)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::delete(categories::table.filter(categories::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
