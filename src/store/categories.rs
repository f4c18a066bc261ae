use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ids::CategoryId;
use crate::models::{Category, NewCategory};
use crate::schema::categories;

/// Fails with `UniquenessViolation` when the name is already taken.
pub fn create_category(conn: &mut PgConnection, new_category: &NewCategory) -> StoreResult<Category> {
    let category: Category = match diesel::insert_into(categories::table)
        .values(new_category)
        .get_result(conn)
    {
        Ok(category) => category,
        Err(err) => {
            let err = StoreError::from(err);
            if let Some(field) = err.conflicting_field::<Category>() {
                debug!(field, name = %new_category.name, "rejected duplicate category");
            }
            return Err(err);
        }
    };

    debug!(category_id = %category.id, name = %category.name, "created category");
    Ok(category)
}

pub fn find_category(conn: &mut PgConnection, category_id: CategoryId) -> StoreResult<Category> {
    categories::table
        .find(category_id)
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound("category"))
}

pub fn list_categories(conn: &mut PgConnection) -> StoreResult<Vec<Category>> {
    Ok(categories::table
        .order(categories::name.asc())
        .load(conn)?)
}
