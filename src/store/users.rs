use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ids::UserId;
use crate::models::{NewUser, User, UserProfileChanges};
use crate::schema::users;

/// Inserts a user. `followers`, `following` and `is_admin` take their column
/// defaults; the password is stored as given.
pub fn create_user(conn: &mut PgConnection, new_user: &NewUser) -> StoreResult<User> {
    let user: User = match diesel::insert_into(users::table)
        .values(new_user)
        .get_result(conn)
    {
        Ok(user) => user,
        Err(err) => {
            let err = StoreError::from(err);
            if let Some(field) = err.conflicting_field::<User>() {
                debug!(field, username = %new_user.username, "rejected duplicate user");
            }
            return Err(err);
        }
    };

    debug!(user_id = %user.id, username = %user.username, "created user");
    Ok(user)
}

pub fn find_user(conn: &mut PgConnection, user_id: UserId) -> StoreResult<User> {
    users::table
        .find(user_id)
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound("user"))
}

pub fn find_user_by_username(conn: &mut PgConnection, username: &str) -> StoreResult<Option<User>> {
    Ok(users::table
        .filter(users::username.eq(username))
        .first(conn)
        .optional()?)
}

pub fn update_user_profile(
    conn: &mut PgConnection,
    user_id: UserId,
    changes: &UserProfileChanges,
) -> StoreResult<User> {
    if changes.display_name.is_none() && changes.avatar.is_none() && changes.bio.is_none() {
        return find_user(conn, user_id);
    }

    diesel::update(users::table.find(user_id))
        .set(changes)
        .get_result(conn)
        .optional()?
        .ok_or(StoreError::NotFound("user"))
}
