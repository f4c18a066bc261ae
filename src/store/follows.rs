use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::{prelude::*, select};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ids::UserId;
use crate::models::{Follow, NewFollow, User};
use crate::schema::{follows, users};

/// Updates both users' counters, touching the rows in ascending id order so
/// that reciprocal follows on two connections cannot deadlock.
fn adjust_follow_counters(
    conn: &mut PgConnection,
    follower_id: UserId,
    following_id: UserId,
    delta: i32,
) -> StoreResult<()> {
    let mut targets = [(follower_id, true), (following_id, false)];
    targets.sort_by_key(|(user_id, _)| user_id.get());

    for (user_id, is_follower) in targets {
        let row = users::table.find(user_id);
        let updated = if is_follower {
            diesel::update(row)
                .set(users::following.eq(users::following + delta))
                .execute(conn)?
        } else {
            diesel::update(row)
                .set(users::followers.eq(users::followers + delta))
                .execute(conn)?
        };
        if updated == 0 {
            return Err(StoreError::NotFound("user"));
        }
    }
    Ok(())
}

/// Adds the edge `follower_id -> following_id` and updates both users'
/// counters. Self-follows and duplicate edges are rejected.
pub fn follow_user(
    conn: &mut PgConnection,
    follower_id: UserId,
    following_id: UserId,
) -> StoreResult<Follow> {
    if follower_id == following_id {
        return Err(StoreError::SelfFollow);
    }

    let follow = conn.transaction::<Follow, StoreError, _>(|conn| {
        adjust_follow_counters(conn, follower_id, following_id, 1)?;

        Ok(diesel::insert_into(follows::table)
            .values(&NewFollow {
                follower_id,
                following_id,
            })
            .get_result(conn)?)
    })?;

    debug!(%follower_id, %following_id, "followed user");
    Ok(follow)
}

/// Returns `false` when the edge did not exist.
pub fn unfollow_user(
    conn: &mut PgConnection,
    follower_id: UserId,
    following_id: UserId,
) -> StoreResult<bool> {
    let removed = conn.transaction::<bool, StoreError, _>(|conn| {
        let deleted = diesel::delete(
            follows::table
                .filter(follows::follower_id.eq(follower_id))
                .filter(follows::following_id.eq(following_id)),
        )
        .execute(conn)?;
        if deleted == 0 {
            return Ok(false);
        }

        adjust_follow_counters(conn, follower_id, following_id, -1)?;
        Ok(true)
    })?;

    if removed {
        debug!(%follower_id, %following_id, "unfollowed user");
    }
    Ok(removed)
}

pub fn is_following(
    conn: &mut PgConnection,
    follower_id: UserId,
    following_id: UserId,
) -> StoreResult<bool> {
    Ok(select(exists(
        follows::table
            .filter(follows::follower_id.eq(follower_id))
            .filter(follows::following_id.eq(following_id)),
    ))
    .get_result(conn)?)
}

/// Users following `user_id`, earliest follower first.
pub fn list_followers(conn: &mut PgConnection, user_id: UserId) -> StoreResult<Vec<User>> {
    Ok(follows::table
        .inner_join(users::table.on(users::id.eq(follows::follower_id)))
        .filter(follows::following_id.eq(user_id))
        .order((follows::created_at.asc(), follows::id.asc()))
        .select(users::all_columns)
        .load(conn)?)
}

/// Users that `user_id` follows, earliest first.
pub fn list_following(conn: &mut PgConnection, user_id: UserId) -> StoreResult<Vec<User>> {
    Ok(follows::table
        .inner_join(users::table.on(users::id.eq(follows::following_id)))
        .filter(follows::follower_id.eq(user_id))
        .order((follows::created_at.asc(), follows::id.asc()))
        .select(users::all_columns)
        .load(conn)?)
}
