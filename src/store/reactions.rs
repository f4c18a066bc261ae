use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::{prelude::*, select};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ids::{DocumentId, UserId};
use crate::models::{Bookmark, Document, Like, NewBookmark, NewLike};
use crate::schema::{bookmarks, documents, likes};

use super::documents::ensure_document_exists;

/// Records a like and bumps `like_count`. Liking the same document twice
/// fails with `UniquenessViolation` and leaves the counter untouched.
pub fn like_document(
    conn: &mut PgConnection,
    user_id: UserId,
    document_id: DocumentId,
) -> StoreResult<Like> {
    let like = conn.transaction::<Like, StoreError, _>(|conn| {
        ensure_document_exists(conn, document_id)?;

        let like: Like = diesel::insert_into(likes::table)
            .values(&NewLike {
                user_id,
                document_id,
            })
            .get_result(conn)?;

        diesel::update(documents::table.find(document_id))
            .set(documents::like_count.eq(documents::like_count + 1))
            .execute(conn)?;

        Ok(like)
    })?;

    debug!(%user_id, %document_id, "liked document");
    Ok(like)
}

/// Returns `false` when there was no like to remove.
pub fn unlike_document(
    conn: &mut PgConnection,
    user_id: UserId,
    document_id: DocumentId,
) -> StoreResult<bool> {
    let removed = conn.transaction::<bool, StoreError, _>(|conn| {
        let deleted = diesel::delete(
            likes::table
                .filter(likes::user_id.eq(user_id))
                .filter(likes::document_id.eq(document_id)),
        )
        .execute(conn)?;
        if deleted == 0 {
            return Ok(false);
        }

        diesel::update(documents::table.find(document_id))
            .set(documents::like_count.eq(documents::like_count - 1))
            .execute(conn)?;
        Ok(true)
    })?;

    if removed {
        debug!(%user_id, %document_id, "unliked document");
    }
    Ok(removed)
}

pub fn has_liked(
    conn: &mut PgConnection,
    user_id: UserId,
    document_id: DocumentId,
) -> StoreResult<bool> {
    Ok(select(exists(
        likes::table
            .filter(likes::user_id.eq(user_id))
            .filter(likes::document_id.eq(document_id)),
    ))
    .get_result(conn)?)
}

/// Bookmarks carry no counter; a duplicate fails with `UniquenessViolation`.
pub fn bookmark_document(
    conn: &mut PgConnection,
    user_id: UserId,
    document_id: DocumentId,
) -> StoreResult<Bookmark> {
    ensure_document_exists(conn, document_id)?;

    let bookmark: Bookmark = diesel::insert_into(bookmarks::table)
        .values(&NewBookmark {
            user_id,
            document_id,
        })
        .get_result(conn)?;

    debug!(%user_id, %document_id, "bookmarked document");
    Ok(bookmark)
}

pub fn remove_bookmark(
    conn: &mut PgConnection,
    user_id: UserId,
    document_id: DocumentId,
) -> StoreResult<bool> {
    let deleted = diesel::delete(
        bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .filter(bookmarks::document_id.eq(document_id)),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}

pub fn has_bookmarked(
    conn: &mut PgConnection,
    user_id: UserId,
    document_id: DocumentId,
) -> StoreResult<bool> {
    Ok(select(exists(
        bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .filter(bookmarks::document_id.eq(document_id)),
    ))
    .get_result(conn)?)
}

/// Most recently bookmarked first.
pub fn list_bookmarked_documents(
    conn: &mut PgConnection,
    user_id: UserId,
) -> StoreResult<Vec<Document>> {
    Ok(bookmarks::table
        .inner_join(documents::table)
        .filter(bookmarks::user_id.eq(user_id))
        .order((bookmarks::created_at.desc(), bookmarks::id.desc()))
        .select(documents::all_columns)
        .load(conn)?)
}
