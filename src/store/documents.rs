use diesel::dsl::{exists, now};
use diesel::pg::PgConnection;
use diesel::{prelude::*, select};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ids::{CategoryId, DocumentId, UserId};
use crate::models::{Document, DocumentChanges, NewDocument};
use crate::schema::{categories, documents, users};

pub const DEFAULT_PAGE_SIZE: i64 = 50;

pub(crate) fn ensure_document_exists(
    conn: &mut PgConnection,
    document_id: DocumentId,
) -> StoreResult<()> {
    let found: bool = select(exists(documents::table.find(document_id))).get_result(conn)?;
    if found {
        Ok(())
    } else {
        Err(StoreError::NotFound("document"))
    }
}

fn ensure_category_exists(conn: &mut PgConnection, category_id: CategoryId) -> StoreResult<()> {
    let found: bool = select(exists(categories::table.find(category_id))).get_result(conn)?;
    if found {
        Ok(())
    } else {
        Err(StoreError::InvalidReference(format!(
            "category {category_id} does not exist"
        )))
    }
}

/// Inserts a document with all counters at zero. The author and, when given,
/// the category must exist.
pub fn create_document(conn: &mut PgConnection, new_document: &NewDocument) -> StoreResult<Document> {
    let document = conn.transaction::<Document, StoreError, _>(|conn| {
        let author_found: bool =
            select(exists(users::table.find(new_document.author_id))).get_result(conn)?;
        if !author_found {
            return Err(StoreError::InvalidReference(format!(
                "author {} does not exist",
                new_document.author_id
            )));
        }
        if let Some(category_id) = new_document.category_id {
            ensure_category_exists(conn, category_id)?;
        }

        Ok(diesel::insert_into(documents::table)
            .values(new_document)
            .get_result(conn)?)
    })?;

    debug!(
        document_id = %document.id,
        author_id = %document.author_id,
        file_type = %document.file_type,
        is_private = document.is_private,
        "created document"
    );
    Ok(document)
}

pub fn find_document(conn: &mut PgConnection, document_id: DocumentId) -> StoreResult<Document> {
    documents::table
        .find(document_id)
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound("document"))
}

/// Applies `changes` and refreshes `updated_at`, even when no field differs.
pub fn update_document(
    conn: &mut PgConnection,
    document_id: DocumentId,
    changes: &DocumentChanges,
) -> StoreResult<Document> {
    conn.transaction::<Document, StoreError, _>(|conn| {
        if let Some(Some(category_id)) = changes.category_id {
            ensure_category_exists(conn, category_id)?;
        }

        let document: Document = diesel::update(documents::table.find(document_id))
            .set((changes, documents::updated_at.eq(now)))
            .get_result(conn)
            .optional()?
            .ok_or(StoreError::NotFound("document"))?;

        debug!(document_id = %document.id, "updated document");
        Ok(document)
    })
}

/// Newest public documents first. A negative `limit` yields no rows.
pub fn list_public_documents(conn: &mut PgConnection, limit: Option<i64>) -> StoreResult<Vec<Document>> {
    Ok(documents::table
        .filter(documents::is_private.eq(false))
        .order((documents::created_at.desc(), documents::id.desc()))
        .limit(limit.unwrap_or(DEFAULT_PAGE_SIZE).max(0))
        .load(conn)?)
}

pub fn list_documents_by_author(
    conn: &mut PgConnection,
    author_id: UserId,
    include_private: bool,
) -> StoreResult<Vec<Document>> {
    let mut query = documents::table
        .filter(documents::author_id.eq(author_id))
        .into_boxed();
    if !include_private {
        query = query.filter(documents::is_private.eq(false));
    }

    Ok(query
        .order((documents::created_at.desc(), documents::id.desc()))
        .load(conn)?)
}

pub fn list_documents_in_category(
    conn: &mut PgConnection,
    category_id: CategoryId,
) -> StoreResult<Vec<Document>> {
    Ok(documents::table
        .filter(documents::category_id.eq(category_id))
        .filter(documents::is_private.eq(false))
        .order((documents::created_at.desc(), documents::id.desc()))
        .load(conn)?)
}

/// Counts one view and returns the new total.
pub fn record_view(conn: &mut PgConnection, document_id: DocumentId) -> StoreResult<i32> {
    diesel::update(documents::table.find(document_id))
        .set(documents::view_count.eq(documents::view_count + 1))
        .returning(documents::view_count)
        .get_result(conn)
        .optional()?
        .ok_or(StoreError::NotFound("document"))
}
