use diesel::dsl::now;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ids::{CollectionId, DocumentId};
use crate::models::{
    Collection, CollectionChanges, CollectionDocument, Document, NewCollection,
    NewCollectionDocument, User,
};
use crate::schema::{collection_documents, collections, documents};

use super::documents::ensure_document_exists;

pub fn create_collection(
    conn: &mut PgConnection,
    new_collection: &NewCollection,
) -> StoreResult<Collection> {
    let collection: Collection = diesel::insert_into(collections::table)
        .values(new_collection)
        .get_result(conn)?;

    debug!(
        collection_id = %collection.id,
        user_id = %collection.user_id,
        "created collection"
    );
    Ok(collection)
}

pub fn update_collection(
    conn: &mut PgConnection,
    collection_id: CollectionId,
    changes: &CollectionChanges,
) -> StoreResult<Collection> {
    diesel::update(collections::table.find(collection_id))
        .set((changes, collections::updated_at.eq(now)))
        .get_result(conn)
        .optional()?
        .ok_or(StoreError::NotFound("collection"))
}

fn touch_collection(conn: &mut PgConnection, collection_id: CollectionId) -> StoreResult<()> {
    let updated = diesel::update(collections::table.find(collection_id))
        .set(collections::updated_at.eq(now))
        .execute(conn)?;
    if updated == 0 {
        return Err(StoreError::NotFound("collection"));
    }
    Ok(())
}

/// Adds a document to a collection; adding it twice fails with
/// `UniquenessViolation`.
pub fn add_to_collection(
    conn: &mut PgConnection,
    collection_id: CollectionId,
    document_id: DocumentId,
) -> StoreResult<CollectionDocument> {
    conn.transaction::<CollectionDocument, StoreError, _>(|conn| {
        touch_collection(conn, collection_id)?;
        ensure_document_exists(conn, document_id)?;

        let entry: CollectionDocument = diesel::insert_into(collection_documents::table)
            .values(&NewCollectionDocument {
                collection_id,
                document_id,
            })
            .get_result(conn)?;

        debug!(%collection_id, %document_id, "added document to collection");
        Ok(entry)
    })
}

pub fn remove_from_collection(
    conn: &mut PgConnection,
    collection_id: CollectionId,
    document_id: DocumentId,
) -> StoreResult<bool> {
    conn.transaction::<bool, StoreError, _>(|conn| {
        let deleted = diesel::delete(
            collection_documents::table
                .filter(collection_documents::collection_id.eq(collection_id))
                .filter(collection_documents::document_id.eq(document_id)),
        )
        .execute(conn)?;
        if deleted == 0 {
            return Ok(false);
        }

        touch_collection(conn, collection_id)?;
        Ok(true)
    })
}

/// Documents in the order they were added.
pub fn list_collection_documents(
    conn: &mut PgConnection,
    collection_id: CollectionId,
) -> StoreResult<Vec<Document>> {
    Ok(collection_documents::table
        .inner_join(documents::table)
        .filter(collection_documents::collection_id.eq(collection_id))
        .order((
            collection_documents::added_at.asc(),
            collection_documents::id.asc(),
        ))
        .select(documents::all_columns)
        .load(conn)?)
}

pub fn list_user_collections(conn: &mut PgConnection, owner: &User) -> StoreResult<Vec<Collection>> {
    Ok(Collection::belonging_to(owner)
        .order((collections::created_at.asc(), collections::id.asc()))
        .load(conn)?)
}
