use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::ids::{CommentId, DocumentId};
use crate::models::{Comment, Document, NewComment};
use crate::schema::{comments, documents};

use super::documents::ensure_document_exists;

/// Inserts a comment and bumps the document's `comment_count`.
///
/// A reply's parent must be a comment on the same document.
pub fn create_comment(conn: &mut PgConnection, new_comment: &NewComment) -> StoreResult<Comment> {
    let comment = conn.transaction::<Comment, StoreError, _>(|conn| {
        ensure_document_exists(conn, new_comment.document_id)?;

        if let Some(parent_id) = new_comment.parent_id {
            let parent_document: Option<DocumentId> = comments::table
                .find(parent_id)
                .select(comments::document_id)
                .first(conn)
                .optional()?;
            match parent_document {
                None => {
                    return Err(StoreError::InvalidReference(format!(
                        "parent comment {parent_id} does not exist"
                    )))
                }
                Some(document_id) if document_id != new_comment.document_id => {
                    return Err(StoreError::InvalidReference(format!(
                        "parent comment {parent_id} belongs to document {document_id}"
                    )))
                }
                Some(_) => {}
            }
        }

        let comment: Comment = diesel::insert_into(comments::table)
            .values(new_comment)
            .get_result(conn)?;

        diesel::update(documents::table.find(new_comment.document_id))
            .set(documents::comment_count.eq(documents::comment_count + 1))
            .execute(conn)?;

        Ok(comment)
    })?;

    debug!(
        comment_id = %comment.id,
        document_id = %comment.document_id,
        parent_id = ?comment.parent_id,
        "created comment"
    );
    Ok(comment)
}

fn gather_reply_ids(conn: &mut PgConnection, comment_id: CommentId) -> StoreResult<Vec<CommentId>> {
    let mut ids = vec![comment_id];
    let mut queue = vec![comment_id];

    while let Some(current) = queue.pop() {
        let child_ids: Vec<CommentId> = comments::table
            .filter(comments::parent_id.eq(Some(current)))
            .select(comments::id)
            .load(conn)?;
        queue.extend(child_ids.iter().copied());
        ids.extend(child_ids);
    }

    Ok(ids)
}

/// Deletes a comment together with every reply beneath it and lowers the
/// document's `comment_count` by the number of rows removed.
pub fn delete_comment(conn: &mut PgConnection, comment_id: CommentId) -> StoreResult<usize> {
    conn.transaction::<usize, StoreError, _>(|conn| {
        let document_id: DocumentId = comments::table
            .find(comment_id)
            .select(comments::document_id)
            .first(conn)
            .optional()?
            .ok_or(StoreError::NotFound("comment"))?;

        let ids = gather_reply_ids(conn, comment_id)?;
        let removed = diesel::delete(comments::table.filter(comments::id.eq_any(&ids)))
            .execute(conn)?;

        diesel::update(documents::table.find(document_id))
            .set(documents::comment_count.eq(documents::comment_count - removed as i32))
            .execute(conn)?;

        debug!(%comment_id, %document_id, removed, "deleted comment thread");
        Ok(removed)
    })
}

/// Oldest first, so replies follow the comments they answer.
pub fn list_comments(conn: &mut PgConnection, document: &Document) -> StoreResult<Vec<Comment>> {
    Ok(Comment::belonging_to(document)
        .order((comments::created_at.asc(), comments::id.asc()))
        .load(conn)?)
}

/// Comment likes are a bare counter with no backing rows.
pub fn like_comment(conn: &mut PgConnection, comment_id: CommentId) -> StoreResult<i32> {
    diesel::update(comments::table.find(comment_id))
        .set(comments::likes.eq(comments::likes + 1))
        .returning(comments::likes)
        .get_result(conn)
        .optional()?
        .ok_or(StoreError::NotFound("comment"))
}
