use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ids::{
    BookmarkId, CategoryId, CollectionDocumentId, CollectionId, CommentId, DocumentId, FollowId,
    LikeId, UserId,
};
use crate::schema::*;

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub display_name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub followers: i32,
    pub following: i32,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = users)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserProfileChanges {
    pub display_name: Option<String>,
    pub avatar: Option<Option<String>>,
    pub bio: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = categories)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = categories)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = documents)]
#[diesel(belongs_to(User, foreign_key = author_id))]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub description: Option<String>,
    pub author_id: UserId,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub file_type: String,
    pub page_count: Option<i32>,
    pub category_id: Option<CategoryId>,
    pub tags: Option<Vec<String>>,
    pub view_count: i32,
    pub like_count: i32,
    pub comment_count: i32,
    pub is_private: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// `is_private` is optional here; `None` leaves the column default (`false`).
#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = documents)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub author_id: UserId,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub file_type: String,
    pub page_count: Option<i32>,
    pub category_id: Option<CategoryId>,
    pub tags: Option<Vec<String>>,
    pub is_private: Option<bool>,
}

/// Editable document fields. `Some(None)` clears a nullable column.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = documents)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub thumbnail_url: Option<Option<String>>,
    pub page_count: Option<Option<i32>>,
    pub category_id: Option<Option<CategoryId>>,
    pub tags: Option<Option<Vec<String>>>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = comments)]
#[diesel(belongs_to(Document))]
#[diesel(belongs_to(User, foreign_key = author_id))]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub document_id: DocumentId,
    pub author_id: UserId,
    pub content: String,
    pub parent_id: Option<CommentId>,
    pub likes: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = comments)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewComment {
    pub document_id: DocumentId,
    pub author_id: UserId,
    pub content: String,
    pub parent_id: Option<CommentId>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = likes)]
#[diesel(belongs_to(Document))]
#[diesel(belongs_to(User))]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: LikeId,
    pub user_id: UserId,
    pub document_id: DocumentId,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = likes)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewLike {
    pub user_id: UserId,
    pub document_id: DocumentId,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = bookmarks)]
#[diesel(belongs_to(Document))]
#[diesel(belongs_to(User))]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: BookmarkId,
    pub user_id: UserId,
    pub document_id: DocumentId,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = bookmarks)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBookmark {
    pub user_id: UserId,
    pub document_id: DocumentId,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = collections)]
#[diesel(belongs_to(User))]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: Option<String>,
    pub user_id: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = collections)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCollection {
    pub name: String,
    pub description: Option<String>,
    pub user_id: UserId,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = collections)]
pub struct CollectionChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = collection_documents)]
#[diesel(belongs_to(Collection))]
#[diesel(belongs_to(Document))]
#[serde(rename_all = "camelCase")]
pub struct CollectionDocument {
    pub id: CollectionDocumentId,
    pub collection_id: CollectionId,
    pub document_id: DocumentId,
    pub added_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = collection_documents)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCollectionDocument {
    pub collection_id: CollectionId,
    pub document_id: DocumentId,
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = follows)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: FollowId,
    pub follower_id: UserId,
    pub following_id: UserId,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = follows)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewFollow {
    pub follower_id: UserId,
    pub following_id: UserId,
}
