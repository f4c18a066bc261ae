//! Column metadata and insert shapes.
//!
//! Each entity lists its full row shape once in [`Entity::COLUMNS`] and names
//! the server-owned subset in [`Entity::SERVER_OWNED`]. The insert shape is the
//! difference of the two and is what [`validate_insert`] enforces against
//! untrusted JSON before it is turned into a `New*` model.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};
use crate::models::{
    Bookmark, Category, Collection, CollectionDocument, Comment, Document, Follow, Like,
    NewBookmark, NewCategory, NewCollection, NewCollectionDocument, NewComment, NewDocument,
    NewFollow, NewLike, NewUser, User,
};
use crate::utils::json::{check_kind, classify_field, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    /// Integer key of another entity.
    Reference,
    Boolean,
    Timestamp,
    TextArray,
}

impl ColumnKind {
    pub const fn expected(self) -> &'static str {
        match self {
            ColumnKind::Text => "a string",
            ColumnKind::Integer => "an integer",
            ColumnKind::Reference => "an integer id",
            ColumnKind::Boolean => "a boolean",
            ColumnKind::Timestamp => "a timestamp string",
            ColumnKind::TextArray => "an array of strings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    Serial,
    Zero,
    False,
    Now,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// JSON field name.
    pub field: &'static str,
    /// SQL column name.
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub unique: bool,
    pub default: Option<ColumnDefault>,
}

impl Column {
    const fn new(field: &'static str, name: &'static str, kind: ColumnKind) -> Self {
        Self {
            field,
            name,
            kind,
            nullable: false,
            unique: false,
            default: None,
        }
    }

    const fn id() -> Self {
        Self::new("id", "id", ColumnKind::Integer).default(ColumnDefault::Serial)
    }

    const fn text(field: &'static str, name: &'static str) -> Self {
        Self::new(field, name, ColumnKind::Text)
    }

    const fn reference(field: &'static str, name: &'static str) -> Self {
        Self::new(field, name, ColumnKind::Reference)
    }

    const fn counter(field: &'static str, name: &'static str) -> Self {
        Self::new(field, name, ColumnKind::Integer).default(ColumnDefault::Zero)
    }

    const fn flag(field: &'static str, name: &'static str) -> Self {
        Self::new(field, name, ColumnKind::Boolean).default(ColumnDefault::False)
    }

    const fn created(field: &'static str, name: &'static str) -> Self {
        Self::new(field, name, ColumnKind::Timestamp).default(ColumnDefault::Now)
    }

    const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    const fn default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Non-nullable columns without a default must be supplied on insert.
    pub const fn is_required(&self) -> bool {
        !self.nullable && self.default.is_none()
    }
}

pub trait Entity {
    const TABLE: &'static str;
    const COLUMNS: &'static [Column];
    /// JSON names of fields assigned by the system rather than the client.
    const SERVER_OWNED: &'static [&'static str];

    type Insert: DeserializeOwned;
}

pub fn is_server_owned<E: Entity>(field: &str) -> bool {
    E::SERVER_OWNED.iter().any(|owned| *owned == field)
}

/// The row shape minus the server-owned fields, in declaration order.
pub fn insert_columns<E: Entity>() -> Vec<&'static Column> {
    E::COLUMNS
        .iter()
        .filter(|column| !is_server_owned::<E>(column.field))
        .collect()
}

pub fn unique_columns<E: Entity>() -> Vec<&'static Column> {
    E::COLUMNS.iter().filter(|column| column.unique).collect()
}

/// Maps a single-column `{table}_{column}_key` constraint back to the JSON
/// field of `E` it guards.
pub fn unique_field_for_constraint<E: Entity>(constraint: &str) -> Option<&'static str> {
    let column_name = constraint
        .strip_prefix(E::TABLE)?
        .strip_prefix('_')?
        .strip_suffix("_key")?;
    unique_columns::<E>()
        .into_iter()
        .find(|column| column.name == column_name)
        .map(|column| column.field)
}

/// Checks `payload` against the insert shape of `E` and deserializes it.
///
/// Keys outside the insert shape, server-owned ones included, are rejected
/// rather than stripped. An explicit `null` counts as absent.
pub fn validate_insert<E: Entity>(payload: &Value) -> ValidationResult<E::Insert> {
    let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;
    let columns = insert_columns::<E>();

    if let Some(key) = object
        .keys()
        .find(|key| !columns.iter().any(|column| column.field == key.as_str()))
    {
        return Err(ValidationError::UnexpectedField(key.clone()));
    }

    for column in &columns {
        match classify_field(object.get(column.field)) {
            FieldValue::Omitted | FieldValue::Null => {
                if column.is_required() {
                    return Err(ValidationError::MissingRequiredField(
                        column.field.to_string(),
                    ));
                }
            }
            FieldValue::Present(value) => {
                check_kind(column.kind, value).map_err(|expected| {
                    ValidationError::TypeMismatch {
                        field: column.field.to_string(),
                        expected,
                    }
                })?;
            }
        }
    }

    serde_json::from_value(payload.clone())
        .map_err(|err| ValidationError::Malformed(err.to_string()))
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::text("username", "username").unique(),
        Column::text("password", "password"),
        Column::text("displayName", "display_name"),
        Column::text("email", "email").unique(),
        Column::text("avatar", "avatar").nullable(),
        Column::text("bio", "bio").nullable(),
        Column::counter("followers", "followers"),
        Column::counter("following", "following"),
        Column::flag("isAdmin", "is_admin"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &["id", "followers", "following", "isAdmin"];

    type Insert = NewUser;
}

impl Entity for Document {
    const TABLE: &'static str = "documents";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::text("title", "title"),
        Column::text("description", "description").nullable(),
        Column::reference("authorId", "author_id"),
        Column::text("fileUrl", "file_url"),
        Column::text("thumbnailUrl", "thumbnail_url").nullable(),
        Column::text("fileType", "file_type"),
        Column::new("pageCount", "page_count", ColumnKind::Integer).nullable(),
        Column::reference("categoryId", "category_id").nullable(),
        Column::new("tags", "tags", ColumnKind::TextArray).nullable(),
        Column::counter("viewCount", "view_count"),
        Column::counter("likeCount", "like_count"),
        Column::counter("commentCount", "comment_count"),
        Column::flag("isPrivate", "is_private"),
        Column::created("createdAt", "created_at"),
        Column::created("updatedAt", "updated_at"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &[
        "id",
        "viewCount",
        "likeCount",
        "commentCount",
        "createdAt",
        "updatedAt",
    ];

    type Insert = NewDocument;
}

impl Entity for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::text("name", "name").unique(),
        Column::text("icon", "icon"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &["id"];

    type Insert = NewCategory;
}

impl Entity for Comment {
    const TABLE: &'static str = "comments";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::reference("documentId", "document_id"),
        Column::reference("authorId", "author_id"),
        Column::text("content", "content"),
        Column::reference("parentId", "parent_id").nullable(),
        Column::counter("likes", "likes"),
        Column::created("createdAt", "created_at"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &["id", "likes", "createdAt"];

    type Insert = NewComment;
}

impl Entity for Like {
    const TABLE: &'static str = "likes";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::reference("userId", "user_id"),
        Column::reference("documentId", "document_id"),
        Column::created("createdAt", "created_at"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &["id", "createdAt"];

    type Insert = NewLike;
}

impl Entity for Bookmark {
    const TABLE: &'static str = "bookmarks";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::reference("userId", "user_id"),
        Column::reference("documentId", "document_id"),
        Column::created("createdAt", "created_at"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &["id", "createdAt"];

    type Insert = NewBookmark;
}

impl Entity for Collection {
    const TABLE: &'static str = "collections";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::text("name", "name"),
        Column::text("description", "description").nullable(),
        Column::reference("userId", "user_id"),
        Column::created("createdAt", "created_at"),
        Column::created("updatedAt", "updated_at"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &["id", "createdAt", "updatedAt"];

    type Insert = NewCollection;
}

impl Entity for CollectionDocument {
    const TABLE: &'static str = "collection_documents";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::reference("collectionId", "collection_id"),
        Column::reference("documentId", "document_id"),
        Column::created("addedAt", "added_at"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &["id", "addedAt"];

    type Insert = NewCollectionDocument;
}

impl Entity for Follow {
    const TABLE: &'static str = "follows";
    const COLUMNS: &'static [Column] = &[
        Column::id(),
        Column::reference("followerId", "follower_id"),
        Column::reference("followingId", "following_id"),
        Column::created("createdAt", "created_at"),
    ];
    const SERVER_OWNED: &'static [&'static str] = &["id", "createdAt"];

    type Insert = NewFollow;
}
