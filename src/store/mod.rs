//! Row-level operations over the docshare tables.
//!
//! Every write that changes a relationship (likes, comments, follows, ...)
//! also adjusts the denormalized counter that mirrors it, inside the same
//! transaction, using in-place `col = col + n` updates.

pub mod categories;
pub mod collections;
pub mod comments;
pub mod counters;
pub mod documents;
pub mod follows;
pub mod reactions;
pub mod users;

pub use categories::{create_category, find_category, list_categories};
pub use collections::{
    add_to_collection, create_collection, list_collection_documents, list_user_collections,
    remove_from_collection, update_collection,
};
pub use comments::{create_comment, delete_comment, like_comment, list_comments};
pub use counters::{find_counter_drift, recount_counters, CounterDrift, RecountReport};
pub use documents::{
    create_document, find_document, list_documents_by_author, list_documents_in_category,
    list_public_documents, record_view, update_document,
};
pub use follows::{follow_user, is_following, list_followers, list_following, unfollow_user};
pub use reactions::{
    bookmark_document, has_bookmarked, has_liked, like_document, list_bookmarked_documents,
    remove_bookmark, unlike_document,
};
pub use users::{create_user, find_user, find_user_by_username, update_user_profile};
