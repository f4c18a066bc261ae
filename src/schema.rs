// Maintained by hand alongside `migrations/`; keep column order in sync with
// the row structs in `models.rs`.

diesel::table! {
    bookmarks (id) {
        id -> Int4,
        user_id -> Int4,
        document_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    categories (id) {
        id -> Int4,
        name -> Text,
        icon -> Text,
    }
}

diesel::table! {
    collection_documents (id) {
        id -> Int4,
        collection_id -> Int4,
        document_id -> Int4,
        added_at -> Timestamptz,
    }
}

diesel::table! {
    collections (id) {
        id -> Int4,
        name -> Text,
        description -> Nullable<Text>,
        user_id -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Int4,
        document_id -> Int4,
        author_id -> Int4,
        content -> Text,
        parent_id -> Nullable<Int4>,
        likes -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    documents (id) {
        id -> Int4,
        title -> Text,
        description -> Nullable<Text>,
        author_id -> Int4,
        file_url -> Text,
        thumbnail_url -> Nullable<Text>,
        file_type -> Text,
        page_count -> Nullable<Int4>,
        category_id -> Nullable<Int4>,
        tags -> Nullable<Array<Text>>,
        view_count -> Int4,
        like_count -> Int4,
        comment_count -> Int4,
        is_private -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    follows (id) {
        id -> Int4,
        follower_id -> Int4,
        following_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    likes (id) {
        id -> Int4,
        user_id -> Int4,
        document_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    users (id) {
        id -> Int4,
        username -> Text,
        password -> Text,
        display_name -> Text,
        email -> Text,
        avatar -> Nullable<Text>,
        bio -> Nullable<Text>,
        followers -> Int4,
        following -> Int4,
        is_admin -> Bool,
    }
}

diesel::joinable!(bookmarks -> documents (document_id));
diesel::joinable!(bookmarks -> users (user_id));
diesel::joinable!(collection_documents -> collections (collection_id));
diesel::joinable!(collection_documents -> documents (document_id));
diesel::joinable!(collections -> users (user_id));
diesel::joinable!(comments -> documents (document_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(documents -> categories (category_id));
diesel::joinable!(documents -> users (author_id));
diesel::joinable!(likes -> documents (document_id));
diesel::joinable!(likes -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    bookmarks,
    categories,
    collection_documents,
    collections,
    comments,
    documents,
    follows,
    likes,
    users,
);
