mod common;

use anyhow::Result;
use common::{acquire_db_lock, seed_document, seed_user, TestDb};
use diesel::PgConnection;
use docshare::models::{Collection, CollectionChanges, Follow};
use docshare::{store, validate_insert, StoreError, ValidationError};
use serde_json::json;

#[tokio::test]
async fn follows_move_both_counters() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let db = TestDb::connect().await?;

    db.with_conn(|conn| {
        let ada = seed_user(conn, "ada")?;
        let grace = seed_user(conn, "grace")?;
        let linus = seed_user(conn, "linus")?;

        let edge = validate_insert::<Follow>(&json!({
            "followerId": grace.id,
            "followingId": ada.id
        }))?;
        store::follow_user(conn, edge.follower_id, edge.following_id)?;
        store::follow_user(conn, linus.id, ada.id)?;
        store::follow_user(conn, ada.id, grace.id)?;

        let ada_row = store::find_user(conn, ada.id)?;
        assert_eq!(ada_row.followers, 2);
        assert_eq!(ada_row.following, 1);
        let grace_row = store::find_user(conn, grace.id)?;
        assert_eq!(grace_row.followers, 1);
        assert_eq!(grace_row.following, 1);

        let followers = store::list_followers(conn, ada.id)?;
        assert_eq!(
            followers.iter().map(|user| user.username.as_str()).collect::<Vec<_>>(),
            ["grace", "linus"]
        );
        let following = store::list_following(conn, ada.id)?;
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].id, grace.id);
        assert!(store::is_following(conn, linus.id, ada.id)?);

        let err = store::follow_user(conn, grace.id, ada.id).unwrap_err();
        assert!(
            matches!(&err, StoreError::UniquenessViolation { constraint } if constraint == "follows_follower_following_key"),
            "unexpected error: {err}"
        );
        assert_eq!(store::find_user(conn, ada.id)?.followers, 2);
        assert_eq!(store::find_user(conn, grace.id)?.following, 1);

        assert!(store::unfollow_user(conn, linus.id, ada.id)?);
        assert!(!store::unfollow_user(conn, linus.id, ada.id)?);
        assert_eq!(store::find_user(conn, ada.id)?.followers, 1);
        assert_eq!(store::find_user(conn, linus.id)?.following, 0);
        Ok(())
    })
    .await?;

    db.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn self_follows_are_rejected() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let db = TestDb::connect().await?;

    db.with_conn(|conn| {
        let ada = seed_user(conn, "ada")?;
        let err = store::follow_user(conn, ada.id, ada.id).unwrap_err();
        assert!(matches!(err, StoreError::SelfFollow));

        let ada = store::find_user(conn, ada.id)?;
        assert_eq!((ada.followers, ada.following), (0, 0));
        Ok(())
    })
    .await?;

    db.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn collections_group_documents_in_insertion_order() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let db = TestDb::connect().await?;

    db.with_conn(|conn| {
        let owner = seed_user(conn, "ada")?;
        let first = seed_document(conn, owner.id, "First")?;
        let second = seed_document(conn, owner.id, "Second")?;

        let err = validate_insert::<Collection>(&json!({
            "name": "Reading list",
            "userId": owner.id,
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::UnexpectedField("updatedAt".to_string()));

        let new_collection = validate_insert::<Collection>(&json!({
            "name": "Reading list",
            "userId": owner.id
        }))?;
        let collection = store::create_collection(conn, &new_collection)?;
        assert_eq!(collection.description, None);
        assert_eq!(collection.created_at, collection.updated_at);

        store::add_to_collection(conn, collection.id, second.id)?;
        let entry = store::add_to_collection(conn, collection.id, first.id)?;
        assert_eq!(entry.collection_id, collection.id);
        assert_eq!(entry.document_id, first.id);
        assert!(store::add_to_collection(conn, collection.id, first.id)
            .unwrap_err()
            .is_uniqueness_violation());

        let documents = store::list_collection_documents(conn, collection.id)?;
        assert_eq!(
            documents.iter().map(|doc| doc.id).collect::<Vec<_>>(),
            [second.id, first.id]
        );

        let renamed = store::update_collection(
            conn,
            collection.id,
            &CollectionChanges {
                name: Some("Classics".to_string()),
                description: Some(Some("Must reads".to_string())),
            },
        )?;
        assert_eq!(renamed.name, "Classics");
        assert!(renamed.updated_at > collection.updated_at);

        assert!(store::remove_from_collection(conn, collection.id, second.id)?);
        assert!(!store::remove_from_collection(conn, collection.id, second.id)?);
        let documents = store::list_collection_documents(conn, collection.id)?;
        assert_eq!(documents.len(), 1);

        let owned = store::list_user_collections(conn, &owner)?;
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].name, "Classics");
        Ok(())
    })
    .await?;

    db.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn reciprocal_follows_commit_concurrently() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let db = TestDb::connect().await?;

    let (ada, grace) = db
        .with_conn(|conn| Ok((seed_user(conn, "ada")?.id, seed_user(conn, "grace")?.id)))
        .await?;

    for _ in 0..20 {
        let follows = db
            .run_concurrently(
                [(ada, grace), (grace, ada)]
                    .into_iter()
                    .map(|(follower, following)| {
                        move |conn: &mut PgConnection| -> Result<Follow> {
                            Ok(store::follow_user(conn, follower, following)?)
                        }
                    })
                    .collect(),
            )
            .await?;
        assert_eq!(follows.len(), 2);

        db.with_conn(move |conn| {
            for user_id in [ada, grace] {
                let user = store::find_user(conn, user_id)?;
                assert_eq!((user.followers, user.following), (1, 1));
            }
            Ok(())
        })
        .await?;

        let removed = db
            .run_concurrently(
                [(ada, grace), (grace, ada)]
                    .into_iter()
                    .map(|(follower, following)| {
                        move |conn: &mut PgConnection| -> Result<bool> {
                            Ok(store::unfollow_user(conn, follower, following)?)
                        }
                    })
                    .collect(),
            )
            .await?;
        assert_eq!(removed, [true, true]);
    }

    db.with_conn(move |conn| {
        for user_id in [ada, grace] {
            let user = store::find_user(conn, user_id)?;
            assert_eq!((user.followers, user.following), (0, 0));
        }
        assert!(store::find_counter_drift(conn)?.is_empty());
        Ok(())
    })
    .await?;

    db.cleanup().await?;
    Ok(())
}
