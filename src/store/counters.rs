//! Consistency checks for the denormalized counters.
//!
//! `view_count` and comment `likes` have no backing rows and are left alone.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use serde::Serialize;
use tracing::info;

use crate::error::StoreResult;

#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterDrift {
    #[diesel(sql_type = Text)]
    pub entity: String,
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub counter: String,
    #[diesel(sql_type = Integer)]
    pub cached: i32,
    #[diesel(sql_type = BigInt)]
    pub actual: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecountReport {
    pub documents_updated: usize,
    pub users_updated: usize,
}

const DRIFT_QUERY: &str = r#"
SELECT entity, id, counter, cached, actual FROM (
    SELECT 'document' AS entity, d.id, 'likeCount' AS counter, d.like_count AS cached,
           (SELECT COUNT(*) FROM likes l WHERE l.document_id = d.id) AS actual
      FROM documents d
    UNION ALL
    SELECT 'document', d.id, 'commentCount', d.comment_count,
           (SELECT COUNT(*) FROM comments c WHERE c.document_id = d.id)
      FROM documents d
    UNION ALL
    SELECT 'user', u.id, 'followers', u.followers,
           (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id)
      FROM users u
    UNION ALL
    SELECT 'user', u.id, 'following', u.following,
           (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id)
      FROM users u
) drift
WHERE cached <> actual
ORDER BY entity, id, counter
"#;

const RECOUNT_DOCUMENTS: &str = r#"
UPDATE documents d
   SET like_count = counts.likes,
       comment_count = counts.comments
  FROM (
    SELECT d2.id,
           (SELECT COUNT(*) FROM likes l WHERE l.document_id = d2.id) AS likes,
           (SELECT COUNT(*) FROM comments c WHERE c.document_id = d2.id) AS comments
      FROM documents d2
  ) counts
 WHERE counts.id = d.id
   AND (d.like_count <> counts.likes OR d.comment_count <> counts.comments)
"#;

const RECOUNT_USERS: &str = r#"
UPDATE users u
   SET followers = counts.followers,
       following = counts.following
  FROM (
    SELECT u2.id,
           (SELECT COUNT(*) FROM follows f WHERE f.following_id = u2.id) AS followers,
           (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u2.id) AS following
      FROM users u2
  ) counts
 WHERE counts.id = u.id
   AND (u.followers <> counts.followers OR u.following <> counts.following)
"#;

/// Rows whose cached counter disagrees with the relationship rows.
pub fn find_counter_drift(conn: &mut PgConnection) -> StoreResult<Vec<CounterDrift>> {
    Ok(diesel::sql_query(DRIFT_QUERY).load(conn)?)
}

/// Rewrites every drifted counter from the relationship rows.
pub fn recount_counters(conn: &mut PgConnection) -> StoreResult<RecountReport> {
    let report = conn.transaction::<RecountReport, diesel::result::Error, _>(|conn| {
        let documents_updated = diesel::sql_query(RECOUNT_DOCUMENTS).execute(conn)?;
        let users_updated = diesel::sql_query(RECOUNT_USERS).execute(conn)?;
        Ok(RecountReport {
            documents_updated,
            users_updated,
        })
    })?;

    info!(
        documents_updated = report.documents_updated,
        users_updated = report.users_updated,
        "recounted denormalized counters"
    );
    Ok(report)
}
