use std::env;
use std::sync::{Arc, Barrier};

use anyhow::{anyhow, Context, Result};
use diesel::connection::SimpleConnection;
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use docshare::db::{self, PgPool};
use docshare::ids::UserId;
use docshare::models::{Document, NewDocument, NewUser, User};
use docshare::store;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Large enough for every task of [`TestDb::run_concurrently`] to hold its
/// own connection at once.
const TEST_POOL_SIZE: u32 = 8;

static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub struct TestDb {
    pool: PgPool,
}

impl TestDb {
    /// Connects to `TEST_DATABASE_URL`, applies migrations and empties every
    /// table.
    pub async fn connect() -> Result<Self> {
        let database_url = env::var("TEST_DATABASE_URL")
            .context("TEST_DATABASE_URL must be set for integration tests")?;

        let pool = db::init_pool_with_size(&database_url, TEST_POOL_SIZE)?;
        let test_db = Self { pool };
        test_db
            .with_conn(|conn| {
                conn.run_pending_migrations(MIGRATIONS)
                    .map_err(|err| anyhow!("failed to run migrations: {err}"))?;
                truncate_all(conn)
            })
            .await?;
        Ok(test_db)
    }

    pub async fn cleanup(&self) -> Result<()> {
        self.with_conn(truncate_all).await
    }

    pub async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PgConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db::connection(&pool)?;
            f(&mut conn)
        })
        .await
        .context("connection task panicked")?
    }

    /// Runs every task on its own pooled connection. All tasks check out their
    /// connection first and then start together behind a barrier.
    #[allow(dead_code)]
    pub async fn run_concurrently<F, T>(&self, tasks: Vec<F>) -> Result<Vec<T>>
    where
        F: FnOnce(&mut PgConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let barrier = Arc::new(Barrier::new(tasks.len()));
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let pool = self.pool.clone();
                let barrier = Arc::clone(&barrier);
                tokio::task::spawn_blocking(move || {
                    let conn = db::connection(&pool);
                    barrier.wait();
                    let mut conn = conn?;
                    task(&mut conn)
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.context("concurrent task panicked")??);
        }
        Ok(results)
    }
}

pub async fn acquire_db_lock() -> tokio::sync::MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

fn truncate_all(conn: &mut PgConnection) -> Result<()> {
    conn.batch_execute(
        "TRUNCATE TABLE follows, collection_documents, collections, bookmarks, likes, comments, documents, categories, users RESTART IDENTITY CASCADE;",
    )
    .context("failed to truncate tables")?;
    Ok(())
}

#[allow(dead_code)]
pub fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "hunter2".to_string(),
        display_name: username.to_uppercase(),
        email: format!("{username}@example.com"),
        avatar: None,
        bio: None,
    }
}

#[allow(dead_code)]
pub fn new_document(author_id: UserId, title: &str) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        description: None,
        author_id,
        file_url: format!("https://files.example.com/{}.pdf", title.to_lowercase()),
        thumbnail_url: None,
        file_type: "PDF".to_string(),
        page_count: None,
        category_id: None,
        tags: None,
        is_private: None,
    }
}

#[allow(dead_code)]
pub fn seed_user(conn: &mut PgConnection, username: &str) -> Result<User> {
    store::create_user(conn, &new_user(username)).context("failed to seed user")
}

#[allow(dead_code)]
pub fn seed_document(conn: &mut PgConnection, author_id: UserId, title: &str) -> Result<Document> {
    store::create_document(conn, &new_document(author_id, title)).context("failed to seed document")
}
