use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use docshare::{config::AppConfig, db, store};

const USAGE: &str = "Usage: maintenance <check-counters|recount-counters>";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("check-counters") => run_blocking(check_counters).await?,
        Some("recount-counters") => run_blocking(recount_counters).await?,
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}\n{USAGE}");
            std::process::exit(1);
        }
        None => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run_blocking(task: fn(&mut db::PgPooledConnection) -> Result<()>) -> Result<()> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "maintenance",
        database_url = %config.redacted_database_url(),
        pool_size = config.database_max_pool_size,
        "loaded configuration"
    );
    let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;

    tokio::task::spawn_blocking(move || {
        let mut conn = db::connection(&pool)?;
        task(&mut conn)
    })
    .await
    .context("maintenance task panicked")?
}

fn check_counters(conn: &mut db::PgPooledConnection) -> Result<()> {
    let drift = store::find_counter_drift(conn).context("failed to compare counters")?;

    if drift.is_empty() {
        println!("All counters match their relationship rows.");
        return Ok(());
    }

    println!("{} counters out of sync:", drift.len());
    for row in &drift {
        println!(
            "  {} {} {}: cached {} actual {}",
            row.entity, row.id, row.counter, row.cached, row.actual
        );
    }
    Ok(())
}

fn recount_counters(conn: &mut db::PgPooledConnection) -> Result<()> {
    let report = store::recount_counters(conn).context("failed to recount counters")?;
    println!(
        "Recounted counters: {} documents, {} users updated.",
        report.documents_updated, report.users_updated
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
