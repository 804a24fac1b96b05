use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use time::OffsetDateTime;

pub fn current_time() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub async fn connect_to_db(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to the database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Splits a list of targets into trimmed, non-empty entries.
pub fn normalize_targets(targets: Option<Vec<String>>) -> Vec<String> {
    targets
        .unwrap_or_default()
        .into_iter()
        .map(|target| target.trim().to_owned())
        .filter(|target| !target.is_empty())
        .collect()
}
