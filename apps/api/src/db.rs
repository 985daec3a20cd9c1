use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS content_generations (
        id                BIGSERIAL PRIMARY KEY,
        content_type      TEXT NOT NULL,
        tone_style        TEXT NOT NULL,
        word_count        TEXT NOT NULL,
        platform          TEXT NOT NULL,
        keywords          TEXT NOT NULL,
        call_to_action    TEXT,
        target_audience   TEXT,
        feature_flags     JSONB NOT NULL DEFAULT '{}'::jsonb,
        generated_content JSONB NOT NULL,
        created_at        TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS content_generations_created_at_idx \
     ON content_generations (created_at DESC, id DESC)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the generations table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
