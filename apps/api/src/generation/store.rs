//! Persistence for finished generations.
//!
//! Append-only: a save allocates a fresh, increasing id and a creation timestamp.
//! Records are never updated or deleted.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::generation::{GenerationRecord, GenerationRow, NewGeneration};

#[async_trait]
pub trait GenerationStore: Send + Sync {
    async fn save(&self, generation: NewGeneration) -> Result<GenerationRecord>;

    async fn get(&self, id: i64) -> Result<Option<GenerationRecord>>;

    /// Most recent first, at most `limit` records.
    async fn recent(&self, limit: usize) -> Result<Vec<GenerationRecord>>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryInner {
    last_id: i64,
    records: BTreeMap<i64, GenerationRecord>,
}

/// Process-local store, used when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GenerationStore for MemoryStore {
    async fn save(&self, generation: NewGeneration) -> Result<GenerationRecord> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let record = GenerationRecord {
            id: inner.last_id,
            request: generation.request,
            generated_content: generation.generated_content,
            created_at: Utc::now(),
        };
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<GenerationRecord>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<GenerationRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<_> = inner.records.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        Ok(records)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL store
// ────────────────────────────────────────────────────────────────────────────

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenerationStore for PgStore {
    async fn save(&self, generation: NewGeneration) -> Result<GenerationRecord> {
        let NewGeneration {
            request,
            generated_content,
        } = generation;

        let row = sqlx::query_as::<_, GenerationRow>(
            r#"
            INSERT INTO content_generations
                (content_type, tone_style, word_count, platform, keywords,
                 call_to_action, target_audience, feature_flags, generated_content)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(request.content_type.as_str())
        .bind(request.tone_style.as_str())
        .bind(request.word_count.as_str())
        .bind(request.platform.as_str())
        .bind(&request.keywords)
        .bind(&request.call_to_action)
        .bind(&request.target_audience)
        .bind(Json(&request.flags))
        .bind(Json(&generated_content))
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert content generation")?;

        info!("Stored content generation {}", row.id);
        Ok(GenerationRecord::try_from(row)?)
    }

    async fn get(&self, id: i64) -> Result<Option<GenerationRecord>> {
        let row = sqlx::query_as::<_, GenerationRow>(
            "SELECT * FROM content_generations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GenerationRecord::try_from).transpose()?)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<GenerationRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, GenerationRow>(
            "SELECT * FROM content_generations ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| GenerationRecord::try_from(row).map_err(Into::into))
            .collect()
    }
}
