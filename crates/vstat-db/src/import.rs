//! JSON dataset importer
//!
//! Loads the `videos.json` dump (videos with nested hourly snapshots) and
//! inserts it into the two statistics tables. Re-running the import is
//! safe: existing rows are skipped via `ON CONFLICT DO NOTHING`.

use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::PgPool;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use vstat_core::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct Dataset {
    pub videos: Vec<VideoRecord>,
}

#[derive(Debug, Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub video_created_at: NaiveDateTime,
    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub reports_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub snapshots: Vec<SnapshotRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotRecord {
    pub id: Uuid,
    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub reports_count: i64,
    pub delta_views_count: i64,
    pub delta_likes_count: i64,
    pub delta_comments_count: i64,
    pub delta_reports_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Counts of rows handed to the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub videos: usize,
    pub snapshots: usize,
}

/// Parse a dataset file
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| Error::Serialization(e.to_string()))
}

/// Import a dataset file into the database
pub async fn import_dataset(pool: &PgPool, path: &Path) -> Result<ImportSummary> {
    let dataset = load_dataset(path)?;
    info!(videos = dataset.videos.len(), "importing dataset");

    let mut snapshots = 0;
    for video in &dataset.videos {
        insert_video(pool, video).await?;
        for snapshot in &video.snapshots {
            insert_snapshot(pool, video.id, snapshot).await?;
            snapshots += 1;
        }
    }

    Ok(ImportSummary {
        videos: dataset.videos.len(),
        snapshots,
    })
}

async fn insert_video(pool: &PgPool, video: &VideoRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO videos (id, creator_id, video_created_at, views_count, likes_count, \
         comments_count, reports_count, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(video.id)
    .bind(video.creator_id)
    .bind(video.video_created_at)
    .bind(video.views_count)
    .bind(video.likes_count)
    .bind(video.comments_count)
    .bind(video.reports_count)
    .bind(video.created_at)
    .bind(video.updated_at)
    .execute(pool)
    .await
    .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

async fn insert_snapshot(pool: &PgPool, video_id: Uuid, snapshot: &SnapshotRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO video_snapshots (id, video_id, views_count, likes_count, comments_count, \
         reports_count, delta_views_count, delta_likes_count, delta_comments_count, \
         delta_reports_count, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(snapshot.id)
    .bind(video_id)
    .bind(snapshot.views_count)
    .bind(snapshot.likes_count)
    .bind(snapshot.comments_count)
    .bind(snapshot.reports_count)
    .bind(snapshot.delta_views_count)
    .bind(snapshot.delta_likes_count)
    .bind(snapshot.delta_comments_count)
    .bind(snapshot.delta_reports_count)
    .bind(snapshot.created_at)
    .bind(snapshot.updated_at)
    .execute(pool)
    .await
    .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}
