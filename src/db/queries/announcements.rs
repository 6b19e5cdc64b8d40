use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::Announcement;
use crate::db::patch::AnnouncementCreate;
use crate::db::queries::properties;
use crate::error::DeskError;

/// Unexpired announcements, newest first. With a property, global ones are included.
pub async fn list_active(
    pool: &SqlitePool,
    property_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Vec<Announcement>, DeskError> {
    let rows = sqlx::query_as::<_, Announcement>(
        r#"
        SELECT * FROM announcements
        WHERE (? IS NULL OR property_id IS NULL OR property_id = ?)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(property_id)
    .bind(property_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().filter(|a| a.is_active(now)).collect())
}

pub async fn create(
    pool: &SqlitePool,
    create: AnnouncementCreate,
    created_by: Option<String>,
) -> Result<Announcement, DeskError> {
    if let Some(property_id) = create.property_id {
        properties::get(pool, property_id).await?;
    }
    let row = sqlx::query_as::<_, Announcement>(
        r#"
        INSERT INTO announcements (property_id, title, message, created_by, expires_at, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(create.property_id)
    .bind(create.title.trim())
    .bind(create.message)
    .bind(created_by)
    .bind(create.expires_at)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM announcements WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Announcement"));
    }
    Ok(())
}
