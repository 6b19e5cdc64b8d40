use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::DutyTemplate;
use crate::db::patch::{DutyTemplateCreate, DutyTemplatePatch};
use crate::db::queries::properties;
use crate::error::DeskError;

pub async fn list(pool: &SqlitePool, property_id: i64) -> Result<Vec<DutyTemplate>, DeskError> {
    properties::get(pool, property_id).await?;
    let rows = sqlx::query_as::<_, DutyTemplate>(
        "SELECT * FROM duty_templates WHERE property_id = ? ORDER BY shift, sort_order, id",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    property_id: i64,
    create: DutyTemplateCreate,
) -> Result<DutyTemplate, DeskError> {
    properties::get(pool, property_id).await?;
    let row = sqlx::query_as::<_, DutyTemplate>(
        r#"
        INSERT INTO duty_templates (property_id, shift, task, sort_order, active, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(property_id)
    .bind(create.shift)
    .bind(create.task.trim())
    .bind(create.sort_order.unwrap_or(0))
    .bind(create.active.unwrap_or(true))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Existing reports keep the duties they were seeded with.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: DutyTemplatePatch,
) -> Result<DutyTemplate, DeskError> {
    sqlx::query_as::<_, DutyTemplate>(
        r#"
        UPDATE duty_templates
        SET
            shift = COALESCE(?, shift),
            task = COALESCE(?, task),
            sort_order = COALESCE(?, sort_order),
            active = COALESCE(?, active)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(patch.shift)
    .bind(patch.task.as_deref().map(str::trim))
    .bind(patch.sort_order)
    .bind(patch.active)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DeskError::NotFound("Duty template"))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM duty_templates WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Duty template"));
    }
    Ok(())
}
