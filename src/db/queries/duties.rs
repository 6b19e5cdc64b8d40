use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::models::DailyDuty;
use crate::db::patch::{DutyCreate, DutyPatch};
use crate::db::queries::reports;
use crate::error::DeskError;

pub async fn list(pool: &SqlitePool, report_id: i64) -> Result<Vec<DailyDuty>, DeskError> {
    reports::get(pool, report_id).await?;
    let rows = sqlx::query_as::<_, DailyDuty>(
        "SELECT * FROM daily_duties WHERE report_id = ? ORDER BY shift, sort_order, id",
    )
    .bind(report_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Ad-hoc duty that did not come from a template.
pub async fn create(
    pool: &SqlitePool,
    report_id: i64,
    create: DutyCreate,
) -> Result<DailyDuty, DeskError> {
    reports::get(pool, report_id).await?;
    let row = sqlx::query_as::<_, DailyDuty>(
        r#"
        INSERT INTO daily_duties (report_id, template_id, shift, task, sort_order, completed)
        VALUES (?, NULL, ?, ?, ?, 0)
        RETURNING *
        "#,
    )
    .bind(report_id)
    .bind(create.shift)
    .bind(create.task.trim())
    .bind(create.sort_order.unwrap_or(0))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Completing stamps `completed_at`/`completed_by` (falling back to `completer`);
/// un-completing clears both. An already completed duty keeps its stamps.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: DutyPatch,
    completer: String,
) -> Result<DailyDuty, DeskError> {
    let mut tx = pool.begin().await?;
    let current = sqlx::query_as::<_, DailyDuty>("SELECT * FROM daily_duties WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DeskError::NotFound("Duty"))?;

    let completed = patch.completed.unwrap_or(current.completed);
    let (completed_at, completed_by) = match (current.completed, completed) {
        (_, false) => (None, None),
        (false, true) => (Some(Utc::now()), patch.completed_by.or(Some(completer))),
        (true, true) => (
            current.completed_at,
            patch.completed_by.or(current.completed_by),
        ),
    };

    let row = sqlx::query_as::<_, DailyDuty>(
        r#"
        UPDATE daily_duties
        SET
            task = ?,
            sort_order = ?,
            completed = ?,
            completed_at = ?,
            completed_by = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(patch.task.as_deref().map_or(current.task.as_str(), str::trim))
    .bind(patch.sort_order.unwrap_or(current.sort_order))
    .bind(completed)
    .bind(completed_at)
    .bind(completed_by)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    debug!(duty_id = id, completed, "duty updated");
    Ok(row)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM daily_duties WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Duty"));
    }
    Ok(())
}
