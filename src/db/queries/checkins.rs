use chrono::{NaiveDateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::models::GuestCheckin;
use crate::db::patch::{CheckinCreate, CheckinPatch};
use crate::db::queries::reports;
use crate::error::DeskError;

pub async fn list(pool: &SqlitePool, report_id: i64) -> Result<Vec<GuestCheckin>, DeskError> {
    reports::get(pool, report_id).await?;
    let rows = sqlx::query_as::<_, GuestCheckin>(
        "SELECT * FROM guest_checkins WHERE report_id = ? ORDER BY checked_in_at, id",
    )
    .bind(report_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `now_local` fills `checked_in_at` when the client did not send one.
pub async fn create(
    pool: &SqlitePool,
    report_id: i64,
    create: CheckinCreate,
    now_local: NaiveDateTime,
) -> Result<GuestCheckin, DeskError> {
    reports::get(pool, report_id).await?;
    let row = sqlx::query_as::<_, GuestCheckin>(
        r#"
        INSERT INTO guest_checkins (
            report_id, shift, guest_name, unit, resident_id, purpose, id_verified,
            checked_in_at, notes, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(report_id)
    .bind(create.shift)
    .bind(create.guest_name.trim())
    .bind(create.unit)
    .bind(create.resident_id)
    .bind(create.purpose)
    .bind(create.id_verified)
    .bind(create.checked_in_at.unwrap_or(now_local))
    .bind(create.notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    debug!(report_id, checkin_id = row.id, shift = %row.shift, "guest checked in");
    Ok(row)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: CheckinPatch,
) -> Result<GuestCheckin, DeskError> {
    sqlx::query_as::<_, GuestCheckin>(
        r#"
        UPDATE guest_checkins
        SET
            guest_name = COALESCE(?, guest_name),
            unit = COALESCE(?, unit),
            purpose = COALESCE(?, purpose),
            id_verified = COALESCE(?, id_verified),
            checked_out_at = COALESCE(?, checked_out_at),
            notes = COALESCE(?, notes)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(patch.guest_name.as_deref().map(str::trim))
    .bind(patch.unit)
    .bind(patch.purpose)
    .bind(patch.id_verified)
    .bind(patch.checked_out_at)
    .bind(patch.notes)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DeskError::NotFound("Check-in"))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM guest_checkins WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Check-in"));
    }
    Ok(())
}
