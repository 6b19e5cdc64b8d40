use chrono::{NaiveDateTime, Utc};
use shiftdesk_core::{PackageStatus, Shift};
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::models::{Package, PackageAudit};
use crate::db::patch::{PackageAuditUpsert, PackageCreate, PackagePatch};
use crate::db::queries::reports;
use crate::error::DeskError;

pub async fn list(pool: &SqlitePool, report_id: i64) -> Result<Vec<Package>, DeskError> {
    reports::get(pool, report_id).await?;
    let rows = sqlx::query_as::<_, Package>(
        "SELECT * FROM packages WHERE report_id = ? ORDER BY received_at, id",
    )
    .bind(report_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    report_id: i64,
    create: PackageCreate,
    now_local: NaiveDateTime,
) -> Result<Package, DeskError> {
    reports::get(pool, report_id).await?;
    let row = sqlx::query_as::<_, Package>(
        r#"
        INSERT INTO packages (
            report_id, shift, recipient_name, unit, carrier, tracking_number, status,
            received_at, notes, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(report_id)
    .bind(create.shift)
    .bind(create.recipient_name.trim())
    .bind(create.unit)
    .bind(create.carrier)
    .bind(create.tracking_number)
    .bind(PackageStatus::Received)
    .bind(create.received_at.unwrap_or(now_local))
    .bind(create.notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    debug!(report_id, package_id = row.id, "package logged");
    Ok(row)
}

/// Moving a package to `picked_up` stamps `picked_up_at` with `now_local` unless the
/// client supplied a time. Any other status clears the pickup fields.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: PackagePatch,
    now_local: NaiveDateTime,
) -> Result<Package, DeskError> {
    let stamp = (patch.status == Some(PackageStatus::PickedUp)).then_some(now_local);
    let clear = patch
        .status
        .is_some_and(|status| status != PackageStatus::PickedUp);

    sqlx::query_as::<_, Package>(
        r#"
        UPDATE packages
        SET
            recipient_name = COALESCE(?, recipient_name),
            unit = COALESCE(?, unit),
            carrier = COALESCE(?, carrier),
            tracking_number = COALESCE(?, tracking_number),
            status = COALESCE(?, status),
            picked_up_at = CASE WHEN ? THEN NULL ELSE COALESCE(?, picked_up_at, ?) END,
            picked_up_by = CASE WHEN ? THEN NULL ELSE COALESCE(?, picked_up_by) END,
            notes = COALESCE(?, notes)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(patch.recipient_name.as_deref().map(str::trim))
    .bind(patch.unit)
    .bind(patch.carrier)
    .bind(patch.tracking_number)
    .bind(patch.status)
    .bind(clear)
    .bind(patch.picked_up_at)
    .bind(stamp)
    .bind(clear)
    .bind(patch.picked_up_by)
    .bind(patch.notes)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DeskError::NotFound("Package"))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM packages WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Package"));
    }
    Ok(())
}

pub async fn list_audits(pool: &SqlitePool, report_id: i64) -> Result<Vec<PackageAudit>, DeskError> {
    reports::get(pool, report_id).await?;
    let rows = sqlx::query_as::<_, PackageAudit>(
        "SELECT * FROM package_audits WHERE report_id = ? ORDER BY shift",
    )
    .bind(report_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// One audit per report and shift; a second submission replaces the first.
pub async fn upsert_audit(
    pool: &SqlitePool,
    report_id: i64,
    shift: Shift,
    audit: PackageAuditUpsert,
) -> Result<PackageAudit, DeskError> {
    reports::get(pool, report_id).await?;
    let row = sqlx::query_as::<_, PackageAudit>(
        r#"
        INSERT INTO package_audits (report_id, shift, packages_on_hand, discrepancies, audited_by, audited_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(report_id, shift) DO UPDATE SET
            packages_on_hand = excluded.packages_on_hand,
            discrepancies = excluded.discrepancies,
            audited_by = excluded.audited_by,
            audited_at = excluded.audited_at
        RETURNING *
        "#,
    )
    .bind(report_id)
    .bind(shift)
    .bind(audit.packages_on_hand)
    .bind(audit.discrepancies)
    .bind(audit.audited_by)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    debug!(report_id, shift = %shift, on_hand = row.packages_on_hand, "package audit saved");
    Ok(row)
}
