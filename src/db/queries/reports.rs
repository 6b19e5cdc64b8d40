use chrono::{DateTime, NaiveDate, Utc};
use shiftdesk_core::{Shift, ShiftStatusMap};
use sqlx::{SqliteConnection, SqlitePool, types::Json};
use tracing::{debug, info};

use crate::db::models::{
    DailyDuty, DailyReport, GuestCheckin, Package, PackageAudit, ReportBundle, ShiftNotes,
};
use crate::db::patch::{ReportCreate, ReportPatch};
use crate::db::queries::properties;
use crate::error::DeskError;
use shiftdesk_schema::ReportQuery;

/// Newest first.
pub async fn list(pool: &SqlitePool, query: ReportQuery) -> Result<Vec<DailyReport>, DeskError> {
    let rows = sqlx::query_as::<_, DailyReport>(
        r#"
        SELECT * FROM daily_reports
        WHERE (? IS NULL OR property_id = ?)
          AND (? IS NULL OR report_date = ?)
        ORDER BY report_date DESC, id DESC
        "#,
    )
    .bind(query.property_id)
    .bind(query.property_id)
    .bind(query.date)
    .bind(query.date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<DailyReport, DeskError> {
    let mut conn = pool.acquire().await?;
    get_in(&mut conn, id).await
}

pub(crate) async fn get_in(conn: &mut SqliteConnection, id: i64) -> Result<DailyReport, DeskError> {
    sqlx::query_as::<_, DailyReport>("SELECT * FROM daily_reports WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DeskError::NotFound("Report"))
}

/// Returns the report for `(property, date)`, creating it (and seeding its duties) if absent.
/// The flag is `true` when this call created the row.
pub async fn find_or_create(
    pool: &SqlitePool,
    create: ReportCreate,
) -> Result<(DailyReport, bool), DeskError> {
    let mut tx = pool.begin().await?;
    let out = find_or_create_in(
        &mut tx,
        create.property_id,
        create.report_date,
        create.agent_name,
        create.current_shift,
    )
    .await?;
    tx.commit().await?;
    Ok(out)
}

async fn find_or_create_in(
    conn: &mut SqliteConnection,
    property_id: i64,
    report_date: NaiveDate,
    agent_name: Option<String>,
    current_shift: Option<Shift>,
) -> Result<(DailyReport, bool), DeskError> {
    properties::get_in(&mut *conn, property_id).await?;

    let now = Utc::now();
    let inserted: Option<i64> = sqlx::query_scalar(
        r#"
        INSERT INTO daily_reports (
            property_id, report_date, agent_name, current_shift, shift_status, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, '{}', ?, ?)
        ON CONFLICT(property_id, report_date) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(property_id)
    .bind(report_date)
    .bind(agent_name)
    .bind(current_shift)
    .bind(now)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;

    let created = inserted.is_some();
    if let Some(report_id) = inserted {
        let seeded = seed_duties_in(&mut *conn, report_id, property_id).await?;
        info!(report_id, property_id, %report_date, seeded, "daily report created");
    }

    let report = sqlx::query_as::<_, DailyReport>(
        "SELECT * FROM daily_reports WHERE property_id = ? AND report_date = ?",
    )
    .bind(property_id)
    .bind(report_date)
    .fetch_one(&mut *conn)
    .await?;

    Ok((report, created))
}

/// Copies the property's active duty templates onto the report. Templates already present
/// are left alone, so this can be re-run.
async fn seed_duties_in(
    conn: &mut SqliteConnection,
    report_id: i64,
    property_id: i64,
) -> Result<u64, DeskError> {
    let res = sqlx::query(
        r#"
        INSERT INTO daily_duties (report_id, template_id, shift, task, sort_order, completed)
        SELECT ?, id, shift, task, sort_order, 0
        FROM duty_templates
        WHERE property_id = ? AND active = 1
        ON CONFLICT(report_id, template_id) DO NOTHING
        "#,
    )
    .bind(report_id)
    .bind(property_id)
    .execute(&mut *conn)
    .await?;
    Ok(res.rows_affected())
}

pub async fn seed_duties(pool: &SqlitePool, report_id: i64) -> Result<u64, DeskError> {
    let mut tx = pool.begin().await?;
    let report = get_in(&mut tx, report_id).await?;
    let seeded = seed_duties_in(&mut tx, report.id, report.property_id).await?;
    tx.commit().await?;
    debug!(report_id, seeded, "duties seeded");
    Ok(seeded)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: ReportPatch,
) -> Result<DailyReport, DeskError> {
    sqlx::query_as::<_, DailyReport>(
        r#"
        UPDATE daily_reports
        SET
            agent_name = COALESCE(?, agent_name),
            current_shift = COALESCE(?, current_shift),
            updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(patch.agent_name)
    .bind(patch.current_shift)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DeskError::NotFound("Report"))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM daily_reports WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Report"));
    }
    info!(report_id = id, "daily report deleted");
    Ok(())
}

pub async fn details(pool: &SqlitePool, id: i64) -> Result<ReportBundle, DeskError> {
    let mut conn = pool.acquire().await?;
    let report = get_in(&mut conn, id).await?;
    let property = properties::get_in(&mut conn, report.property_id).await?;

    let checkins = sqlx::query_as::<_, GuestCheckin>(
        "SELECT * FROM guest_checkins WHERE report_id = ? ORDER BY checked_in_at, id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let packages = sqlx::query_as::<_, Package>(
        "SELECT * FROM packages WHERE report_id = ? ORDER BY received_at, id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let package_audits = sqlx::query_as::<_, PackageAudit>(
        "SELECT * FROM package_audits WHERE report_id = ? ORDER BY shift",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let duties = sqlx::query_as::<_, DailyDuty>(
        "SELECT * FROM daily_duties WHERE report_id = ? ORDER BY shift, sort_order, id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let notes = sqlx::query_as::<_, ShiftNotes>(
        "SELECT * FROM shift_notes WHERE report_id = ? ORDER BY shift",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ReportBundle {
        report,
        property,
        checkins,
        packages,
        package_audits,
        duties,
        notes,
    })
}

/// Finds or creates the property's report for `date` and points it at `shift`.
///
/// `agent` is the roster match for the current hour. It is written when the report has no
/// agent yet or the shift just changed; otherwise a manually entered name is kept.
pub async fn sync_current(
    pool: &SqlitePool,
    property_id: i64,
    date: NaiveDate,
    shift: Shift,
    agent: Option<String>,
) -> Result<DailyReport, DeskError> {
    let mut tx = pool.begin().await?;
    let (report, _) =
        find_or_create_in(&mut tx, property_id, date, agent.clone(), Some(shift)).await?;

    let shift_changed = report.current_shift != Some(shift);
    let agent_name = match agent {
        Some(name) if shift_changed || report.agent_name.is_none() => Some(name),
        _ => report.agent_name.clone(),
    };

    let report = if shift_changed || agent_name != report.agent_name {
        let updated = sqlx::query_as::<_, DailyReport>(
            r#"
            UPDATE daily_reports
            SET current_shift = ?, agent_name = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(shift)
        .bind(agent_name)
        .bind(Utc::now())
        .bind(report.id)
        .fetch_one(&mut *tx)
        .await?;
        debug!(
            report_id = updated.id,
            shift = %shift,
            shift_changed,
            agent = ?updated.agent_name,
            "current report synced"
        );
        updated
    } else {
        report
    };

    tx.commit().await?;
    Ok(report)
}

/// Reports dated `date` whose current shift is `shift`.
pub async fn due_for_dispatch(
    pool: &SqlitePool,
    date: NaiveDate,
    shift: Shift,
) -> Result<Vec<DailyReport>, DeskError> {
    let rows = sqlx::query_as::<_, DailyReport>(
        "SELECT * FROM daily_reports WHERE report_date = ? AND current_shift = ? ORDER BY id",
    )
    .bind(date)
    .bind(shift)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Read-modify-write of the status blob inside one transaction.
async fn update_status<R>(
    pool: &SqlitePool,
    id: i64,
    apply: impl FnOnce(&mut ShiftStatusMap) -> R,
) -> Result<(DailyReport, R), DeskError> {
    let mut tx = pool.begin().await?;
    let report = get_in(&mut tx, id).await?;
    let Json(mut status) = report.shift_status;
    let out = apply(&mut status);

    let report = sqlx::query_as::<_, DailyReport>(
        "UPDATE daily_reports SET shift_status = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(Json(status))
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((report, out))
}

pub async fn mark_shift_completed(
    pool: &SqlitePool,
    id: i64,
    shift: Shift,
    at: DateTime<Utc>,
) -> Result<DailyReport, DeskError> {
    let (report, ()) = update_status(pool, id, |status| status.mark_completed(shift, at)).await?;
    info!(report_id = id, shift = %shift, "shift marked completed");
    Ok(report)
}

/// `false` when the shift had already been marked sent; the blob is left unchanged then.
pub async fn mark_shift_sent(
    pool: &SqlitePool,
    id: i64,
    shift: Shift,
    at: DateTime<Utc>,
) -> Result<bool, DeskError> {
    let (_, changed) = update_status(pool, id, |status| status.mark_sent(shift, at)).await?;
    Ok(changed)
}
