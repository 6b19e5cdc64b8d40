use chrono::Utc;
use shiftdesk_core::Shift;
use sqlx::SqlitePool;

use crate::db::models::ShiftNotes;
use crate::db::patch::NotesUpsert;
use crate::db::queries::reports;
use crate::error::DeskError;

pub async fn list(pool: &SqlitePool, report_id: i64) -> Result<Vec<ShiftNotes>, DeskError> {
    reports::get(pool, report_id).await?;
    let rows = sqlx::query_as::<_, ShiftNotes>(
        "SELECT * FROM shift_notes WHERE report_id = ? ORDER BY shift",
    )
    .bind(report_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// At most one notes row per report and shift.
pub async fn upsert(
    pool: &SqlitePool,
    report_id: i64,
    shift: Shift,
    notes: NotesUpsert,
) -> Result<ShiftNotes, DeskError> {
    reports::get(pool, report_id).await?;
    let row = sqlx::query_as::<_, ShiftNotes>(
        r#"
        INSERT INTO shift_notes (report_id, shift, content, agent_name, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(report_id, shift) DO UPDATE SET
            content = excluded.content,
            agent_name = COALESCE(excluded.agent_name, agent_name),
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(report_id)
    .bind(shift)
    .bind(notes.content)
    .bind(notes.agent_name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(row)
}
