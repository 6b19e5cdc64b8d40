use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::models::AgentShiftAssignment;
use crate::db::patch::AgentShiftCreate;
use crate::db::queries::properties;
use crate::error::DeskError;

/// Creation order, which is also the tie-break order of the roster matcher.
pub async fn list(
    pool: &SqlitePool,
    property_id: i64,
) -> Result<Vec<AgentShiftAssignment>, DeskError> {
    properties::get(pool, property_id).await?;
    let rows = sqlx::query_as::<_, AgentShiftAssignment>(
        "SELECT * FROM agent_shift_assignments WHERE property_id = ? ORDER BY id",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    property_id: i64,
    create: AgentShiftCreate,
) -> Result<AgentShiftAssignment, DeskError> {
    properties::get(pool, property_id).await?;
    let row = sqlx::query_as::<_, AgentShiftAssignment>(
        r#"
        INSERT INTO agent_shift_assignments (property_id, shift_range, agent_name, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(property_id)
    .bind(create.shift_range)
    .bind(create.agent_name.trim())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    info!(
        property_id,
        agent = %row.agent_name,
        range = %row.shift_range,
        "agent shift assigned"
    );
    Ok(row)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM agent_shift_assignments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Agent shift"));
    }
    Ok(())
}
