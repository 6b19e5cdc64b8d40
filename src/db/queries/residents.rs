use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::models::Resident;
use crate::db::patch::{ResidentCreate, ResidentPatch};
use crate::db::queries::properties;
use crate::error::DeskError;

pub async fn list(pool: &SqlitePool, property_id: i64) -> Result<Vec<Resident>, DeskError> {
    properties::get(pool, property_id).await?;
    let rows = sqlx::query_as::<_, Resident>(
        "SELECT * FROM residents WHERE property_id = ? ORDER BY unit, name, id",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    property_id: i64,
    create: ResidentCreate,
) -> Result<Resident, DeskError> {
    properties::get(pool, property_id).await?;
    let row = sqlx::query_as::<_, Resident>(
        r#"
        INSERT INTO residents (property_id, name, unit, phone, email, notes, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(property_id)
    .bind(create.name.trim())
    .bind(create.unit)
    .bind(create.phone)
    .bind(create.email)
    .bind(create.notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Inserts every row or none.
pub async fn import(
    pool: &SqlitePool,
    property_id: i64,
    rows: Vec<ResidentCreate>,
) -> Result<usize, DeskError> {
    let mut tx = pool.begin().await?;
    properties::get_in(&mut tx, property_id).await?;

    let now = Utc::now();
    let total = rows.len();
    for r in rows {
        sqlx::query(
            r#"
            INSERT INTO residents (property_id, name, unit, phone, email, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(property_id)
        .bind(r.name.trim())
        .bind(r.unit)
        .bind(r.phone)
        .bind(r.email)
        .bind(r.notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(property_id, imported = total, "residents imported");
    Ok(total)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: ResidentPatch,
) -> Result<Resident, DeskError> {
    sqlx::query_as::<_, Resident>(
        r#"
        UPDATE residents
        SET
            name = COALESCE(?, name),
            unit = COALESCE(?, unit),
            phone = COALESCE(?, phone),
            email = COALESCE(?, email),
            notes = COALESCE(?, notes)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.unit)
    .bind(patch.phone)
    .bind(patch.email)
    .bind(patch.notes)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DeskError::NotFound("Resident"))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM residents WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Resident"));
    }
    Ok(())
}
