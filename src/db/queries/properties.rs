use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::db::models::Property;
use crate::db::patch::{PropertyCreate, PropertyPatch};
use crate::error::DeskError;

pub async fn list(pool: &SqlitePool) -> Result<Vec<Property>, DeskError> {
    let rows = sqlx::query_as::<_, Property>("SELECT * FROM properties ORDER BY name, id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Property, DeskError> {
    let mut conn = pool.acquire().await?;
    get_in(&mut conn, id).await
}

pub(crate) async fn get_in(conn: &mut SqliteConnection, id: i64) -> Result<Property, DeskError> {
    sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DeskError::NotFound("Property"))
}

pub async fn create(pool: &SqlitePool, create: PropertyCreate) -> Result<Property, DeskError> {
    let row = sqlx::query_as::<_, Property>(
        r#"
        INSERT INTO properties (name, address, phone, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(create.name.trim())
    .bind(create.address)
    .bind(create.phone)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    info!(property_id = row.id, name = %row.name, "property created");
    Ok(row)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: PropertyPatch,
) -> Result<Property, DeskError> {
    sqlx::query_as::<_, Property>(
        r#"
        UPDATE properties
        SET
            name = COALESCE(?, name),
            address = COALESCE(?, address),
            phone = COALESCE(?, phone)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.address)
    .bind(patch.phone)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DeskError::NotFound("Property"))
}

/// Removes the property and, through the foreign keys, everything filed under it.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM properties WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("Property"));
    }
    info!(property_id = id, "property deleted");
    Ok(())
}
