use chrono::Utc;
use sqlx::{SqlitePool, types::Json};
use tracing::info;

use crate::db::models::EmailSettings;
use crate::db::patch::EmailSettingsUpsert;
use crate::db::queries::properties;
use crate::error::DeskError;

/// `None` when the property has never been configured.
pub async fn get(pool: &SqlitePool, property_id: i64) -> Result<Option<EmailSettings>, DeskError> {
    properties::get(pool, property_id).await?;
    let row = sqlx::query_as::<_, EmailSettings>(
        "SELECT * FROM email_settings WHERE property_id = ?",
    )
    .bind(property_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn upsert(
    pool: &SqlitePool,
    property_id: i64,
    settings: EmailSettingsUpsert,
) -> Result<EmailSettings, DeskError> {
    properties::get(pool, property_id).await?;
    let recipients: Vec<String> = settings
        .recipients
        .iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    let row = sqlx::query_as::<_, EmailSettings>(
        r#"
        INSERT INTO email_settings (property_id, recipients, auto_send, attach_pdf, attach_csv, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(property_id) DO UPDATE SET
            recipients = excluded.recipients,
            auto_send = excluded.auto_send,
            attach_pdf = excluded.attach_pdf,
            attach_csv = excluded.attach_csv,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(property_id)
    .bind(Json(recipients))
    .bind(settings.auto_send)
    .bind(settings.attach_pdf)
    .bind(settings.attach_csv)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    info!(
        property_id,
        recipients = row.recipients.len(),
        auto_send = row.auto_send,
        "email settings saved"
    );
    Ok(row)
}
