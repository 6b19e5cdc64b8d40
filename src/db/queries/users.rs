use chrono::{DateTime, Utc};
use shiftdesk_core::Role;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::models::{DbUser, PasswordResetToken};
use crate::db::patch::{UserCreate, UserUpdate};
use crate::error::DeskError;

pub async fn list(pool: &SqlitePool) -> Result<Vec<DbUser>, DeskError> {
    let rows = sqlx::query_as::<_, DbUser>("SELECT * FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<DbUser, DeskError> {
    sqlx::query_as::<_, DbUser>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DeskError::NotFound("User"))
}

/// Case-insensitive: `username` is declared `COLLATE NOCASE`.
pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<DbUser>, DeskError> {
    let row = sqlx::query_as::<_, DbUser>("SELECT * FROM users WHERE username = ?")
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Looks the identifier up as a username first, then as an email address.
pub async fn find_by_identifier(
    pool: &SqlitePool,
    identifier: &str,
) -> Result<Option<DbUser>, DeskError> {
    let identifier = identifier.trim();
    if let Some(user) = find_by_username(pool, identifier).await? {
        return Ok(Some(user));
    }
    let row = sqlx::query_as::<_, DbUser>(
        "SELECT * FROM users WHERE email = ? AND email IS NOT NULL ORDER BY id LIMIT 1",
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, create: UserCreate) -> Result<DbUser, DeskError> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (username, password_hash, email, display_name, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(create.username.trim())
    .bind(create.password_hash)
    .bind(create.email)
    .bind(create.display_name)
    .bind(create.role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| DeskError::from_unique(e, "Username"))?;

    info!(user_id = row.id, username = %row.username, role = %row.role, "user created");
    Ok(row)
}

pub async fn update(pool: &SqlitePool, id: i64, update: UserUpdate) -> Result<DbUser, DeskError> {
    let UserUpdate {
        email,
        display_name,
        role,
        password_hash,
    } = update;
    let password_set = password_hash.is_some();

    let row = sqlx::query_as::<_, DbUser>(
        r#"
        UPDATE users
        SET
            email = COALESCE(?, email),
            display_name = COALESCE(?, display_name),
            role = COALESCE(?, role),
            password_hash = COALESCE(?, password_hash),
            updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(display_name)
    .bind(role)
    .bind(password_hash)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DeskError::NotFound("User"))?;

    debug!(user_id = id, password_set, "user updated");
    Ok(row)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DeskError> {
    let res = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(DeskError::NotFound("User"));
    }
    info!(user_id = id, "user deleted");
    Ok(())
}

/// Creates the bootstrap manager when the users table is empty. Returns whether it did.
pub async fn ensure_admin(
    pool: &SqlitePool,
    username: &str,
    password_hash: String,
) -> Result<bool, DeskError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(false);
    }
    create(
        pool,
        UserCreate {
            username: username.to_string(),
            password_hash,
            email: None,
            display_name: Some("Administrator".to_string()),
            role: Role::Manager,
        },
    )
    .await?;
    Ok(true)
}

pub async fn create_reset_token(
    pool: &SqlitePool,
    user_id: i64,
    token: String,
    expires_at: DateTime<Utc>,
) -> Result<(), DeskError> {
    sqlx::query(
        r#"
        INSERT INTO password_reset_tokens (user_id, token, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// The user a still-usable token belongs to.
pub async fn check_reset_token(
    pool: &SqlitePool,
    token: &str,
    now: DateTime<Utc>,
) -> Result<DbUser, DeskError> {
    let row = sqlx::query_as::<_, PasswordResetToken>(
        "SELECT * FROM password_reset_tokens WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?
    .filter(|t| t.is_usable(now))
    .ok_or(DeskError::InvalidToken)?;

    get(pool, row.user_id).await.map_err(|e| {
        if e.is_not_found() {
            DeskError::InvalidToken
        } else {
            e
        }
    })
}

/// Sets the new password and burns the token in one transaction.
pub async fn consume_reset_token(
    pool: &SqlitePool,
    token: &str,
    password_hash: String,
    now: DateTime<Utc>,
) -> Result<DbUser, DeskError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, PasswordResetToken>(
        "SELECT * FROM password_reset_tokens WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(&mut *tx)
    .await?
    .filter(|t| t.is_usable(now))
    .ok_or(DeskError::InvalidToken)?;

    sqlx::query("UPDATE password_reset_tokens SET used_at = ? WHERE id = ?")
        .bind(now)
        .bind(row.id)
        .execute(&mut *tx)
        .await?;

    let user = sqlx::query_as::<_, DbUser>(
        "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(password_hash)
    .bind(now)
    .bind(row.user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(DeskError::InvalidToken)?;

    tx.commit().await?;
    info!(user_id = user.id, "password reset via token");
    Ok(user)
}
