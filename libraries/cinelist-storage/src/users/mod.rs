//! User accounts and credential lookup

use chrono::{DateTime, Utc};
use cinelist_core::{error::Result, CinelistError, Credentials, User, Username};
use sqlx::{Row, SqlitePool};

/// Create a user with an already-hashed password
///
/// The insert is conditional on the username being free, so two concurrent
/// signups for the same name cannot both succeed.
pub async fn create(pool: &SqlitePool, username: &Username, password_hash: &str) -> Result<User> {
    let created_at = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(username) DO NOTHING
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(created_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CinelistError::AlreadyExists(username.clone()));
    }

    Ok(User {
        username: username.clone(),
        created_at,
    })
}

/// Get the password hash for an exact username
pub async fn get_credentials(pool: &SqlitePool, username: &Username) -> Result<Option<Credentials>> {
    let row = sqlx::query("SELECT username, password_hash FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    row.map(|row| -> Result<Credentials> {
        Ok(Credentials {
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
        })
    })
    .transpose()
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT username, created_at FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| -> Result<User> {
            Ok(User {
                username: row.try_get("username")?,
                created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            })
        })
        .collect()
}
