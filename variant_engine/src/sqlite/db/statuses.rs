use sqlx::SqliteConnection;

use crate::db_types::{NewUpdateStatus, UpdateStatus};

pub async fn insert_status(status: NewUpdateStatus, conn: &mut SqliteConnection) -> Result<UpdateStatus, sqlx::Error> {
    let status = sqlx::query_as(
        r#"
        INSERT INTO update_statuses (product_name, status, message)
        VALUES ($1, $2, $3)
        RETURNING *;
        "#,
    )
    .bind(status.product_name)
    .bind(status.status)
    .bind(status.message)
    .fetch_one(conn)
    .await?;
    Ok(status)
}

/// Writes the status and message. The record's name and creation time never change.
pub async fn update_status(
    status: &UpdateStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<UpdateStatus>, sqlx::Error> {
    let status = sqlx::query_as(
        r#"
        UPDATE update_statuses SET status = $1, message = $2, updated_at = CURRENT_TIMESTAMP
        WHERE id = $3
        RETURNING *;
        "#,
    )
    .bind(status.status)
    .bind(&status.message)
    .bind(status.id)
    .fetch_optional(conn)
    .await?;
    Ok(status)
}

pub async fn fetch_recent(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<UpdateStatus>, sqlx::Error> {
    let statuses = sqlx::query_as("SELECT * FROM update_statuses ORDER BY id DESC LIMIT $1")
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(statuses)
}
