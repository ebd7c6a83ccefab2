use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{NewVariantGroup, NewVariantOption, VariantGroup, VariantOption};

/// The variant groups of a product, each with its options, ordered by position.
pub async fn fetch_groups_with_options(
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<VariantGroup>, sqlx::Error> {
    let groups: Vec<VariantGroup> = sqlx::query_as(
        r#"
        SELECT id, product_id, name, modifier_kind, position
        FROM variant_groups
        WHERE product_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;
    let mut result = Vec::with_capacity(groups.len());
    for group in groups {
        let options = fetch_options(group.id, &mut *conn).await?;
        result.push(group.with_options(options));
    }
    Ok(result)
}

pub async fn fetch_options(group_id: i64, conn: &mut SqliteConnection) -> Result<Vec<VariantOption>, sqlx::Error> {
    let options = sqlx::query_as(
        r#"
        SELECT id, group_id, label, modifier_value, position
        FROM variant_options
        WHERE group_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(group_id)
    .fetch_all(conn)
    .await?;
    Ok(options)
}

pub async fn insert_group(group: NewVariantGroup, conn: &mut SqliteConnection) -> Result<VariantGroup, sqlx::Error> {
    let group: VariantGroup = sqlx::query_as(
        r#"
        INSERT INTO variant_groups (product_id, name, modifier_kind, position)
        VALUES ($1, $2, $3, $4)
        RETURNING id, product_id, name, modifier_kind, position;
        "#,
    )
    .bind(group.product_id)
    .bind(group.name)
    .bind(group.modifier_kind)
    .bind(group.position)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Variant group {} ({}) inserted for product {}", group.id, group.name, group.product_id);
    Ok(group)
}

pub async fn insert_option(
    option: NewVariantOption,
    conn: &mut SqliteConnection,
) -> Result<VariantOption, sqlx::Error> {
    let option = sqlx::query_as(
        r#"
        INSERT INTO variant_options (group_id, label, modifier_value, position)
        VALUES ($1, $2, $3, $4)
        RETURNING id, group_id, label, modifier_value, position;
        "#,
    )
    .bind(option.group_id)
    .bind(option.label)
    .bind(option.modifier_value)
    .bind(option.position)
    .fetch_one(conn)
    .await?;
    Ok(option)
}

pub async fn delete_option(option_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM variant_options WHERE id = $1").bind(option_id).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Deletes every group of the product and their options. Returns the number of groups removed.
pub async fn delete_groups_for_product(product_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM variant_options WHERE group_id IN (SELECT id FROM variant_groups WHERE product_id = $1)")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM variant_groups WHERE product_id = $1").bind(product_id).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Deletes the group together with any options that still belong to it.
pub async fn delete_group(group_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM variant_options WHERE group_id = $1").bind(group_id).execute(&mut *conn).await?;
    let result = sqlx::query("DELETE FROM variant_groups WHERE id = $1").bind(group_id).execute(conn).await?;
    Ok(result.rows_affected())
}
