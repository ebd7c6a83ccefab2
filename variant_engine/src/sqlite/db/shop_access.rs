use sqlx::SqliteConnection;

use crate::db_types::ShopCredentials;

pub async fn fetch_access(shop: &str, conn: &mut SqliteConnection) -> Result<Option<ShopCredentials>, sqlx::Error> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT shop, access_token FROM shop_access WHERE shop = $1").bind(shop).fetch_optional(conn).await?;
    Ok(row.map(|(shop, token)| ShopCredentials::new(shop, token)))
}

/// Stores the credential, replacing any token previously saved for the shop.
pub async fn upsert_access(credentials: &ShopCredentials, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO shop_access (shop, access_token) VALUES ($1, $2)
        ON CONFLICT (shop) DO UPDATE SET access_token = excluded.access_token, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&credentials.shop)
    .bind(credentials.access_token.reveal())
    .execute(conn)
    .await?;
    Ok(())
}
