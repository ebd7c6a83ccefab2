use sqlx::SqliteConnection;

use crate::db_types::SynthesizedVariant;

pub async fn fetch_for_product(
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<SynthesizedVariant>, sqlx::Error> {
    let variants = sqlx::query_as(
        r#"
        SELECT shopify_product_id, title, option1, option2, option3, option1_variant, option2_variant,
               option3_variant, price, weight, weight_unit, to_multiply, to_add, taxable, inventory_policy,
               shopify_variant_id, position
        FROM synthesized_variants
        WHERE shopify_product_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(product_id)
    .fetch_all(conn)
    .await?;
    Ok(variants)
}

pub async fn delete_for_product(product_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM synthesized_variants WHERE shopify_product_id = $1")
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_variant(variant: &SynthesizedVariant, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO synthesized_variants (
            shopify_product_id,
            title,
            option1,
            option2,
            option3,
            option1_variant,
            option2_variant,
            option3_variant,
            price,
            weight,
            weight_unit,
            to_multiply,
            to_add,
            taxable,
            inventory_policy,
            shopify_variant_id,
            position
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
    )
    .bind(variant.shopify_product_id)
    .bind(&variant.title)
    .bind(&variant.option1)
    .bind(&variant.option2)
    .bind(&variant.option3)
    .bind(variant.option1_variant)
    .bind(variant.option2_variant)
    .bind(variant.option3_variant)
    .bind(variant.price)
    .bind(variant.weight)
    .bind(&variant.weight_unit)
    .bind(variant.to_multiply)
    .bind(variant.to_add)
    .bind(variant.taxable)
    .bind(&variant.inventory_policy)
    .bind(variant.shopify_variant_id)
    .bind(variant.position)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}
