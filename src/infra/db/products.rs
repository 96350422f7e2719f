use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

use crate::{
    application::repos::{ProductsRepo, RepoError, UpsertProductParams},
    domain::{
        entities::{ProductImage, ProductRecord, ProductVariant, VariantOption},
        types::Currency,
    },
};

use super::{PostgresRepositories, map_sqlx_error, util::expect_affected};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    slug: String,
    sku: Option<String>,
    name: String,
    price: i64,
    currency: String,
    category_id: String,
    tags: Vec<String>,
    short_desc: String,
    long_desc: String,
    rating: Option<f64>,
    weight_gram: Option<i32>,
    ingredients: Vec<String>,
    allergens: Vec<String>,
    shelf_life_days: Option<i32>,
    storage: Option<String>,
    best_seller: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    product_id: String,
    src: String,
    alt: String,
    width: Option<i32>,
    height: Option<i32>,
    sort_order: i32,
}

#[derive(sqlx::FromRow)]
struct VariantRow {
    id: i64,
    product_id: String,
    name: String,
}

#[derive(sqlx::FromRow)]
struct OptionRow {
    id: i64,
    variant_id: i64,
    label: String,
    value: Option<String>,
    price: i64,
}

impl ProductRow {
    fn into_record(
        self,
        images: Vec<ProductImage>,
        variants: Vec<ProductVariant>,
    ) -> Result<ProductRecord, RepoError> {
        let currency = Currency::from_str(&self.currency).map_err(|err| RepoError::Integrity {
            message: err.to_string(),
        })?;
        Ok(ProductRecord {
            id: self.id,
            slug: self.slug,
            sku: self.sku,
            name: self.name,
            price: self.price,
            currency,
            category_id: self.category_id,
            tags: self.tags,
            short_desc: self.short_desc,
            long_desc: self.long_desc,
            rating: self.rating,
            weight_gram: self.weight_gram,
            ingredients: self.ingredients,
            allergens: self.allergens,
            shelf_life_days: self.shelf_life_days,
            storage: self.storage,
            best_seller: self.best_seller,
            images,
            variants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Load products with their images (by sort order) and variants and options
/// (by insertion id). `only` restricts the load to one product id.
async fn load_products(
    conn: &mut PgConnection,
    only: Option<&str>,
) -> Result<Vec<ProductRecord>, RepoError> {
    let products = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, slug, sku, name, price, currency, category_id, tags, short_desc, long_desc,
               rating, weight_gram, ingredients, allergens, shelf_life_days, storage,
               best_seller, created_at, updated_at
        FROM products
        WHERE ($1::text IS NULL OR id = $1)
        ORDER BY name ASC, id ASC
        "#,
    )
    .bind(only)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    let image_rows = sqlx::query_as::<_, ImageRow>(
        r#"
        SELECT product_id, src, alt, width, height, sort_order
        FROM product_images
        WHERE ($1::text IS NULL OR product_id = $1)
        ORDER BY product_id, sort_order ASC, id ASC
        "#,
    )
    .bind(only)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    let variant_rows = sqlx::query_as::<_, VariantRow>(
        r#"
        SELECT id, product_id, name
        FROM product_variants
        WHERE ($1::text IS NULL OR product_id = $1)
        ORDER BY id ASC
        "#,
    )
    .bind(only)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    let option_rows = sqlx::query_as::<_, OptionRow>(
        r#"
        SELECT o.id, o.variant_id, o.label, o.value, o.price
        FROM variant_options o
        INNER JOIN product_variants v ON v.id = o.variant_id
        WHERE ($1::text IS NULL OR v.product_id = $1)
        ORDER BY o.id ASC
        "#,
    )
    .bind(only)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    let mut images: HashMap<String, Vec<ProductImage>> = HashMap::new();
    for row in image_rows {
        images.entry(row.product_id).or_default().push(ProductImage {
            src: row.src,
            alt: row.alt,
            width: row.width,
            height: row.height,
            sort_order: row.sort_order,
        });
    }

    let mut options: HashMap<i64, Vec<VariantOption>> = HashMap::new();
    for row in option_rows {
        options.entry(row.variant_id).or_default().push(VariantOption {
            id: row.id,
            label: row.label,
            value: row.value,
            price: row.price,
        });
    }

    let mut variants: HashMap<String, Vec<ProductVariant>> = HashMap::new();
    for row in variant_rows {
        variants.entry(row.product_id).or_default().push(ProductVariant {
            id: row.id,
            name: row.name,
            options: options.remove(&row.id).unwrap_or_default(),
        });
    }

    products
        .into_iter()
        .map(|row| {
            let product_images = images.remove(&row.id).unwrap_or_default();
            let product_variants = variants.remove(&row.id).unwrap_or_default();
            row.into_record(product_images, product_variants)
        })
        .collect()
}

/// Write the product row, then replace its images and variants wholesale.
/// Callers run this inside a transaction.
pub(super) async fn write_product(
    conn: &mut PgConnection,
    params: &UpsertProductParams,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO products (
            id, slug, sku, name, price, currency, category_id, tags, short_desc, long_desc,
            rating, weight_gram, ingredients, allergens, shelf_life_days, storage, best_seller
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        ON CONFLICT (id) DO UPDATE SET
            slug = EXCLUDED.slug,
            sku = EXCLUDED.sku,
            name = EXCLUDED.name,
            price = EXCLUDED.price,
            currency = EXCLUDED.currency,
            category_id = EXCLUDED.category_id,
            tags = EXCLUDED.tags,
            short_desc = EXCLUDED.short_desc,
            long_desc = EXCLUDED.long_desc,
            rating = EXCLUDED.rating,
            weight_gram = EXCLUDED.weight_gram,
            ingredients = EXCLUDED.ingredients,
            allergens = EXCLUDED.allergens,
            shelf_life_days = EXCLUDED.shelf_life_days,
            storage = EXCLUDED.storage,
            best_seller = EXCLUDED.best_seller,
            updated_at = now()
        "#,
    )
    .bind(&params.id)
    .bind(&params.slug)
    .bind(&params.sku)
    .bind(&params.name)
    .bind(params.price)
    .bind(params.currency.as_str())
    .bind(&params.category_id)
    .bind(&params.tags)
    .bind(&params.short_desc)
    .bind(&params.long_desc)
    .bind(params.rating)
    .bind(params.weight_gram)
    .bind(&params.ingredients)
    .bind(&params.allergens)
    .bind(params.shelf_life_days)
    .bind(&params.storage)
    .bind(params.best_seller)
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM product_images WHERE product_id = $1")
        .bind(&params.id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM product_variants WHERE product_id = $1")
        .bind(&params.id)
        .execute(&mut *conn)
        .await?;

    for (index, image) in params.images.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO product_images (product_id, src, alt, width, height, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&params.id)
        .bind(&image.src)
        .bind(&image.alt)
        .bind(image.width)
        .bind(image.height)
        .bind(image.sort_order.unwrap_or(index as i32))
        .execute(&mut *conn)
        .await?;
    }

    for variant in &params.variants {
        let variant_id: i64 = sqlx::query_scalar(
            "INSERT INTO product_variants (product_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(&params.id)
        .bind(&variant.name)
        .fetch_one(&mut *conn)
        .await?;

        for option in &variant.options {
            sqlx::query(
                r#"
                INSERT INTO variant_options (variant_id, label, value, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(variant_id)
            .bind(&option.label)
            .bind(&option.value)
            .bind(option.price)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(())
}

pub(super) async fn product_exists(conn: &mut PgConnection, id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await
}

#[async_trait]
impl ProductsRepo for PostgresRepositories {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        load_products(&mut conn, None).await
    }

    async fn upsert_product(
        &self,
        params: UpsertProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        write_product(&mut tx, &params)
            .await
            .map_err(map_sqlx_error)?;
        let record = load_products(&mut tx, Some(&params.id))
            .await?
            .into_iter()
            .next()
            .ok_or(RepoError::NotFound)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(record)
    }

    async fn delete_product(&self, id: &str) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        expect_affected(result.rows_affected())
    }
}
