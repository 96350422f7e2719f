use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

use crate::{
    application::repos::{CategoriesRepo, RepoError, UpsertCategoryParams},
    domain::entities::CategoryRecord,
};

use super::{PostgresRepositories, map_sqlx_error, util::expect_affected};

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: String,
    slug: String,
    name: String,
    description: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert a category; returns false when the id already exists.
pub(super) async fn insert_category_if_absent(
    conn: &mut PgConnection,
    params: &UpsertCategoryParams,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO categories (id, slug, name, description)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(&params.id)
    .bind(&params.slug)
    .bind(&params.name)
    .bind(&params.description)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl CategoriesRepo for PostgresRepositories {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, slug, name, description, created_at, updated_at
            FROM categories
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }

    async fn upsert_category(
        &self,
        params: UpsertCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (id, slug, name, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                slug = EXCLUDED.slug,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                updated_at = now()
            RETURNING id, slug, name, description, created_at, updated_at
            "#,
        )
        .bind(&params.id)
        .bind(&params.slug)
        .bind(&params.name)
        .bind(&params.description)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_category(&self, id: &str) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        expect_affected(result.rows_affected())
    }
}
