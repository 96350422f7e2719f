use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

use crate::{
    application::repos::{RepoError, TestimonialsRepo, UpsertTestimonialParams},
    domain::{entities::TestimonialRecord, types::TestimonialSource},
};

use super::{PostgresRepositories, map_sqlx_error, util::expect_affected};

#[derive(sqlx::FromRow)]
struct TestimonialRow {
    id: i32,
    name: String,
    handle: Option<String>,
    message: String,
    rating: i16,
    source: Option<TestimonialSource>,
    sort_order: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<TestimonialRow> for TestimonialRecord {
    fn from(row: TestimonialRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            handle: row.handle,
            message: row.message,
            rating: row.rating,
            source: row.source,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TESTIMONIAL_COLUMNS: &str =
    "id, name, handle, message, rating, source, sort_order, created_at, updated_at";

/// Insert a testimonial unless one with the same name and message exists.
pub(super) async fn insert_testimonial_if_absent(
    conn: &mut PgConnection,
    params: &UpsertTestimonialParams,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO testimonials (name, handle, message, rating, source, sort_order)
        SELECT $1, $2, $3, $4, $5, $6
        WHERE NOT EXISTS (
            SELECT 1 FROM testimonials WHERE name = $1 AND message = $3
        )
        "#,
    )
    .bind(&params.name)
    .bind(&params.handle)
    .bind(&params.message)
    .bind(params.rating)
    .bind(params.source)
    .bind(params.sort_order)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl TestimonialsRepo for PostgresRepositories {
    async fn list_testimonials(&self) -> Result<Vec<TestimonialRecord>, RepoError> {
        let sql = format!(
            "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials ORDER BY sort_order ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, TestimonialRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TestimonialRecord::from).collect())
    }

    async fn upsert_testimonial(
        &self,
        params: UpsertTestimonialParams,
    ) -> Result<TestimonialRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let updated = match params.id {
            Some(id) => {
                let sql = format!(
                    "UPDATE testimonials SET name = $2, handle = $3, message = $4, rating = $5, \
                     source = $6, sort_order = $7, updated_at = now() \
                     WHERE id = $1 RETURNING {TESTIMONIAL_COLUMNS}"
                );
                sqlx::query_as::<_, TestimonialRow>(&sql)
                    .bind(id)
                    .bind(&params.name)
                    .bind(&params.handle)
                    .bind(&params.message)
                    .bind(params.rating)
                    .bind(params.source)
                    .bind(params.sort_order)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?
            }
            None => None,
        };

        let row = match updated {
            Some(row) => row,
            None => {
                let sql = format!(
                    "INSERT INTO testimonials (name, handle, message, rating, source, sort_order) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {TESTIMONIAL_COLUMNS}"
                );
                sqlx::query_as::<_, TestimonialRow>(&sql)
                    .bind(&params.name)
                    .bind(&params.handle)
                    .bind(&params.message)
                    .bind(params.rating)
                    .bind(params.source)
                    .bind(params.sort_order)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?
            }
        };

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn delete_testimonial(&self, id: i32) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        expect_affected(result.rows_affected())
    }
}
