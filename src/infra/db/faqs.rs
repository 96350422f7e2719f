use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

use crate::{
    application::repos::{FaqsRepo, RepoError, UpsertFaqParams},
    domain::entities::FaqRecord,
};

use super::{PostgresRepositories, map_sqlx_error, util::expect_affected};

#[derive(sqlx::FromRow)]
struct FaqRow {
    id: i32,
    question: String,
    answer: String,
    sort_order: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<FaqRow> for FaqRecord {
    fn from(row: FaqRow) -> Self {
        Self {
            id: row.id,
            question: row.question,
            answer: row.answer,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const FAQ_COLUMNS: &str = "id, question, answer, sort_order, created_at, updated_at";

/// Insert a FAQ unless one with the same question exists.
pub(super) async fn insert_faq_if_absent(
    conn: &mut PgConnection,
    params: &UpsertFaqParams,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO faqs (question, answer, sort_order)
        VALUES ($1, $2, $3)
        ON CONFLICT (question) DO NOTHING
        "#,
    )
    .bind(&params.question)
    .bind(&params.answer)
    .bind(params.sort_order)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl FaqsRepo for PostgresRepositories {
    async fn list_faqs(&self) -> Result<Vec<FaqRecord>, RepoError> {
        let sql = format!("SELECT {FAQ_COLUMNS} FROM faqs ORDER BY sort_order ASC, id ASC");
        let rows = sqlx::query_as::<_, FaqRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FaqRecord::from).collect())
    }

    async fn upsert_faq(&self, params: UpsertFaqParams) -> Result<FaqRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let updated = match params.id {
            Some(id) => {
                let sql = format!(
                    "UPDATE faqs SET question = $2, answer = $3, sort_order = $4, updated_at = now() \
                     WHERE id = $1 RETURNING {FAQ_COLUMNS}"
                );
                sqlx::query_as::<_, FaqRow>(&sql)
                    .bind(id)
                    .bind(&params.question)
                    .bind(&params.answer)
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
                    "INSERT INTO faqs (question, answer, sort_order) VALUES ($1, $2, $3) \
                     RETURNING {FAQ_COLUMNS}"
                );
                sqlx::query_as::<_, FaqRow>(&sql)
                    .bind(&params.question)
                    .bind(&params.answer)
                    .bind(params.sort_order)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?
            }
        };

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn delete_faq(&self, id: i32) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        expect_affected(result.rows_affected())
    }
}
