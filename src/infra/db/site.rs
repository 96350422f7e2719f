use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

use crate::{
    application::repos::{RepoError, SiteRepo, UpsertSiteParams},
    domain::entities::{SITE_ID, SiteRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SiteRow {
    id: i32,
    name: String,
    domain: String,
    locale: String,
    whatsapp: String,
    email: String,
    phone: String,
    address: String,
    hours: Option<String>,
    logo_light: String,
    logo_dark: String,
    instagram: Option<String>,
    tiktok: Option<String>,
    facebook: Option<String>,
    default_title: String,
    default_description: String,
    keywords: Vec<String>,
    og_image: String,
    twitter_handle: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<SiteRow> for SiteRecord {
    fn from(row: SiteRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            domain: row.domain,
            locale: row.locale,
            whatsapp: row.whatsapp,
            email: row.email,
            phone: row.phone,
            address: row.address,
            hours: row.hours,
            logo_light: row.logo_light,
            logo_dark: row.logo_dark,
            instagram: row.instagram,
            tiktok: row.tiktok,
            facebook: row.facebook,
            default_title: row.default_title,
            default_description: row.default_description,
            keywords: row.keywords,
            og_image: row.og_image,
            twitter_handle: row.twitter_handle,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SITE_COLUMNS: &str = "id, name, domain, locale, whatsapp, email, phone, address, hours, \
    logo_light, logo_dark, instagram, tiktok, facebook, default_title, default_description, \
    keywords, og_image, twitter_handle, created_at, updated_at";

const INSERT_SITE: &str = r#"
    INSERT INTO site (
        id, name, domain, locale, whatsapp, email, phone, address, hours,
        logo_light, logo_dark, instagram, tiktok, facebook,
        default_title, default_description, keywords, og_image, twitter_handle
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
"#;

/// Insert the singleton row. With `overwrite` an existing row is replaced,
/// otherwise it is left alone. Returns whether a row was written.
pub(super) async fn write_site(
    conn: &mut PgConnection,
    params: &UpsertSiteParams,
    overwrite: bool,
) -> Result<bool, sqlx::Error> {
    let conflict = if overwrite {
        r#"
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            domain = EXCLUDED.domain,
            locale = EXCLUDED.locale,
            whatsapp = EXCLUDED.whatsapp,
            email = EXCLUDED.email,
            phone = EXCLUDED.phone,
            address = EXCLUDED.address,
            hours = EXCLUDED.hours,
            logo_light = EXCLUDED.logo_light,
            logo_dark = EXCLUDED.logo_dark,
            instagram = EXCLUDED.instagram,
            tiktok = EXCLUDED.tiktok,
            facebook = EXCLUDED.facebook,
            default_title = EXCLUDED.default_title,
            default_description = EXCLUDED.default_description,
            keywords = EXCLUDED.keywords,
            og_image = EXCLUDED.og_image,
            twitter_handle = EXCLUDED.twitter_handle,
            updated_at = now()
        "#
    } else {
        "ON CONFLICT (id) DO NOTHING"
    };
    let sql = format!("{INSERT_SITE} {conflict}");

    let result = sqlx::query(&sql)
        .bind(SITE_ID)
        .bind(&params.name)
        .bind(&params.domain)
        .bind(&params.locale)
        .bind(&params.whatsapp)
        .bind(&params.email)
        .bind(&params.phone)
        .bind(&params.address)
        .bind(&params.hours)
        .bind(&params.logo_light)
        .bind(&params.logo_dark)
        .bind(&params.instagram)
        .bind(&params.tiktok)
        .bind(&params.facebook)
        .bind(&params.default_title)
        .bind(&params.default_description)
        .bind(&params.keywords)
        .bind(&params.og_image)
        .bind(&params.twitter_handle)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn fetch_site(conn: &mut PgConnection) -> Result<Option<SiteRecord>, sqlx::Error> {
    let sql = format!("SELECT {SITE_COLUMNS} FROM site WHERE id = $1");
    let row = sqlx::query_as::<_, SiteRow>(&sql)
        .bind(SITE_ID)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(SiteRecord::from))
}

#[async_trait]
impl SiteRepo for PostgresRepositories {
    async fn load_site(&self) -> Result<Option<SiteRecord>, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        fetch_site(&mut conn).await.map_err(map_sqlx_error)
    }

    async fn upsert_site(&self, params: UpsertSiteParams) -> Result<SiteRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        write_site(&mut tx, &params, true)
            .await
            .map_err(map_sqlx_error)?;
        let record = fetch_site(&mut tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| RepoError::Integrity {
                message: "site row missing after upsert".to_string(),
            })?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(record)
    }
}
