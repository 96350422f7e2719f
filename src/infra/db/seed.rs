use async_trait::async_trait;

use crate::application::repos::{RepoError, SeedReport, SeedRepo};
use crate::application::seed::SeedCatalog;

use super::{
    PostgresRepositories, categories::insert_category_if_absent, faqs::insert_faq_if_absent,
    map_sqlx_error, products::product_exists, products::write_product, site::write_site,
    testimonials::insert_testimonial_if_absent,
};

#[async_trait]
impl SeedRepo for PostgresRepositories {
    async fn seed_catalog(&self, catalog: &SeedCatalog) -> Result<SeedReport, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let mut report = SeedReport {
            site_created: write_site(&mut tx, &catalog.site, false)
                .await
                .map_err(map_sqlx_error)?,
            ..SeedReport::default()
        };

        for category in &catalog.categories {
            if insert_category_if_absent(&mut tx, category)
                .await
                .map_err(map_sqlx_error)?
            {
                report.categories_created += 1;
            }
        }

        for product in &catalog.products {
            if product_exists(&mut tx, &product.id)
                .await
                .map_err(map_sqlx_error)?
            {
                continue;
            }
            write_product(&mut tx, product)
                .await
                .map_err(map_sqlx_error)?;
            report.products_created += 1;
        }

        for faq in &catalog.faqs {
            if insert_faq_if_absent(&mut tx, faq)
                .await
                .map_err(map_sqlx_error)?
            {
                report.faqs_created += 1;
            }
        }

        for testimonial in &catalog.testimonials {
            if insert_testimonial_if_absent(&mut tx, testimonial)
                .await
                .map_err(map_sqlx_error)?
            {
                report.testimonials_created += 1;
            }
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(report)
    }
}
