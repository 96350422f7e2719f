//! Repository behaviour against a live Postgres. Run with `cargo test -- --ignored`
//! and `DATABASE_URL` pointing at a disposable server.

use maherbites::application::repos::{
    CategoriesRepo, FaqsRepo, HealthRepo, NewProductImage, ProductsRepo, RepoError, SeedRepo,
    SeedReport, SiteRepo, TestimonialsRepo, UpsertCategoryParams, UpsertFaqParams,
    UpsertTestimonialParams,
};
use maherbites::application::seed::SeedCatalog;
use maherbites::domain::types::TestimonialSource;
use maherbites::infra::db::PostgresRepositories;
use sqlx::PgPool;

async fn seeded(pool: PgPool) -> PostgresRepositories {
    let repos = PostgresRepositories::new(pool);
    repos
        .seed_catalog(&SeedCatalog::starter())
        .await
        .expect("seed starter catalog");
    repos
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn seeding_is_idempotent(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let catalog = SeedCatalog::starter();

    let first = repos.seed_catalog(&catalog).await.expect("first seed");
    assert_eq!(
        first,
        SeedReport {
            site_created: true,
            categories_created: 3,
            products_created: 4,
            faqs_created: 4,
            testimonials_created: 3,
        }
    );

    let second = repos.seed_catalog(&catalog).await.expect("second seed");
    assert_eq!(second, SeedReport::default());
    assert_eq!(repos.list_products().await.expect("list").len(), 4);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn products_load_with_ordered_images_and_variants(pool: PgPool) {
    let repos = seeded(pool).await;

    let products = repos.list_products().await.expect("list products");
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Cheese Stick Savory",
            "ChocoChip Classic",
            "Hampers Sweet Duo",
            "Red Velvet Crinkle",
        ]
    );

    let chocochip = products
        .iter()
        .find(|p| p.id == "chocochip-classic")
        .expect("chocochip seeded");
    assert_eq!(chocochip.images.len(), 2);
    assert_eq!(chocochip.images[0].sort_order, 0);
    assert_eq!(chocochip.images[1].sort_order, 1);
    let labels: Vec<&str> = chocochip.variants[0]
        .options
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(labels, vec!["S (180g)", "M (300g)"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn product_upsert_replaces_children(pool: PgPool) {
    let repos = seeded(pool).await;
    let mut params = SeedCatalog::starter()
        .products
        .into_iter()
        .find(|p| p.id == "chocochip-classic")
        .expect("seed product");
    params.images = vec![NewProductImage {
        src: "/images/products/chocochip-new.svg".to_string(),
        alt: "New shot".to_string(),
        width: Some(800),
        height: Some(600),
        sort_order: Some(0),
    }];
    params.variants.clear();

    let stored = repos.upsert_product(params).await.expect("upsert");
    assert_eq!(stored.images.len(), 1);
    assert_eq!(stored.images[0].width, Some(800));
    assert!(stored.variants.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_category_slug_is_reported(pool: PgPool) {
    let repos = seeded(pool).await;

    let err = repos
        .upsert_category(UpsertCategoryParams {
            id: "cookies-2".to_string(),
            slug: "cookies".to_string(),
            name: "Cookies Lagi".to_string(),
            description: None,
        })
        .await
        .expect_err("slug is taken");
    assert!(matches!(err, RepoError::Duplicate { .. }));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn category_in_use_cannot_be_deleted(pool: PgPool) {
    let repos = seeded(pool).await;

    let err = repos
        .delete_category("cookies")
        .await
        .expect_err("products reference it");
    assert!(matches!(err, RepoError::InvalidInput { .. }));

    let err = repos
        .delete_category("missing")
        .await
        .expect_err("nothing to delete");
    assert!(matches!(err, RepoError::NotFound));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn faq_and_testimonial_upserts(pool: PgPool) {
    let repos = seeded(pool).await;

    let created = repos
        .upsert_faq(UpsertFaqParams {
            id: None,
            question: "Apakah ada opsi halal?".to_string(),
            answer: "Semua bahan bersertifikat halal.".to_string(),
            sort_order: 0,
        })
        .await
        .expect("create faq");
    let faqs = repos.list_faqs().await.expect("list faqs");
    assert_eq!(faqs.len(), 5);
    assert_eq!(faqs.first().map(|f| f.id), Some(created.id));

    let testimonial = repos
        .upsert_testimonial(UpsertTestimonialParams {
            id: None,
            name: "Dewi".to_string(),
            handle: None,
            message: "Hampers-nya cantik.".to_string(),
            rating: 5,
            source: Some(TestimonialSource::Google),
            sort_order: 9,
        })
        .await
        .expect("create testimonial");
    assert_eq!(testimonial.source, Some(TestimonialSource::Google));

    let err = repos
        .upsert_testimonial(UpsertTestimonialParams {
            id: None,
            name: "Eko".to_string(),
            handle: None,
            message: "Rating salah".to_string(),
            rating: 7,
            source: None,
            sort_order: 0,
        })
        .await
        .expect_err("rating check constraint");
    assert!(matches!(err, RepoError::Integrity { .. }));

    repos
        .delete_testimonial(testimonial.id)
        .await
        .expect("delete testimonial");
    assert!(matches!(
        repos.delete_testimonial(testimonial.id).await,
        Err(RepoError::NotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn site_row_is_a_singleton(pool: PgPool) {
    let repos = seeded(pool).await;

    let mut params = SeedCatalog::starter().site;
    params.name = "Maher Bites".to_string();
    let updated = repos.upsert_site(params).await.expect("upsert site");
    assert_eq!(updated.id, 1);

    let loaded = repos
        .load_site()
        .await
        .expect("load site")
        .expect("site row");
    assert_eq!(loaded.name, "Maher Bites");
    repos.ping().await.expect("database reachable");
}
