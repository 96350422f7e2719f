use std::sync::Arc;

use crate::{
    application::{
        auth::{SessionConfig, SessionService},
        categories::CategoryService,
        dashboard::DashboardService,
        faqs::FaqService,
        products::ProductService,
        repos::{
            CategoriesRepo, FaqsRepo, HealthRepo, ProductsRepo, SeedRepo, SiteRepo,
            TestimonialsRepo,
        },
        seed::SeedService,
        site::SiteService,
        testimonials::TestimonialService,
    },
    cache::CacheLayer,
};

/// Everything a handler may reach for; cloned per request.
#[derive(Clone)]
pub struct HttpState {
    pub site: SiteService,
    pub categories: CategoryService,
    pub products: ProductService,
    pub faqs: FaqService,
    pub testimonials: TestimonialService,
    pub seed: SeedService,
    pub dashboard: DashboardService,
    pub sessions: Arc<SessionService>,
    pub health: Arc<dyn HealthRepo>,
    pub secure_cookies: bool,
}

impl HttpState {
    /// Wire every service against one store that implements all repositories.
    pub fn new<R>(
        repositories: Arc<R>,
        cache: Arc<CacheLayer>,
        sessions: SessionConfig,
        placeholder_image: &str,
        secure_cookies: bool,
    ) -> Self
    where
        R: SiteRepo
            + CategoriesRepo
            + ProductsRepo
            + FaqsRepo
            + TestimonialsRepo
            + SeedRepo
            + HealthRepo
            + 'static,
    {
        let site_repo: Arc<dyn SiteRepo> = repositories.clone();
        let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();
        let products_repo: Arc<dyn ProductsRepo> = repositories.clone();
        let faqs_repo: Arc<dyn FaqsRepo> = repositories.clone();
        let testimonials_repo: Arc<dyn TestimonialsRepo> = repositories.clone();
        let seed_repo: Arc<dyn SeedRepo> = repositories.clone();
        let health: Arc<dyn HealthRepo> = repositories;

        let site = SiteService::new(site_repo, cache.clone());
        let products = ProductService::new(products_repo, cache.clone(), placeholder_image);
        let dashboard = DashboardService::new(site.clone(), products.clone());

        Self {
            categories: CategoryService::new(categories_repo, cache.clone()),
            faqs: FaqService::new(faqs_repo, cache.clone()),
            testimonials: TestimonialService::new(testimonials_repo, cache.clone()),
            seed: SeedService::new(seed_repo, cache),
            sessions: Arc::new(SessionService::new(sessions)),
            site,
            products,
            dashboard,
            health,
            secure_cookies,
        }
    }
}
