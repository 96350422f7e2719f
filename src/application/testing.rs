//! In-memory repository doubles shared by service and router tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{
    CategoriesRepo, FaqsRepo, HealthRepo, ProductsRepo, RepoError, SeedReport, SeedRepo, SiteRepo,
    TestimonialsRepo, UpsertCategoryParams, UpsertFaqParams, UpsertProductParams,
    UpsertSiteParams, UpsertTestimonialParams,
};
use crate::application::seed::SeedCatalog;
use crate::domain::entities::{
    CategoryRecord, FaqRecord, ProductImage, ProductRecord, ProductVariant, SITE_ID, SiteRecord,
    TestimonialRecord, VariantOption,
};

#[derive(Default)]
struct State {
    site: Option<SiteRecord>,
    categories: BTreeMap<String, CategoryRecord>,
    products: BTreeMap<String, ProductRecord>,
    faqs: BTreeMap<i32, FaqRecord>,
    testimonials: BTreeMap<i32, TestimonialRecord>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Stores every catalog entity in memory and counts list reads.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<State>,
    list_calls: AtomicUsize,
    fail_writes: Mutex<bool>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `list_*`/`load_site` calls that reached the store.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with a persistence error.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn check_writable(&self) -> Result<(), RepoError> {
        if *self.fail_writes.lock().unwrap() {
            Err(RepoError::from_persistence("simulated write failure"))
        } else {
            Ok(())
        }
    }

    fn record_list(&self) {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

fn site_from(params: UpsertSiteParams, created_at: OffsetDateTime) -> SiteRecord {
    SiteRecord {
        id: SITE_ID,
        name: params.name,
        domain: params.domain,
        locale: params.locale,
        whatsapp: params.whatsapp,
        email: params.email,
        phone: params.phone,
        address: params.address,
        hours: params.hours,
        logo_light: params.logo_light,
        logo_dark: params.logo_dark,
        instagram: params.instagram,
        tiktok: params.tiktok,
        facebook: params.facebook,
        default_title: params.default_title,
        default_description: params.default_description,
        keywords: params.keywords,
        og_image: params.og_image,
        twitter_handle: params.twitter_handle,
        created_at,
        updated_at: now(),
    }
}

fn category_from(params: UpsertCategoryParams, created_at: OffsetDateTime) -> CategoryRecord {
    CategoryRecord {
        id: params.id,
        slug: params.slug,
        name: params.name,
        description: params.description,
        created_at,
        updated_at: now(),
    }
}

fn product_from(
    state: &mut State,
    params: UpsertProductParams,
    created_at: OffsetDateTime,
) -> ProductRecord {
    let mut images: Vec<ProductImage> = params
        .images
        .into_iter()
        .enumerate()
        .map(|(index, image)| ProductImage {
            src: image.src,
            alt: image.alt,
            width: image.width,
            height: image.height,
            sort_order: image.sort_order.unwrap_or(index as i32),
        })
        .collect();
    images.sort_by_key(|image| image.sort_order);

    let variants = params
        .variants
        .into_iter()
        .map(|variant| ProductVariant {
            id: state.next_id(),
            name: variant.name,
            options: variant
                .options
                .into_iter()
                .map(|option| VariantOption {
                    id: state.next_id(),
                    label: option.label,
                    value: option.value,
                    price: option.price,
                })
                .collect(),
        })
        .collect();

    ProductRecord {
        id: params.id,
        slug: params.slug,
        sku: params.sku,
        name: params.name,
        price: params.price,
        currency: params.currency,
        category_id: params.category_id,
        tags: params.tags,
        short_desc: params.short_desc,
        long_desc: params.long_desc,
        rating: params.rating,
        weight_gram: params.weight_gram,
        ingredients: params.ingredients,
        allergens: params.allergens,
        shelf_life_days: params.shelf_life_days,
        storage: params.storage,
        best_seller: params.best_seller,
        images,
        variants,
        created_at,
        updated_at: now(),
    }
}

fn faq_from(id: i32, params: UpsertFaqParams, created_at: OffsetDateTime) -> FaqRecord {
    FaqRecord {
        id,
        question: params.question,
        answer: params.answer,
        sort_order: params.sort_order,
        created_at,
        updated_at: now(),
    }
}

fn testimonial_from(
    id: i32,
    params: UpsertTestimonialParams,
    created_at: OffsetDateTime,
) -> TestimonialRecord {
    TestimonialRecord {
        id,
        name: params.name,
        handle: params.handle,
        message: params.message,
        rating: params.rating,
        source: params.source,
        sort_order: params.sort_order,
        created_at,
        updated_at: now(),
    }
}

#[async_trait]
impl HealthRepo for InMemoryCatalog {
    async fn ping(&self) -> Result<(), RepoError> {
        self.check_writable()
    }
}

#[async_trait]
impl SiteRepo for InMemoryCatalog {
    async fn load_site(&self) -> Result<Option<SiteRecord>, RepoError> {
        self.record_list();
        Ok(self.state.lock().unwrap().site.clone())
    }

    async fn upsert_site(&self, params: UpsertSiteParams) -> Result<SiteRecord, RepoError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let created_at = state.site.as_ref().map_or_else(now, |site| site.created_at);
        let record = site_from(params, created_at);
        state.site = Some(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl CategoriesRepo for InMemoryCatalog {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        self.record_list();
        let mut categories: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .categories
            .values()
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn upsert_category(
        &self,
        params: UpsertCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        if state
            .categories
            .values()
            .any(|existing| existing.slug == params.slug && existing.id != params.id)
        {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".into(),
            });
        }
        let created_at = state
            .categories
            .get(&params.id)
            .map_or_else(now, |existing| existing.created_at);
        let record = category_from(params, created_at);
        state.categories.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete_category(&self, id: &str) -> Result<(), RepoError> {
        self.check_writable()?;
        self.state
            .lock()
            .unwrap()
            .categories
            .remove(id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ProductsRepo for InMemoryCatalog {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, RepoError> {
        self.record_list();
        let mut products: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .products
            .values()
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn upsert_product(
        &self,
        params: UpsertProductParams,
    ) -> Result<ProductRecord, RepoError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        if state
            .products
            .values()
            .any(|existing| existing.slug == params.slug && existing.id != params.id)
        {
            return Err(RepoError::Duplicate {
                constraint: "products_slug_key".into(),
            });
        }
        let created_at = state
            .products
            .get(&params.id)
            .map_or_else(now, |existing| existing.created_at);
        let record = product_from(&mut state, params, created_at);
        state.products.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete_product(&self, id: &str) -> Result<(), RepoError> {
        self.check_writable()?;
        self.state
            .lock()
            .unwrap()
            .products
            .remove(id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl FaqsRepo for InMemoryCatalog {
    async fn list_faqs(&self) -> Result<Vec<FaqRecord>, RepoError> {
        self.record_list();
        let mut faqs: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .faqs
            .values()
            .cloned()
            .collect();
        faqs.sort_by_key(|faq| (faq.sort_order, faq.id));
        Ok(faqs)
    }

    async fn upsert_faq(&self, params: UpsertFaqParams) -> Result<FaqRecord, RepoError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let existing = params.id.and_then(|id| state.faqs.get(&id).cloned());
        let id = match &existing {
            Some(faq) => faq.id,
            None => state.next_id() as i32,
        };
        if state
            .faqs
            .values()
            .any(|faq| faq.question == params.question && faq.id != id)
        {
            return Err(RepoError::Duplicate {
                constraint: "faqs_question_key".into(),
            });
        }
        let created_at = existing.map_or_else(now, |faq| faq.created_at);
        let record = faq_from(id, params, created_at);
        state.faqs.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_faq(&self, id: i32) -> Result<(), RepoError> {
        self.check_writable()?;
        self.state
            .lock()
            .unwrap()
            .faqs
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl TestimonialsRepo for InMemoryCatalog {
    async fn list_testimonials(&self) -> Result<Vec<TestimonialRecord>, RepoError> {
        self.record_list();
        let mut testimonials: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .testimonials
            .values()
            .cloned()
            .collect();
        testimonials.sort_by_key(|testimonial| (testimonial.sort_order, testimonial.id));
        Ok(testimonials)
    }

    async fn upsert_testimonial(
        &self,
        params: UpsertTestimonialParams,
    ) -> Result<TestimonialRecord, RepoError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let existing = params.id.and_then(|id| state.testimonials.get(&id).cloned());
        let id = match &existing {
            Some(testimonial) => testimonial.id,
            None => state.next_id() as i32,
        };
        let created_at = existing.map_or_else(now, |testimonial| testimonial.created_at);
        let record = testimonial_from(id, params, created_at);
        state.testimonials.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_testimonial(&self, id: i32) -> Result<(), RepoError> {
        self.check_writable()?;
        self.state
            .lock()
            .unwrap()
            .testimonials
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl SeedRepo for InMemoryCatalog {
    async fn seed_catalog(&self, catalog: &SeedCatalog) -> Result<SeedReport, RepoError> {
        self.check_writable()?;
        let mut report = SeedReport::default();
        let mut state = self.state.lock().unwrap();

        if state.site.is_none() {
            state.site = Some(site_from(catalog.site.clone(), now()));
            report.site_created = true;
        }
        for category in &catalog.categories {
            if !state.categories.contains_key(&category.id) {
                let record = category_from(category.clone(), now());
                state.categories.insert(record.id.clone(), record);
                report.categories_created += 1;
            }
        }
        for product in &catalog.products {
            if !state.products.contains_key(&product.id) {
                let record = product_from(&mut state, product.clone(), now());
                state.products.insert(record.id.clone(), record);
                report.products_created += 1;
            }
        }
        for faq in &catalog.faqs {
            if !state.faqs.values().any(|row| row.question == faq.question) {
                let id = state.next_id() as i32;
                state.faqs.insert(id, faq_from(id, faq.clone(), now()));
                report.faqs_created += 1;
            }
        }
        for testimonial in &catalog.testimonials {
            if !state
                .testimonials
                .values()
                .any(|row| row.name == testimonial.name && row.message == testimonial.message)
            {
                let id = state.next_id() as i32;
                state
                    .testimonials
                    .insert(id, testimonial_from(id, testimonial.clone(), now()));
                report.testimonials_created += 1;
            }
        }
        Ok(report)
    }
}
