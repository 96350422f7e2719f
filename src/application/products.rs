//! Product catalog reads, admin writes and order links.

use std::sync::Arc;

use crate::application::categories::required;
use crate::application::error::CatalogError;
use crate::application::repos::{
    NewProductImage, NewVariant, ProductsRepo, RepoError, UpsertProductParams,
};
use crate::application::site::optional;
use crate::cache::{CacheKey, CacheLayer, CacheOptions, CacheTag, Memoized};
use crate::domain::entities::ProductRecord;
use crate::domain::order::OrderIntent;
use crate::domain::slug::slug_or_fallback;
use crate::domain::types::Currency;

pub const DEFAULT_BEST_SELLER_LIMIT: usize = 8;
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/placeholder-product.svg";

#[derive(Debug, Clone, Default)]
pub struct ProductCommand {
    pub id: String,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub name: String,
    pub price: i64,
    pub currency: Currency,
    pub category_id: String,
    pub tags: Vec<String>,
    pub short_desc: String,
    pub long_desc: String,
    pub rating: Option<f64>,
    pub weight_gram: Option<i32>,
    pub ingredients: Vec<String>,
    pub allergens: Vec<String>,
    pub shelf_life_days: Option<i32>,
    pub storage: Option<String>,
    pub best_seller: bool,
    pub images: Vec<NewProductImage>,
    pub variants: Vec<NewVariant>,
}

/// Order-link inputs as received from a shopper.
#[derive(Debug, Clone, Default)]
pub struct OrderRequest {
    pub quantity: Option<u32>,
    pub variant: Option<String>,
    pub note: Option<String>,
}

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductsRepo>,
    cache: Arc<CacheLayer>,
    all: Memoized<Vec<ProductRecord>, RepoError>,
    placeholder_image: String,
}

impl ProductService {
    pub fn new(
        repo: Arc<dyn ProductsRepo>,
        cache: Arc<CacheLayer>,
        placeholder_image: impl Into<String>,
    ) -> Self {
        let options = CacheOptions::new(CacheKey::new(["products", "all"]), [CacheTag::Products])
            .revalidate(cache.config().default_revalidate());
        let reader = Arc::clone(&repo);
        let all = cache.memoize(options, move || {
            let reader = Arc::clone(&reader);
            async move { reader.list_products().await }
        });
        Self {
            repo,
            cache,
            all,
            placeholder_image: placeholder_image.into(),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        Ok(self.all.call().await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ProductRecord>, CatalogError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|product| product.slug == slug))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<ProductRecord>, CatalogError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|product| product.id == id))
    }

    pub async fn by_category(&self, category_id: &str) -> Result<Vec<ProductRecord>, CatalogError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|product| product.category_id == category_id)
            .collect())
    }

    /// Case-insensitive match over name, short description and tags.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductRecord>, CatalogError> {
        let normalized = query.trim().to_lowercase();
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|product| product.matches_query(&normalized))
            .collect())
    }

    pub async fn best_sellers(&self, limit: usize) -> Result<Vec<ProductRecord>, CatalogError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|product| product.best_seller)
            .take(limit)
            .collect())
    }

    /// Replace the product's full state. Images and variants not resubmitted
    /// are dropped; an empty image list stores the placeholder image.
    pub async fn upsert(&self, command: ProductCommand) -> Result<ProductRecord, CatalogError> {
        let params = self.normalize(command)?;
        let record = self.repo.upsert_product(params).await?;
        self.cache.invalidate(CacheTag::Products);
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        self.repo.delete_product(id).await?;
        self.cache.invalidate(CacheTag::Products);
        Ok(())
    }

    /// Build the WhatsApp deep link for ordering `slug`, or `None` for an
    /// unknown product.
    pub async fn order_link(
        &self,
        slug: &str,
        whatsapp_url: &str,
        request: &OrderRequest,
    ) -> Result<Option<String>, CatalogError> {
        let Some(product) = self.get_by_slug(slug).await? else {
            return Ok(None);
        };
        let quantity = request.quantity.unwrap_or(1);
        if quantity == 0 {
            return Err(CatalogError::validation("qty", "must be at least 1"));
        }
        let variant = request
            .variant
            .as_deref()
            .filter(|label| !label.trim().is_empty());
        if let Some(label) = variant {
            if product.find_option(label).is_none() {
                return Err(CatalogError::validation(
                    "variant",
                    format!("`{label}` is not an option of this product"),
                ));
            }
        }

        let link = OrderIntent::new(&product)
            .quantity(quantity)
            .variant(variant)
            .note(request.note.as_deref())
            .link(whatsapp_url);
        Ok(Some(link))
    }

    fn normalize(&self, command: ProductCommand) -> Result<UpsertProductParams, CatalogError> {
        let id = required("id", &command.id)?;
        let slug = slug_or_fallback(command.slug.as_deref(), &id)
            .map_err(|err| CatalogError::validation("slug", err.to_string()))?;
        if command.price < 0 {
            return Err(CatalogError::validation("price", "must not be negative"));
        }
        if command
            .rating
            .is_some_and(|rating| !(0.0..=5.0).contains(&rating))
        {
            return Err(CatalogError::validation("rating", "must be between 0 and 5"));
        }
        let name = command.name.trim().to_string();

        let mut images: Vec<NewProductImage> = command
            .images
            .into_iter()
            .filter(|image| !image.src.trim().is_empty())
            .enumerate()
            .map(|(index, image)| NewProductImage {
                sort_order: Some(image.sort_order.unwrap_or(index as i32)),
                ..image
            })
            .collect();
        if images.is_empty() {
            images.push(NewProductImage {
                src: self.placeholder_image.clone(),
                alt: if name.is_empty() {
                    "Placeholder Maher Bites".to_string()
                } else {
                    format!("{name} image")
                },
                width: None,
                height: None,
                sort_order: Some(0),
            });
        }

        Ok(UpsertProductParams {
            id,
            slug,
            sku: optional(command.sku),
            name,
            price: command.price,
            currency: command.currency,
            category_id: command.category_id.trim().to_string(),
            tags: command.tags,
            short_desc: command.short_desc,
            long_desc: command.long_desc,
            rating: command.rating,
            weight_gram: command.weight_gram,
            ingredients: command.ingredients,
            allergens: command.allergens,
            shelf_life_days: command.shelf_life_days,
            storage: optional(command.storage),
            best_seller: command.best_seller,
            images,
            variants: command.variants,
        })
    }
}

#[cfg(test)]
mod tests {
    use percent_encoding::percent_decode_str;

    use super::*;
    use crate::application::repos::NewVariantOption;
    use crate::application::testing::InMemoryCatalog;
    use crate::cache::CacheConfig;

    fn service(repo: Arc<InMemoryCatalog>) -> ProductService {
        ProductService::new(
            repo,
            Arc::new(CacheLayer::new(CacheConfig::default())),
            DEFAULT_PLACEHOLDER_IMAGE,
        )
    }

    fn image(src: &str) -> NewProductImage {
        NewProductImage {
            src: src.into(),
            alt: src.into(),
            width: None,
            height: None,
            sort_order: None,
        }
    }

    fn variant(name: &str, labels: &[&str]) -> NewVariant {
        NewVariant {
            name: name.into(),
            options: labels
                .iter()
                .map(|label| NewVariantOption {
                    label: (*label).into(),
                    value: None,
                    price: 65_000,
                })
                .collect(),
        }
    }

    fn chocochip() -> ProductCommand {
        ProductCommand {
            id: "chocochip-classic".into(),
            name: "ChocoChip Classic".into(),
            price: 65_000,
            category_id: "cookies".into(),
            tags: vec!["best-seller".into(), "cokelat".into()],
            short_desc: "Cookies chocochip renyah di luar, chewy di dalam.".into(),
            best_seller: true,
            images: vec![image("/images/products/chocochip-classic-1.svg")],
            variants: vec![variant("Ukuran", &["S (180g)", "M (300g)"])],
            ..ProductCommand::default()
        }
    }

    #[tokio::test]
    async fn upsert_then_get_all_returns_written_fields() {
        let repo = Arc::new(InMemoryCatalog::new());
        let service = service(repo);
        service.get_all().await.unwrap();

        let written = service.upsert(chocochip()).await.unwrap();
        let all = service.get_all().await.unwrap();

        assert_eq!(all, vec![written.clone()]);
        assert_eq!(written.slug, "chocochip-classic");
        assert_eq!(written.currency, Currency::Idr);
    }

    #[tokio::test]
    async fn zero_images_store_one_placeholder() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        let product = service
            .upsert(ProductCommand {
                images: Vec::new(),
                ..chocochip()
            })
            .await
            .unwrap();

        assert_eq!(product.images.len(), 1);
        assert_eq!(product.images[0].src, DEFAULT_PLACEHOLDER_IMAGE);
        assert_eq!(product.images[0].alt, "ChocoChip Classic image");
    }

    #[tokio::test]
    async fn placeholder_alt_without_name() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        let product = service
            .upsert(ProductCommand {
                name: String::new(),
                images: Vec::new(),
                ..chocochip()
            })
            .await
            .unwrap();
        assert_eq!(product.images[0].alt, "Placeholder Maher Bites");
    }

    #[tokio::test]
    async fn resubmitting_variants_replaces_them() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        service.upsert(chocochip()).await.unwrap();

        let updated = service
            .upsert(ProductCommand {
                variants: vec![variant("Paket", &["Paket (12 pcs)"])],
                ..chocochip()
            })
            .await
            .unwrap();

        assert_eq!(updated.variants.len(), 1);
        assert_eq!(updated.variants[0].name, "Paket");
        assert!(updated.find_option("M (300g)").is_none());

        let stored = service
            .get_by_slug("chocochip-classic")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.variants, updated.variants);
    }

    #[tokio::test]
    async fn image_sort_order_defaults_to_position() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        let product = service
            .upsert(ProductCommand {
                images: vec![image("/a.svg"), image("/b.svg")],
                ..chocochip()
            })
            .await
            .unwrap();
        let orders: Vec<i32> = product.images.iter().map(|i| i.sort_order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[tokio::test]
    async fn blank_slug_uses_id() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        let product = service
            .upsert(ProductCommand {
                slug: Some("  ".into()),
                ..chocochip()
            })
            .await
            .unwrap();
        assert_eq!(product.slug, "chocochip-classic");
    }

    #[tokio::test]
    async fn submitted_slug_round_trips_unchanged() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        let product = service
            .upsert(ProductCommand {
                slug: Some(" Kue_Lebaran ".into()),
                ..chocochip()
            })
            .await
            .unwrap();
        assert_eq!(product.slug, "Kue_Lebaran");
        assert!(service.get_by_slug("Kue_Lebaran").await.unwrap().is_some());

        let symbols = service
            .upsert(ProductCommand {
                id: "!!!".into(),
                slug: None,
                ..chocochip()
            })
            .await
            .unwrap();
        assert_eq!(symbols.slug, "!!!");
    }

    #[tokio::test]
    async fn read_helpers_filter_the_collection() {
        let repo = Arc::new(InMemoryCatalog::new());
        let service = service(Arc::clone(&repo));
        service.upsert(chocochip()).await.unwrap();
        service
            .upsert(ProductCommand {
                id: "cheese-stick".into(),
                name: "Cheese Stick Savory".into(),
                category_id: "snackbox".into(),
                tags: vec!["Keju".into()],
                short_desc: "Camilan gurih keju".into(),
                best_seller: false,
                ..chocochip()
            })
            .await
            .unwrap();

        let snack = service.by_category("snackbox").await.unwrap();
        assert_eq!(snack.len(), 1);
        assert_eq!(snack[0].id, "cheese-stick");

        let by_tag = service.search("KEJU").await.unwrap();
        assert_eq!(by_tag.len(), 1);

        let by_name = service.search("choco").await.unwrap();
        assert_eq!(by_name[0].id, "chocochip-classic");

        let best = service.best_sellers(DEFAULT_BEST_SELLER_LIMIT).await.unwrap();
        assert_eq!(best.len(), 1);
        assert_eq!(service.best_sellers(0).await.unwrap().len(), 0);

        assert_eq!(repo.list_calls(), 1);
    }

    #[tokio::test]
    async fn delete_then_read_omits_product() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        service.upsert(chocochip()).await.unwrap();
        service.get_all().await.unwrap();
        service.delete("chocochip-classic").await.unwrap();
        assert!(service.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        let result = service
            .upsert(ProductCommand {
                price: -1,
                ..chocochip()
            })
            .await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn order_link_encodes_message() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        service.upsert(chocochip()).await.unwrap();

        let link = service
            .order_link(
                "chocochip-classic",
                "https://wa.me/6281234567890",
                &OrderRequest {
                    quantity: Some(2),
                    variant: Some("M (300g)".into()),
                    note: None,
                },
            )
            .await
            .unwrap()
            .expect("known product");

        let text = link.split_once("?text=").unwrap().1;
        let message = percent_decode_str(text).decode_utf8().unwrap();
        assert!(message.contains("• Varian: M (300g)"));
        assert!(message.contains("• Qty: 2"));
        assert!(!message.contains("Catatan"));
    }

    #[tokio::test]
    async fn order_link_rejects_unknown_variant_and_product() {
        let service = service(Arc::new(InMemoryCatalog::new()));
        service.upsert(chocochip()).await.unwrap();

        let unknown_variant = service
            .order_link(
                "chocochip-classic",
                "https://wa.me/1",
                &OrderRequest {
                    variant: Some("XL".into()),
                    ..OrderRequest::default()
                },
            )
            .await;
        assert!(matches!(unknown_variant, Err(CatalogError::Validation(_))));

        let unknown_product = service
            .order_link("ghost", "https://wa.me/1", &OrderRequest::default())
            .await
            .unwrap();
        assert!(unknown_product.is_none());
    }
}
