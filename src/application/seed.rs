//! Starter catalog and the idempotent seeding operation.

use std::sync::Arc;

use tracing::info;

use crate::application::error::CatalogError;
use crate::application::repos::{
    NewProductImage, NewVariant, NewVariantOption, SeedReport, SeedRepo, UpsertCategoryParams,
    UpsertFaqParams, UpsertProductParams, UpsertSiteParams, UpsertTestimonialParams,
};
use crate::cache::CacheLayer;
use crate::domain::types::{Currency, TestimonialSource};

/// Everything inserted by a seed run. Rows that already exist are skipped:
/// site by its fixed id, categories and products by id, FAQs by question,
/// testimonials by name and message.
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    pub site: UpsertSiteParams,
    pub categories: Vec<UpsertCategoryParams>,
    pub products: Vec<UpsertProductParams>,
    pub faqs: Vec<UpsertFaqParams>,
    pub testimonials: Vec<UpsertTestimonialParams>,
}

#[derive(Clone)]
pub struct SeedService {
    repo: Arc<dyn SeedRepo>,
    cache: Arc<CacheLayer>,
}

impl SeedService {
    pub fn new(repo: Arc<dyn SeedRepo>, cache: Arc<CacheLayer>) -> Self {
        Self { repo, cache }
    }

    pub async fn run(&self) -> Result<SeedReport, CatalogError> {
        self.run_with(&SeedCatalog::starter()).await
    }

    pub async fn run_with(&self, catalog: &SeedCatalog) -> Result<SeedReport, CatalogError> {
        let report = self.repo.seed_catalog(catalog).await?;
        self.cache.invalidate_all();
        info!(
            target = "application::seed",
            site_created = report.site_created,
            categories = report.categories_created,
            products = report.products_created,
            faqs = report.faqs_created,
            testimonials = report.testimonials_created,
            "Seeded storefront catalog"
        );
        Ok(report)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

fn images(items: &[(&str, &str)]) -> Vec<NewProductImage> {
    items
        .iter()
        .enumerate()
        .map(|(index, (src, alt))| NewProductImage {
            src: (*src).to_string(),
            alt: (*alt).to_string(),
            width: None,
            height: None,
            sort_order: Some(index as i32),
        })
        .collect()
}

fn variant(name: &str, options: &[(&str, &str, i64)]) -> NewVariant {
    NewVariant {
        name: name.to_string(),
        options: options
            .iter()
            .map(|(value, label, price)| NewVariantOption {
                label: (*label).to_string(),
                value: Some((*value).to_string()),
                price: *price,
            })
            .collect(),
    }
}

impl SeedCatalog {
    pub fn starter() -> Self {
        Self {
            site: starter_site(),
            categories: starter_categories(),
            products: starter_products(),
            faqs: starter_faqs(),
            testimonials: starter_testimonials(),
        }
    }
}

fn starter_site() -> UpsertSiteParams {
    UpsertSiteParams {
        name: "Maher Snack & Cookies".into(),
        domain: "https://mahersnackandcookies.id".into(),
        locale: "id-ID".into(),
        whatsapp: "https://wa.me/6281234567890".into(),
        email: "hello@mahersnackandcookies.id".into(),
        phone: "+62 812-3456-7890".into(),
        address: "Jl. Contoh No. 12, Jakarta Selatan".into(),
        hours: Some("Senin–Sabtu 09.00–18.00 WIB".into()),
        logo_light: "/images/brand/logo-light.svg".into(),
        logo_dark: "/images/brand/logo-dark.svg".into(),
        instagram: Some("https://instagram.com/maherbites".into()),
        tiktok: Some("https://tiktok.com/@maherbites".into()),
        facebook: Some("https://facebook.com/maherbites".into()),
        default_title: "Maher Snack & Cookies — Camilan Manis, Bikin Hati Habis".into(),
        default_description: "Maher Snack & Cookies menghadirkan cookies dan snack fresh-baked dengan bahan premium. Cocok untuk hampers, event, dan daily treat. Pesan antar cepat area Jabodetabek.".into(),
        keywords: strings(&[
            "maher snack & cookies",
            "cookies",
            "kue kering",
            "snack box",
            "hampers",
            "kue kering premium",
        ]),
        og_image: "https://maherbites.id/og/default.png".into(),
        twitter_handle: Some("@maherbites".into()),
    }
}

fn starter_categories() -> Vec<UpsertCategoryParams> {
    [
        (
            "cookies",
            "cookies",
            "Cookies",
            "Cookies renyah & chewy, dipanggang harian.",
        ),
        (
            "snackbox",
            "snack-box",
            "Snack Box",
            "Paket camilan praktis untuk meeting & acara.",
        ),
        (
            "hampers",
            "hampers",
            "Hampers",
            "Hadiah manis untuk momen spesial.",
        ),
    ]
    .into_iter()
    .map(|(id, slug, name, description)| UpsertCategoryParams {
        id: id.into(),
        slug: slug.into(),
        name: name.into(),
        description: Some(description.into()),
    })
    .collect()
}

fn starter_products() -> Vec<UpsertProductParams> {
    vec![
        UpsertProductParams {
            id: "chocochip-classic".into(),
            slug: "chocochip-classic".into(),
            sku: Some("MB-CK-01".into()),
            name: "ChocoChip Classic".into(),
            price: 65_000,
            currency: Currency::Idr,
            category_id: "cookies".into(),
            tags: strings(&["best-seller", "cokelat", "renyah"]),
            short_desc: "Cookies chocochip renyah di luar, chewy di dalam.".into(),
            long_desc: "Dipanggang harian menggunakan butter premium dan dark chocolate chips. Cocok untuk teman ngopi atau hadiah.".into(),
            rating: Some(4.8),
            weight_gram: Some(180),
            ingredients: strings(&["Tepung", "Butter", "Gula", "Cokelat", "Telur", "Vanila"]),
            allergens: strings(&["Gluten", "Telur", "Susu"]),
            shelf_life_days: Some(10),
            storage: Some("Simpan di wadah kedap pada suhu ruang sejuk.".into()),
            best_seller: true,
            images: images(&[
                (
                    "/images/products/chocochip-classic-1.svg",
                    "ChocoChip Classic Maher Snack & Cookies",
                ),
                (
                    "/images/products/chocochip-classic-2.svg",
                    "Detail cookies chocochip",
                ),
            ]),
            variants: vec![variant(
                "Ukuran",
                &[("s", "S (180g)", 65_000), ("m", "M (300g)", 95_000)],
            )],
        },
        UpsertProductParams {
            id: "redvelvet-crinkle".into(),
            slug: "redvelvet-crinkle".into(),
            sku: Some("MB-CK-02".into()),
            name: "Red Velvet Crinkle".into(),
            price: 70_000,
            currency: Currency::Idr,
            category_id: "cookies".into(),
            tags: strings(&["manis", "lembut"]),
            short_desc: "Crinkle lembut dengan sentuhan krim keju.".into(),
            long_desc: "Tekstur fudgy dengan rasa kakao dan krim keju yang seimbang. Favorit untuk hampers.".into(),
            rating: Some(4.7),
            weight_gram: Some(180),
            ingredients: Vec::new(),
            allergens: strings(&["Gluten", "Telur", "Susu"]),
            shelf_life_days: Some(8),
            storage: Some("Simpan di wadah kedap pada suhu ruang.".into()),
            best_seller: true,
            images: images(&[(
                "/images/products/redvelvet-crinkle-1.svg",
                "Red Velvet Crinkle Maher Snack & Cookies",
            )]),
            variants: vec![variant(
                "Ukuran",
                &[
                    ("p", "Paket (12 pcs)", 70_000),
                    ("l", "Paket (24 pcs)", 120_000),
                ],
            )],
        },
        UpsertProductParams {
            id: "cheese-stick".into(),
            slug: "cheese-stick".into(),
            sku: Some("MB-SN-01".into()),
            name: "Cheese Stick Savory".into(),
            price: 60_000,
            currency: Currency::Idr,
            category_id: "snackbox".into(),
            tags: strings(&["gurih", "keju"]),
            short_desc: "Camilan gurih keju, kriuk maksimal.".into(),
            long_desc: "Dibuat dari keju berkualitas. Pas untuk snack box meeting dan bekal.".into(),
            rating: Some(4.6),
            weight_gram: Some(150),
            ingredients: strings(&["Tepung", "Keju", "Butter", "Garam"]),
            allergens: strings(&["Gluten", "Susu"]),
            shelf_life_days: Some(14),
            storage: Some("Tutup rapat setelah dibuka agar tetap renyah.".into()),
            best_seller: false,
            images: images(&[(
                "/images/products/cheese-stick-1.svg",
                "Cheese Stick Savory Maher Snack & Cookies",
            )]),
            variants: Vec::new(),
        },
        UpsertProductParams {
            id: "hampers-sweet-duo".into(),
            slug: "hampers-sweet-duo".into(),
            sku: Some("MB-HM-01".into()),
            name: "Hampers Sweet Duo".into(),
            price: 185_000,
            currency: Currency::Idr,
            category_id: "hampers".into(),
            tags: strings(&["hadiah", "paket"]),
            short_desc: "Paket 2 varian cookies favorit + kartu ucapan.".into(),
            long_desc: "Pilihan ideal untuk ulang tahun dan momen spesial. Kartu ucapan bisa custom.".into(),
            rating: Some(4.9),
            weight_gram: None,
            ingredients: Vec::new(),
            allergens: Vec::new(),
            shelf_life_days: None,
            storage: None,
            best_seller: true,
            images: images(&[(
                "/images/products/hampers-sweet-duo-1.svg",
                "Hampers Sweet Duo Maher Snack & Cookies",
            )]),
            variants: vec![variant(
                "Pilihan Varian",
                &[
                    ("cc-rv", "ChocoChip + Red Velvet", 185_000),
                    ("cc-cs", "ChocoChip + Cheese Stick", 185_000),
                ],
            )],
        },
    ]
}

fn starter_faqs() -> Vec<UpsertFaqParams> {
    [
        (
            "Apakah produk tersedia setiap hari?",
            "Ya, dipanggang harian. Untuk paket khusus/hampers disarankan pre-order H-2.",
        ),
        (
            "Bagaimana cara pesan?",
            "Klik tombol “Pesan via WhatsApp” di produk yang diinginkan dan kirim pesan otomatis yang muncul.",
        ),
        (
            "Berapa lama masa simpan cookies?",
            "Rata-rata 7–14 hari di suhu ruang sejuk dalam wadah kedap.",
        ),
        (
            "Apakah bisa custom untuk acara?",
            "Bisa. Anda dapat menyesuaikan varian, jumlah, dan kartu ucapan.",
        ),
    ]
    .into_iter()
    .zip(1..)
    .map(|((question, answer), sort_order)| UpsertFaqParams {
        id: None,
        question: question.into(),
        answer: answer.into(),
        sort_order,
    })
    .collect()
}

fn starter_testimonials() -> Vec<UpsertTestimonialParams> {
    [
        (
            "Nadia",
            Some("@nadiafoodie"),
            "ChocoChip-nya juara! Renyah luar, chewy dalam.",
            5,
            TestimonialSource::Instagram,
        ),
        (
            "Rafi",
            None,
            "Snack box untuk meeting datang tepat waktu dan rapi.",
            5,
            TestimonialSource::Whatsapp,
        ),
        (
            "Saras",
            Some("@sarasmakan"),
            "Red Velvet Crinkle lembut, manisnya pas.",
            4,
            TestimonialSource::Instagram,
        ),
    ]
    .into_iter()
    .zip(1..)
    .map(
        |((name, handle, message, rating, source), sort_order)| UpsertTestimonialParams {
            id: None,
            name: name.into(),
            handle: handle.map(Into::into),
            message: message.into(),
            rating,
            source: Some(source),
            sort_order,
        },
    )
    .collect()
}
