use serde::Serialize;

use crate::application::error::CatalogError;
use crate::application::products::ProductService;
use crate::application::site::SiteService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub site_name: String,
    pub total_products: usize,
    pub best_sellers: usize,
}

#[derive(Clone)]
pub struct DashboardService {
    site: SiteService,
    products: ProductService,
}

impl DashboardService {
    pub fn new(site: SiteService, products: ProductService) -> Self {
        Self { site, products }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, CatalogError> {
        let (site, products) = tokio::try_join!(self.site.get_site(), self.products.get_all())?;
        Ok(DashboardSummary {
            site_name: site.name,
            total_products: products.len(),
            best_sellers: products.iter().filter(|p| p.best_seller).count(),
        })
    }
}
