use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use super::catalog::Catalog;
use super::data::Product;
use crate::config::Latency;
use crate::error::CatalogError;
use crate::images::ImageCache;

/// Wait `latency`, then run `produce`.
///
/// A zero latency skips the timer entirely.
pub async fn delay_then<F: Future>(latency: Duration, produce: F) -> F::Output {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    produce.await
}

/// Asynchronous access to the catalog with simulated network latency.
/// Every read warms the image cache as a side effect.
#[derive(Clone, Debug)]
pub struct CatalogService {
    catalog: Catalog,
    images: ImageCache,
    latency: Latency,
}

impl CatalogService {
    pub fn new(catalog: Catalog, images: ImageCache, latency: Latency) -> Self {
        Self {
            catalog,
            images,
            latency,
        }
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Start loading every product image in the background
    pub fn warm_up(&self) -> Vec<String> {
        let urls = self.images.preload_all(self.catalog.image_urls().as_slice());
        info!("🔥 Warming {} product images", urls.len());
        urls
    }

    /// All products, after the list latency.
    ///
    /// Fires (but does not wait for) a preload of every product image
    /// before resolving.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let products = delay_then(self.latency.list, async { self.catalog.all().to_vec() }).await;

        let urls: Vec<&str> = products.iter().filter_map(Product::image).collect();
        self.images.preload_all(urls.as_slice());
        info!("📦 Listed {} products, images preloading", products.len());

        Ok(products)
    }

    /// One product by ID, or `None` if no product has that ID.
    ///
    /// If the product has an image, its preload settles (either way) before
    /// the detail latency starts.
    pub async fn get_product(&self, id: u32) -> Result<Option<Product>, CatalogError> {
        let product = self.catalog.find(id).cloned();

        if let Some(url) = product.as_ref().and_then(Product::image) {
            let outcome = self.images.preload(url).await;
            debug!("Image for product {} settled: {:?}", id, outcome);
        }

        let product = delay_then(self.latency.detail, async move { product }).await;
        if product.is_none() {
            debug!("No product with id {}", id);
        }
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::cache::tests::CountingLoader;
    use crate::platform::Platform;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn service(loader: Arc<CountingLoader>, latency: Latency) -> CatalogService {
        let images = ImageCache::new(loader, Platform { interactive: true, prefers_dark: false });
        CatalogService::new(Catalog::seeded(), images, latency)
    }

    #[tokio::test]
    async fn test_get_product_returns_every_seed_product() {
        let service = service(CountingLoader::new(), Latency::zero());

        for product in Catalog::seeded().all() {
            let found = service.get_product(product.id).await.unwrap();
            assert_eq!(found.as_ref(), Some(product));
        }
    }

    #[tokio::test]
    async fn test_get_missing_product_is_none_not_error() {
        let service = service(CountingLoader::new(), Latency::zero());

        assert_eq!(service.get_product(0).await, Ok(None));
        assert_eq!(service.get_product(4242).await, Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_products_waits_and_returns_seed() {
        let service = service(CountingLoader::new(), Latency::default());

        let start = Instant::now();
        let products = service.list_products().await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(products.as_slice(), Catalog::seeded().all());
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_products_fires_image_preloads() {
        let loader = CountingLoader::new();
        let service = service(loader.clone(), Latency::zero());

        service.list_products().await.unwrap();
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }

        assert_eq!(loader.calls(), Catalog::seeded().image_urls().len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_product_waits_for_latency() {
        let service = service(CountingLoader::new(), Latency::default());

        let start = Instant::now();
        service.get_product(1).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));

        let start = Instant::now();
        service.get_product(999).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_image_settles_before_latency_starts() {
        let loader = CountingLoader::with_delay(Duration::from_millis(50));
        let service = service(loader.clone(), Latency::default());
        let url = Catalog::seeded().find(2).and_then(Product::image).unwrap().to_string();

        let start = Instant::now();
        let product = service.get_product(2).await.unwrap();

        assert!(product.is_some());
        assert!(start.elapsed() >= Duration::from_millis(350));
        assert!(service.images().is_cached(&url));
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warm_up_preloads_all_images_once() {
        let loader = CountingLoader::new();
        let service = service(loader.clone(), Latency::zero());

        let urls = service.warm_up();
        assert_eq!(urls.len(), 8);
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }

        service.get_product(1).await.unwrap();
        assert_eq!(loader.calls(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_then_runs_after_wait() {
        let start = Instant::now();
        let value = delay_then(Duration::from_millis(40), async { 7 }).await;

        assert_eq!(value, 7);
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
