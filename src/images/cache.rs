/// Best-effort image preloading with a per-URL state map
///
/// Each URL moves through `NotRequested -> Loading -> {Loaded | Failed}`.
/// At most one transfer per URL is in flight; repeat requests while loading
/// or after loading are no-ops. Failures are swallowed into
/// `Preloaded::SoftFailure` and never propagated.

use std::collections::HashMap;
use std::sync::Arc;

use iced::widget::image::Handle;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::loader::ImageLoader;
use crate::platform::Platform;

/// Observable state of one cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

/// What a preload settled with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preloaded {
    /// Loaded now, loaded earlier, already in flight, or nothing to do
    Ready(String),
    /// The transfer failed; callers must not treat this as a hard error
    SoftFailure,
}

enum Entry {
    Loading,
    Loaded(Handle),
    Failed,
}

struct Inner {
    entries: Mutex<HashMap<String, Entry>>,
    loader: Arc<dyn ImageLoader>,
    platform: Platform,
}

/// Shared handle to the image cache. Cloning is cheap.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<Inner>,
}

impl ImageCache {
    pub fn new(loader: Arc<dyn ImageLoader>, platform: Platform) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                loader,
                platform,
            }),
        }
    }

    /// Load `url` once and remember that it finished.
    ///
    /// Completes immediately if the context cannot render images, if the URL
    /// is already loaded, or if a transfer for it is already running (this
    /// does not wait for that transfer). Dropping the returned future before
    /// it settles aborts the transfer and clears the in-flight flag.
    pub async fn preload(&self, url: &str) -> Preloaded {
        if !self.inner.platform.renders_images() {
            return Preloaded::Ready(url.to_string());
        }

        {
            let mut entries = self.inner.entries.lock();
            match entries.get(url) {
                Some(Entry::Loaded(_)) | Some(Entry::Loading) => {
                    return Preloaded::Ready(url.to_string());
                }
                Some(Entry::Failed) | None => {
                    entries.insert(url.to_string(), Entry::Loading);
                }
            }
        }

        debug!("🖼️  Preloading {}", url);
        let guard = InFlight {
            cache: self,
            url,
            settled: false,
        };

        match self.inner.loader.load(url).await {
            Ok(handle) => {
                guard.settle(Entry::Loaded(handle));
                debug!("✅ Cached {}", url);
                Preloaded::Ready(url.to_string())
            }
            Err(err) => {
                guard.settle(Entry::Failed);
                warn!("⚠️  Image preload failed: {}", err);
                Preloaded::SoftFailure
            }
        }
    }

    /// Fire a preload for every distinct, non-empty URL without waiting.
    ///
    /// Returns the de-duplicated list in first-seen order. This is not a
    /// barrier: the preloads may still be running when it returns. Must be
    /// called from within a tokio runtime.
    pub fn preload_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<String> {
        let unique = unique_urls(urls);

        if self.inner.platform.renders_images() {
            for url in &unique {
                let cache = self.clone();
                let url = url.clone();
                tokio::spawn(async move {
                    cache.preload(&url).await;
                });
            }
        }

        unique
    }

    /// True only once `url` has finished loading
    pub fn is_cached(&self, url: &str) -> bool {
        self.state(url) == EntryState::Loaded
    }

    /// Current state of the entry for `url`
    pub fn state(&self, url: &str) -> EntryState {
        match self.inner.entries.lock().get(url) {
            None => EntryState::NotRequested,
            Some(Entry::Loading) => EntryState::Loading,
            Some(Entry::Loaded(_)) => EntryState::Loaded,
            Some(Entry::Failed) => EntryState::Failed,
        }
    }

    /// The loaded image for `url`, ready to render
    pub fn handle(&self, url: &str) -> Option<Handle> {
        match self.inner.entries.lock().get(url) {
            Some(Entry::Loaded(handle)) => Some(handle.clone()),
            _ => None,
        }
    }

    /// Forget every entry. In-flight transfers are not cancelled and will
    /// re-populate their entry when they settle.
    // The UI never resets the cache
    #[allow(dead_code)]
    pub fn clear(&self) {
        self.inner.entries.lock().clear();
        debug!("🗑️  Image cache cleared");
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.inner.entries.lock().len())
            .field("platform", &self.inner.platform)
            .finish()
    }
}

/// Clears the in-flight flag if the preload is dropped before it settles
struct InFlight<'a> {
    cache: &'a ImageCache,
    url: &'a str,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, entry: Entry) {
        self.cache
            .inner
            .entries
            .lock()
            .insert(self.url.to_string(), entry);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut entries = self.cache.inner.entries.lock();
        if matches!(entries.get(self.url), Some(Entry::Loading)) {
            entries.remove(self.url);
            debug!("🛑 Preload of {} cancelled", self.url);
        }
    }
}

fn unique_urls<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(urls.len());
    for url in urls {
        let url = url.as_ref();
        if url.trim().is_empty() || unique.iter().any(|seen| seen == url) {
            continue;
        }
        unique.push(url.to_string());
    }
    unique
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ImageError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts loads; URLs containing "broken" fail, others succeed after `delay`
    pub(crate) struct CountingLoader {
        pub calls: AtomicUsize,
        pub delay: Duration,
    }

    impl CountingLoader {
        pub(crate) fn new() -> Arc<Self> {
            Self::with_delay(Duration::ZERO)
        }

        pub(crate) fn with_delay(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageLoader for CountingLoader {
        async fn load(&self, url: &str) -> Result<Handle, ImageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if url.contains("broken") {
                return Err(ImageError::NotAnImage { url: url.to_string() });
            }
            Ok(Handle::from_bytes(url.as_bytes().to_vec()))
        }
    }

    /// Never finishes
    struct StalledLoader;

    #[async_trait]
    impl ImageLoader for StalledLoader {
        async fn load(&self, _url: &str) -> Result<Handle, ImageError> {
            std::future::pending().await
        }
    }

    fn cache_with(loader: Arc<dyn ImageLoader>) -> ImageCache {
        ImageCache::new(loader, Platform { interactive: true, prefers_dark: false })
    }

    #[tokio::test]
    async fn test_preload_loads_exactly_once() {
        let loader = CountingLoader::new();
        let cache = cache_with(loader.clone());
        let url = "https://img/a.jpg";

        assert!(!cache.is_cached(url));
        assert_eq!(cache.preload(url).await, Preloaded::Ready(url.to_string()));
        assert!(cache.is_cached(url));
        assert_eq!(cache.preload(url).await, Preloaded::Ready(url.to_string()));

        assert_eq!(loader.calls(), 1);
        assert!(cache.handle(url).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_preload_does_not_start_second_transfer() {
        let loader = CountingLoader::with_delay(Duration::from_millis(50));
        let cache = cache_with(loader.clone());
        let url = "https://img/a.jpg";

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.preload(url).await }
        });
        tokio::task::yield_now().await;
        assert_eq!(cache.state(url), EntryState::Loading);

        // Fire-and-forget: returns while the first transfer is still running
        assert_eq!(cache.preload(url).await, Preloaded::Ready(url.to_string()));
        assert!(!cache.is_cached(url));

        first.await.unwrap();
        assert!(cache.is_cached(url));
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_soft_and_retryable() {
        let loader = CountingLoader::new();
        let cache = cache_with(loader.clone());
        let url = "https://img/broken.jpg";

        assert_eq!(cache.preload(url).await, Preloaded::SoftFailure);
        assert_eq!(cache.state(url), EntryState::Failed);
        assert!(!cache.is_cached(url));

        // The in-flight flag was cleared, so a later request tries again
        assert_eq!(cache.preload(url).await, Preloaded::SoftFailure);
        assert_eq!(loader.calls(), 2);
    }

    #[tokio::test]
    async fn test_headless_preload_is_noop() {
        let loader = CountingLoader::new();
        let cache = ImageCache::new(loader.clone(), Platform::headless());
        let url = "https://img/a.jpg";

        assert_eq!(cache.preload(url).await, Preloaded::Ready(url.to_string()));
        assert_eq!(loader.calls(), 0);
        assert!(!cache.is_cached(url));
    }

    #[tokio::test]
    async fn test_preload_all_dedupes_in_first_seen_order() {
        let loader = CountingLoader::new();
        let cache = cache_with(loader.clone());
        let u = "https://img/u.jpg";
        let u2 = "https://img/u2.jpg";

        let unique = cache.preload_all(&[u, u, "", u2]);
        assert_eq!(unique, vec![u.to_string(), u2.to_string()]);

        // Let the spawned preloads run
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(cache.is_cached(u));
        assert!(cache.is_cached(u2));
        assert_eq!(loader.calls(), 2);
    }

    #[tokio::test]
    async fn test_headless_preload_all_starts_nothing() {
        let loader = CountingLoader::new();
        let cache = ImageCache::new(loader.clone(), Platform::headless());
        let u = "https://img/u.jpg";
        let u2 = "https://img/u2.jpg";

        let unique = cache.preload_all(&[u, u2, u]);
        assert_eq!(unique, vec![u.to_string(), u2.to_string()]);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(loader.calls(), 0);
        assert!(!cache.is_cached(u));
        assert_eq!(cache.state(u2), EntryState::NotRequested);
    }

    #[tokio::test]
    async fn test_preload_all_of_nothing() {
        let cache = cache_with(CountingLoader::new());
        let empty: [&str; 0] = [];
        assert!(cache.preload_all(&empty).is_empty());
        assert!(cache.preload_all(&["", "  "]).is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_cached_state() {
        let cache = cache_with(CountingLoader::new());
        let url = "https://img/a.jpg";

        cache.preload(url).await;
        assert!(cache.is_cached(url));

        cache.clear();
        assert!(!cache.is_cached(url));
        assert_eq!(cache.state(url), EntryState::NotRequested);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_load_repopulates_after_clear() {
        let cache = cache_with(CountingLoader::with_delay(Duration::from_millis(20)));
        let url = "https://img/a.jpg";

        let pending = tokio::spawn({
            let cache = cache.clone();
            async move { cache.preload(url).await }
        });
        tokio::task::yield_now().await;
        cache.clear();
        assert_eq!(cache.state(url), EntryState::NotRequested);

        pending.await.unwrap();
        assert!(cache.is_cached(url));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_preload_cancels_transfer() {
        let cache = cache_with(Arc::new(StalledLoader));
        let url = "https://img/a.jpg";

        let timed_out = tokio::time::timeout(Duration::from_millis(10), cache.preload(url)).await;
        assert!(timed_out.is_err());

        // Not stuck in Loading: a new request would start a new transfer
        assert_eq!(cache.state(url), EntryState::NotRequested);
    }

    #[test]
    fn test_unique_urls_skips_blank() {
        assert_eq!(
            unique_urls(&["a", " ", "b", "a", ""]),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
