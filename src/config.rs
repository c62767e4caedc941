/// Startup configuration
///
/// Built once in `main` and handed to every component that needs it.

use std::path::PathBuf;
use std::time::Duration;

use crate::platform::Platform;

/// Placeholder shown on product cards when the product image cannot load
pub const CARD_FALLBACK_IMAGE: &str = "https://via.placeholder.com/500x300?text=Product+Image";

/// Placeholder shown on the detail page when the product image cannot load
pub const DETAIL_FALLBACK_IMAGE: &str = "https://via.placeholder.com/800x600?text=Product+Image";

/// Artificial waits layered over the in-memory catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// Delay before the product list resolves
    pub list: Duration,
    /// Delay before a single product resolves
    pub detail: Duration,
    /// Pause between a broken image and its replacement
    pub image_retry: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            list: Duration::from_millis(500),
            detail: Duration::from_millis(300),
            image_retry: Duration::from_millis(100),
        }
    }
}

impl Latency {
    /// No artificial waits at all
    #[cfg(test)]
    pub fn zero() -> Self {
        Self {
            list: Duration::ZERO,
            detail: Duration::ZERO,
            image_retry: Duration::ZERO,
        }
    }
}

/// Everything decided once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub platform: Platform,
    pub latency: Latency,
    /// Where the theme preference is persisted
    pub preferences_path: PathBuf,
}

impl AppConfig {
    /// Configuration for the running desktop session
    ///
    /// The preference file lives in the user's config directory:
    /// - Linux: ~/.config/product-catalog/preferences.json
    /// - macOS: ~/Library/Application Support/product-catalog/preferences.json
    /// - Windows: %APPDATA%\product-catalog\preferences.json
    pub fn load() -> Self {
        Self {
            platform: Platform::detect(),
            latency: Latency::default(),
            preferences_path: Self::preferences_path(),
        }
    }

    fn preferences_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);

        path.push("product-catalog");
        path.push("preferences.json");
        path
    }
}
