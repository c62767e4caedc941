/// Product image module
///
/// This module handles:
/// - Fetching image resources from their URLs (loader.rs)
/// - Preloading and remembering which images are ready (cache.rs)

pub mod cache;
pub mod loader;

pub use cache::{EntryState, ImageCache, Preloaded};
pub use loader::HttpImageLoader;
