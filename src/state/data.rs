/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog access layer and the UI layer.

/// Represents a single product in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique catalog ID (positive)
    pub id: u32,
    /// Display name
    pub name: String,
    /// Price in the store currency
    pub price: f64,
    /// Free-form description shown on cards and the detail page
    pub description: String,
    /// Remote image location (None or empty if the product has no picture)
    pub image_url: Option<String>,
}

impl Product {
    /// The image URL, if the product has a non-empty one
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// Price formatted for display (e.g. "$1299.99")
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}
