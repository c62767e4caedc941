/// Navigation routes
///
/// `/products` is the list and `/products/{id}` a detail page. The `id`
/// segment stays text; the detail view decides whether it is valid.

/// A location in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ProductList,
    ProductDetail { id: String },
}

impl Route {
    /// Resolve a path. Unknown paths redirect to the product list.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["products", id] => Route::ProductDetail { id: id.to_string() },
            _ => Route::ProductList,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::ProductList => "/products".to_string(),
            Route::ProductDetail { id } => format!("/products/{}", id),
        }
    }

    /// Route to the detail page of a product
    pub fn product(id: u32) -> Self {
        Route::ProductDetail { id: id.to_string() }
    }
}
