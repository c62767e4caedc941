use std::sync::LazyLock;

use super::data::Product;

const UNSPLASH_PARAMS: &str =
    "ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=500&q=80";

/// The fixed seed list, built once on first access and never mutated.
static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        seed(
            1,
            "Laptop Pro",
            1299.99,
            "High-performance laptop with 16GB RAM and 512GB SSD.",
            "photo-1496181133206-80ce9b88a853",
        ),
        seed(
            2,
            "Smart Home Hub",
            199.99,
            "Control your entire home with voice commands and automate routines for comfort and efficiency.",
            "photo-1558002038-1055907df827",
        ),
        seed(
            3,
            "Wireless Headphones",
            249.99,
            "Premium noise-canceling wireless headphones with 30-hour battery life.",
            "photo-1505740420928-5e560c06d30e",
        ),
        seed(
            4,
            "Smart Watch",
            399.99,
            "Fitness tracker with heart rate monitor and GPS.",
            "photo-1579586337278-3befd40fd17a",
        ),
        seed(
            5,
            "Wireless Speaker",
            129.99,
            "Portable Bluetooth speaker with waterproof design.",
            "photo-1608043152269-423dbba4e7e1",
        ),
        seed(
            6,
            "Digital Camera",
            749.99,
            "Professional DSLR camera with 24MP sensor and 4K video recording.",
            "photo-1516035069371-29a1b244cc32",
        ),
        seed(
            7,
            "Gaming Console",
            499.99,
            "Next-generation gaming console with 1TB storage and 4K gaming capabilities.",
            "photo-1606144042614-b2417e99c4e3",
        ),
        seed(
            8,
            "Tablet Pro",
            649.99,
            "Ultra-thin tablet with 12-inch display, stylus support, and all-day battery life.",
            "photo-1544244015-0df4b3ffc6b0",
        ),
    ]
});

fn seed(id: u32, name: &str, price: f64, description: &str, photo: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        description: description.to_string(),
        image_url: Some(format!("https://images.unsplash.com/{}?{}", photo, UNSPLASH_PARAMS)),
    }
}

/// The Catalog is the read-only product collection.
/// It has no error conditions: lookups either match or return None.
#[derive(Clone, Copy)]
pub struct Catalog {
    products: &'static [Product],
}

impl Catalog {
    /// The built-in seed catalog
    pub fn seeded() -> Self {
        Catalog { products: PRODUCTS.as_slice() }
    }

    /// A catalog over an arbitrary static collection (used by tests)
    #[cfg(test)]
    pub fn from_static(products: &'static [Product]) -> Self {
        Catalog { products }
    }

    /// Get all products in seed order
    pub fn all(&self) -> &'static [Product] {
        self.products
    }

    /// Find a product by ID (linear scan)
    pub fn find(&self, id: u32) -> Option<&'static Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Every defined, non-empty image URL in the catalog
    pub fn image_urls(&self) -> Vec<String> {
        self.products
            .iter()
            .filter_map(Product::image)
            .map(str::to_string)
            .collect()
    }

    /// Get a count of products in the catalog
    pub fn len(&self) -> usize {
        self.products.len()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("products", &self.products.len())
            .finish()
    }
}
