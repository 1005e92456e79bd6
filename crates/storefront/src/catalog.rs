//! Product catalog.
//!
//! The catalog is built once at startup and never mutated. Lookups by id
//! return `Option` so callers can treat unknown products as a no-op.

use click_me_core::{Category, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of products shown in the home page "featured" strip.
pub const FEATURED_LIMIT: usize = 4;

/// Number of related products shown on a product detail page.
pub const RELATED_LIMIT: usize = 4;

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Decimal,
    pub original_price: Decimal,
    pub image: String,
    pub description: String,
    /// Average rating in `[0, 5]`.
    pub rating: Decimal,
    #[serde(rename = "reviews")]
    pub review_count: u32,
    pub in_stock: bool,
    pub features: Vec<String>,
}

impl Product {
    /// Current selling price.
    #[must_use]
    pub const fn price_tag(&self) -> Price {
        Price::usd(self.price)
    }

    /// Price before discount.
    #[must_use]
    pub const fn original_price_tag(&self) -> Price {
        Price::usd(self.original_price)
    }

    /// Discount against the original price, never negative.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        (self.original_price - self.price).max(Decimal::ZERO)
    }
}

/// The immutable set of products for a session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from a list of products, kept in the given order.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The built-in storefront catalog.
    #[must_use]
    pub fn seed() -> Self {
        Self::new(seed_products())
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The first `limit` products, for the home page.
    #[must_use]
    pub fn featured(&self, limit: usize) -> &[Product] {
        self.products
            .get(..limit.min(self.products.len()))
            .unwrap_or_default()
    }

    /// Other products in the same category as `product`, in catalog order.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Seed Data
// =============================================================================

struct SeedProduct {
    id: u32,
    name: &'static str,
    category: Category,
    price_cents: i64,
    original_price_cents: i64,
    image: &'static str,
    description: &'static str,
    rating_tenths: i64,
    review_count: u32,
    features: [&'static str; 4],
}

const SEED: [SeedProduct; 8] = [
    SeedProduct {
        id: 1,
        name: "MacBook Pro 14\"",
        category: Category::Laptops,
        price_cents: 199_999,
        original_price_cents: 219_999,
        image: "images/products/macbook-pro-14.jpg",
        description: "Powerful laptop with M2 Pro chip, perfect for professionals",
        rating_tenths: 48,
        review_count: 124,
        features: ["M2 Pro Chip", "16GB RAM", "512GB SSD", "14\" Retina Display"],
    },
    SeedProduct {
        id: 2,
        name: "iPhone 15 Pro",
        category: Category::Smartphones,
        price_cents: 99_999,
        original_price_cents: 109_999,
        image: "images/products/iphone-15-pro.jpg",
        description: "Latest iPhone with advanced camera system and A17 Pro chip",
        rating_tenths: 47,
        review_count: 89,
        features: ["A17 Pro Chip", "48MP Camera", "128GB Storage", "6.1\" Display"],
    },
    SeedProduct {
        id: 3,
        name: "iPad Air",
        category: Category::Tablets,
        price_cents: 59_999,
        original_price_cents: 64_999,
        image: "images/products/ipad-air.jpg",
        description: "Versatile tablet perfect for work and entertainment",
        rating_tenths: 46,
        review_count: 67,
        features: ["M1 Chip", "10.9\" Display", "64GB Storage", "Touch ID"],
    },
    SeedProduct {
        id: 4,
        name: "AirPods Pro",
        category: Category::Accessories,
        price_cents: 24_999,
        original_price_cents: 27_999,
        image: "images/products/airpods-pro.jpg",
        description: "Premium wireless earbuds with active noise cancellation",
        rating_tenths: 45,
        review_count: 203,
        features: [
            "Active Noise Cancellation",
            "Transparency Mode",
            "24hr Battery Life",
            "Spatial Audio",
        ],
    },
    SeedProduct {
        id: 5,
        name: "Samsung Galaxy S24",
        category: Category::Smartphones,
        price_cents: 89_999,
        original_price_cents: 99_999,
        image: "images/products/galaxy-s24.jpg",
        description: "Flagship Android phone with advanced AI features",
        rating_tenths: 46,
        review_count: 156,
        features: [
            "Snapdragon 8 Gen 3",
            "50MP Camera",
            "256GB Storage",
            "6.2\" AMOLED",
        ],
    },
    SeedProduct {
        id: 6,
        name: "Dell XPS 13",
        category: Category::Laptops,
        price_cents: 129_999,
        original_price_cents: 149_999,
        image: "images/products/dell-xps-13.jpg",
        description: "Ultra-portable laptop with stunning InfinityEdge display",
        rating_tenths: 44,
        review_count: 98,
        features: [
            "Intel Core i7",
            "16GB RAM",
            "512GB SSD",
            "13.4\" FHD+ Display",
        ],
    },
    SeedProduct {
        id: 7,
        name: "Sony WH-1000XM5",
        category: Category::Accessories,
        price_cents: 39_999,
        original_price_cents: 44_999,
        image: "images/products/sony-wh1000xm5.jpg",
        description: "Industry-leading noise canceling wireless headphones",
        rating_tenths: 47,
        review_count: 187,
        features: [
            "Industry-leading ANC",
            "30hr Battery",
            "Hi-Res Audio",
            "Multipoint Connection",
        ],
    },
    SeedProduct {
        id: 8,
        name: "Microsoft Surface Pro 9",
        category: Category::Tablets,
        price_cents: 99_999,
        original_price_cents: 109_999,
        image: "images/products/surface-pro-9.jpg",
        description: "2-in-1 tablet that replaces your laptop",
        rating_tenths: 43,
        review_count: 76,
        features: ["Intel Core i5", "8GB RAM", "256GB SSD", "13\" Touchscreen"],
    },
];

fn seed_products() -> Vec<Product> {
    SEED.iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_string(),
            category: seed.category,
            price: Decimal::new(seed.price_cents, 2),
            original_price: Decimal::new(seed.original_price_cents, 2),
            image: seed.image.to_string(),
            description: seed.description.to_string(),
            rating: Decimal::new(seed.rating_tenths, 1),
            review_count: seed.review_count,
            in_stock: true,
            features: seed.features.iter().map(ToString::to_string).collect(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_eight_unique_products() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.len(), 8);

        let mut ids: Vec<u32> = catalog.all().iter().map(|p| p.id.as_u32()).collect();
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = Catalog::seed();
        let product = catalog.find_by_id(ProductId::new(6)).unwrap();
        assert_eq!(product.name, "Dell XPS 13");
        assert_eq!(product.price, Decimal::new(129_999, 2));

        assert!(catalog.find_by_id(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_featured_is_prefix() {
        let catalog = Catalog::seed();
        let featured = catalog.featured(FEATURED_LIMIT);
        assert_eq!(featured.len(), 4);
        assert_eq!(featured.first().unwrap().id, ProductId::new(1));

        assert_eq!(catalog.featured(100).len(), 8);
        assert!(Catalog::default().featured(FEATURED_LIMIT).is_empty());
    }

    #[test]
    fn test_related_excludes_self_and_other_categories() {
        let catalog = Catalog::seed();
        let iphone = catalog.find_by_id(ProductId::new(2)).unwrap();
        let related = catalog.related(iphone, RELATED_LIMIT);

        let names: Vec<&str> = related.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Samsung Galaxy S24"]);
    }

    #[test]
    fn test_savings() {
        let catalog = Catalog::seed();
        let macbook = catalog.find_by_id(ProductId::new(1)).unwrap();
        assert_eq!(macbook.savings(), Decimal::new(200, 0));
        assert_eq!(macbook.price_tag().display(), "$1,999.99");
        assert_eq!(macbook.original_price_tag().display(), "$2,199.99");

        let mut marked_up = macbook.clone();
        marked_up.price = Decimal::new(3_000, 0);
        assert_eq!(marked_up.savings(), Decimal::ZERO);
    }

    #[test]
    fn test_product_json_uses_camel_case() {
        let catalog = Catalog::seed();
        let json = serde_json::to_value(catalog.find_by_id(ProductId::new(4)).unwrap()).unwrap();
        assert!(json.get("originalPrice").is_some());
        assert!(json.get("inStock").is_some());
        assert_eq!(json.get("reviews").unwrap(), 203);
        assert_eq!(json.get("category").unwrap(), "accessories");
    }
}
