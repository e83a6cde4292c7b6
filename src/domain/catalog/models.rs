//! Catalog Models

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<Product>;

/// Category Id (the category slug)
pub type CategoryId = TypedId<Category>;

/// Homepage section that counts as "featured" alongside the flag.
pub const FEATURED_SECTION: &str = "featured";

/// Rank given to categories without an explicit display order.
pub const UNRANKED_CATEGORY: u32 = 999;

/// Product Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier assigned by the document store.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Long-form description.
    #[serde(default)]
    pub description: String,

    /// Selling price in minor units.
    pub price: u64,

    /// Pre-discount price in minor units.
    #[serde(default)]
    pub original_price: Option<u64>,

    /// Advertised discount percentage, set independently of the prices.
    #[serde(default)]
    pub discount: Option<u8>,

    /// Owning category slug.
    pub category: CategoryId,

    /// Image URLs, thumbnail first.
    #[serde(default)]
    pub images: Vec<String>,

    /// Units available; zero means the product cannot be bought.
    #[serde(default)]
    pub stock: u32,

    /// Promotional placement flag.
    #[serde(default)]
    pub featured: bool,

    /// Homepage sections the product is pinned to.
    #[serde(default)]
    pub sections: Vec<String>,

    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f32,

    /// Number of reviews.
    #[serde(default)]
    pub reviews: u32,

    /// Attribute name to display value.
    #[serde(default)]
    pub specs: FxHashMap<String, String>,
}

impl Product {
    /// Primary image, if the product has any.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether at least one unit is available.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Advertised discount; a stored zero means no discount.
    pub fn discount_percent(&self) -> Option<u8> {
        self.discount.filter(|discount| *discount > 0)
    }

    /// Whether the product is pinned to the given homepage section.
    pub fn in_section(&self, section: &str) -> bool {
        self.sections.iter().any(|pinned| pinned == section)
    }

    /// Discount implied by `original_price` and `price`, rounded down.
    pub fn implied_discount(&self) -> Option<u8> {
        let original = self.original_price.filter(|original| *original > self.price)?;
        let saved = u128::from(original - self.price);

        u8::try_from(saved * 100 / u128::from(original)).ok()
    }

    /// Whether the advertised discount agrees with the price pair, allowing
    /// one point of rounding.
    pub fn discount_is_consistent(&self) -> bool {
        match (self.discount_percent(), self.implied_discount()) {
            (None, None) => true,
            (Some(advertised), Some(implied)) => advertised.abs_diff(implied) <= 1,
            _ => false,
        }
    }
}

/// New Product Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub original_price: Option<u64>,
    pub discount: Option<u8>,
    pub category: CategoryId,
    pub images: Vec<String>,
    pub stock: u32,
    pub featured: bool,
    pub sections: Vec<String>,
    pub rating: f32,
    pub reviews: u32,
    pub specs: FxHashMap<String, String>,
}

impl NewProduct {
    /// Attach a store-assigned id.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            original_price: self.original_price,
            discount: self.discount,
            category: self.category,
            images: self.images,
            stock: self.stock,
            featured: self.featured,
            sections: self.sections,
            rating: self.rating,
            reviews: self.reviews,
            specs: self.specs,
        }
    }
}

/// Category Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique slug referenced by products.
    #[serde(alias = "id")]
    pub category_id: CategoryId,

    pub name: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub description: String,

    /// Display position, ascending.
    #[serde(default)]
    pub order: Option<u32>,
}

impl Category {
    /// Sort key for category listings.
    pub fn display_rank(&self) -> u32 {
        self.order.unwrap_or(UNRANKED_CATEGORY)
    }
}
