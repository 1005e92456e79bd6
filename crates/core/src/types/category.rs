//! Product category tags.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of catalog categories.
///
/// Serialized as the lowercase tag used by the category filter
/// (`"laptops"`, `"smartphones"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Laptops,
    Smartphones,
    Tablets,
    Accessories,
}

impl Category {
    /// Every category, in filter-menu order.
    pub const ALL: [Self; 4] = [
        Self::Laptops,
        Self::Smartphones,
        Self::Tablets,
        Self::Accessories,
    ];

    /// The lowercase tag for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Laptops => "laptops",
            Self::Smartphones => "smartphones",
            Self::Tablets => "tablets",
            Self::Accessories => "accessories",
        }
    }

    /// Human-readable label, e.g. `Laptops`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Laptops => "Laptops",
            Self::Smartphones => "Smartphones",
            Self::Tablets => "Tablets",
            Self::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == tag)
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}
