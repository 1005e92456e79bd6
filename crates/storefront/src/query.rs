//! Catalog query pipeline: filter, sort, paginate.
//!
//! [`query`] is pure. Given the same catalog, filter and page request it
//! always returns the same page in the same order.

use std::cmp::Ordering;
use std::str::FromStr;

use click_me_core::Category;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::{Catalog, Product};

/// Products per listing page.
pub const PAGE_SIZE: usize = 6;

/// Errors from explicit page navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Target page is outside `[1, total_pages]`.
    #[error("page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Alphabetical by name.
    #[default]
    Name,
    /// Cheapest first.
    PriceLowToHigh,
    /// Most expensive first.
    PriceHighToLow,
    /// Best rated first.
    Rating,
}

impl SortKey {
    /// The sort menu value for this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
            Self::Rating => "rating",
        }
    }

    /// Parse a sort menu value, falling back to [`SortKey::Name`].
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => locale_cmp(&a.name, &b.name),
            Self::PriceLowToHigh => a.price.cmp(&b.price),
            Self::PriceHighToLow => b.price.cmp(&a.price),
            Self::Rating => b.rating.cmp(&a.rating),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "price-low" => Ok(Self::PriceLowToHigh),
            "price-high" => Ok(Self::PriceHighToLow),
            "rating" => Ok(Self::Rating),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Search, category, price and sort criteria for a listing.
///
/// `Default` is the cleared state: everything matches, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    /// Case-insensitive substring of name or description. Empty matches all.
    pub search: String,
    pub category: Option<Category>,
    /// Inclusive lower bound. `None` means 0.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound. `None` means unbounded.
    pub max_price: Option<Decimal>,
    pub sort: SortKey,
}

impl FilterSpec {
    /// Parse a price input box value. Empty or unparsable input yields `None`.
    #[must_use]
    pub fn parse_price_bound(raw: &str) -> Option<Decimal> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Decimal::from_str(raw)
            .ok()
            .or_else(|| Decimal::from_scientific(raw).ok())
    }

    /// Whether `product` passes the search, category and price filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = term.is_empty()
            || product.name.to_lowercase().contains(&term)
            || product.description.to_lowercase().contains(&term);
        let matches_category = self.category.is_none_or(|c| c == product.category);
        let min = self.min_price.unwrap_or(Decimal::ZERO);
        let matches_price =
            product.price >= min && self.max_price.is_none_or(|max| product.price <= max);

        matches_search && matches_category && matches_price
    }
}

/// A 1-based page index with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

impl PageRequest {
    /// Page 1 of the standard page size.
    #[must_use]
    pub const fn first() -> Self {
        Self::page(1)
    }

    /// A page of the standard page size.
    #[must_use]
    pub const fn page(page: usize) -> Self {
        Self {
            page,
            page_size: PAGE_SIZE,
        }
    }

    /// Move to `page` from a pager link.
    ///
    /// Unlike [`query`], which clamps, navigation refuses targets outside
    /// `[1, total_pages]` so the current page stays put.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::PageOutOfRange` if `page` is not a valid page.
    pub const fn navigate(self, page: usize, total_pages: usize) -> Result<Self, QueryError> {
        if page < 1 || page > total_pages {
            return Err(QueryError::PageOutOfRange { page, total_pages });
        }
        Ok(Self { page, ..self })
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage<'a> {
    pub items: Vec<&'a Product>,
    /// Number of products that passed the filter.
    pub total_count: usize,
    /// At least 1, even when nothing matched.
    pub total_pages: usize,
    /// The page actually returned, after clamping.
    pub page: usize,
}

/// Run the filter, sort and paginate pipeline over `catalog`.
///
/// Requests beyond the last page return the last page; page 0 returns page 1.
/// Callers reset to page 1 whenever the filter changes.
#[must_use]
pub fn query<'a>(catalog: &'a Catalog, filter: &FilterSpec, request: PageRequest) -> QueryPage<'a> {
    let mut matched: Vec<&Product> = catalog.all().iter().filter(|p| filter.matches(p)).collect();

    // `sort_by` is stable: ties keep catalog order.
    matched.sort_by(|a, b| filter.sort.compare(a, b));

    let page_size = request.page_size.max(1);
    let total_count = matched.len();
    let total_pages = total_count.div_ceil(page_size).max(1);
    let page = request.page.clamp(1, total_pages);

    let items = matched
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    QueryPage {
        items,
        total_count,
        total_pages,
        page,
    }
}

/// Compare names the way a browser's `localeCompare` roughly does: letters
/// compare case-insensitively first, then lowercase sorts before uppercase.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map_or(Ordering::Equal, |(x, _)| {
            if x.is_lowercase() {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        })
}

// =============================================================================
// Pager
// =============================================================================

/// An entry in the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Pager model for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pagination {
    pub has_previous: bool,
    pub has_next: bool,
    pub links: Vec<PageLink>,
}

impl Pagination {
    /// Whether the pager should be hidden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Build the pager for `current` of `total_pages`.
///
/// Shows the first and last pages and the neighbours of `current`, with an
/// ellipsis two pages away. A single page yields an empty pager.
#[must_use]
pub fn pagination_links(current: usize, total_pages: usize) -> Pagination {
    if total_pages <= 1 {
        return Pagination::default();
    }

    let mut links = Vec::new();
    for number in 1..=total_pages {
        let near = number + 1 >= current && number <= current + 1;
        if number == 1 || number == total_pages || near {
            links.push(PageLink::Page {
                number,
                current: number == current,
            });
        } else if number + 2 == current || number == current + 2 {
            links.push(PageLink::Ellipsis);
        }
    }

    Pagination {
        has_previous: current > 1,
        has_next: current < total_pages,
        links,
    }
}
