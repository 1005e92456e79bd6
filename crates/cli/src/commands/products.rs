//! Product listing and detail commands.

use clap::Args;
use click_me_core::{Category, ProductId};
use click_me_storefront::catalog::{Product, RELATED_LIMIT};
use click_me_storefront::query::{
    FilterSpec, PageLink, PageRequest, SortKey, pagination_links, query,
};
use click_me_storefront::reviews::{ReviewBoard, StarRating};
use click_me_storefront::{AppError, AppState};
use rust_decimal::Decimal;
use tracing::info;

/// Listing options, mirroring the shop page controls.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Match against name and description
    #[arg(short, long, default_value = "")]
    search: String,

    /// laptops, smartphones, tablets or accessories
    #[arg(short, long)]
    category: Option<String>,

    /// Lowest price to include
    #[arg(long)]
    min_price: Option<String>,

    /// Highest price to include
    #[arg(long)]
    max_price: Option<String>,

    /// name, price-low, price-high or rating
    #[arg(long, default_value = "name")]
    sort: String,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,
}

impl ListArgs {
    fn filter(&self) -> Result<FilterSpec, AppError> {
        let category = self
            .category
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(str::parse::<Category>)
            .transpose()?;

        Ok(FilterSpec {
            search: self.search.clone(),
            category,
            min_price: self.min_price.as_deref().and_then(FilterSpec::parse_price_bound),
            max_price: self.max_price.as_deref().and_then(FilterSpec::parse_price_bound),
            sort: SortKey::parse_or_default(&self.sort),
        })
    }
}

/// List one page of products.
///
/// # Errors
///
/// Returns an error for an unknown category. A page outside the results is
/// clamped to the nearest one.
pub fn list(state: &AppState, args: &ListArgs) -> Result<(), AppError> {
    let filter = args.filter()?;
    let page = query(state.catalog(), &filter, PageRequest::page(args.page));

    if page.total_count == 0 {
        info!("No products found. Try adjusting your filters.");
        return Ok(());
    }

    info!(
        total = page.total_count,
        "Page {} of {} (sorted by {})",
        page.page,
        page.total_pages,
        filter.sort.as_str()
    );
    for product in &page.items {
        log_summary(product);
    }

    let pager = pagination_links(page.page, page.total_pages);
    if !pager.is_empty() {
        let links: Vec<String> = pager
            .links
            .iter()
            .map(|link| match link {
                PageLink::Page {
                    number,
                    current: true,
                } => format!("[{number}]"),
                PageLink::Page { number, .. } => number.to_string(),
                PageLink::Ellipsis => "…".to_string(),
            })
            .collect();
        info!("Pages: {}", links.join(" "));
    }

    Ok(())
}

/// Show product details, related products and reviews.
///
/// # Errors
///
/// Returns `AppError::ProductNotFound` for an unknown id.
pub fn show(state: &AppState, id: ProductId) -> Result<(), AppError> {
    let catalog = state.catalog();
    let product = catalog
        .find_by_id(id)
        .ok_or(AppError::ProductNotFound(id))?;

    info!(
        id = %product.id,
        category = %product.category.label(),
        in_stock = product.in_stock,
        "{}",
        product.name
    );
    info!("{}", product.description);

    let stars = StarRating::from_rating(product.rating);
    info!(
        "{} {} ({} reviews)",
        stars.render(),
        product.rating,
        product.review_count
    );

    let savings = product.savings();
    if savings > Decimal::ZERO {
        info!(
            "{} (was {}, save {})",
            product.price_tag(),
            product.original_price_tag(),
            click_me_core::Price::usd(savings)
        );
    } else {
        info!("{}", product.price_tag());
    }

    for feature in &product.features {
        info!("  - {feature}");
    }

    let related = catalog.related(product, RELATED_LIMIT);
    if !related.is_empty() {
        info!("Related products:");
        for other in related {
            log_summary(other);
        }
    }

    let board = ReviewBoard::sample();
    info!(count = board.len(), "Customer reviews");
    for review in board.reviews() {
        info!(
            "{} {} on {}: {}",
            StarRating::from_rating(Decimal::from(review.rating)).render(),
            review.name,
            review.date,
            review.text
        );
    }

    Ok(())
}

fn log_summary(product: &Product) {
    info!(
        id = %product.id,
        rating = %product.rating,
        in_stock = product.in_stock,
        "{} - {}",
        product.name,
        product.price_tag()
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(page: usize) -> ListArgs {
        ListArgs {
            search: String::new(),
            category: None,
            min_price: None,
            max_price: None,
            sort: "name".to_string(),
            page,
        }
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let state = AppState::in_memory();
        assert!(list(&state, &args(9)).is_ok());
        assert!(list(&state, &args(0)).is_ok());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let state = AppState::in_memory();
        let bad = ListArgs {
            category: Some("furniture".to_string()),
            ..args(1)
        };
        assert!(matches!(list(&state, &bad), Err(AppError::Category(_))));
    }
}
