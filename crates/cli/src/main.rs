//! Click Me CLI - browse the catalog, manage the cart and send the contact form.
//!
//! # Usage
//!
//! ```bash
//! # List laptops under $1,500, cheapest first
//! clickme products --category laptops --max-price 1500 --sort price-low
//!
//! # Show a product with related items and reviews
//! clickme product 2
//!
//! # Manage the cart
//! clickme cart add 2 --quantity 2
//! clickme cart set 2 1
//! clickme cart show
//!
//! # Contact form
//! clickme contact submit --first-name Ada --last-name Lovelace \
//!     --email ada@example.com --subject support --message "Where is my order?"
//! ```
//!
//! State is kept under `CLICKME_DATA_DIR` (default `.clickme`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use click_me_core::ProductId;
use click_me_storefront::config::StorefrontConfig;
use click_me_storefront::{AppError, AppState};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::contact::ContactArgs;
use commands::products::ListArgs;

#[derive(Parser)]
#[command(name = "clickme")]
#[command(author, version, about = "Click Me storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products with search, filters, sorting and paging
    Products(ListArgs),
    /// Show one product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Contact form drafts and submission
    Contact {
        #[command(subcommand)]
        action: ContactAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product already in the cart (minimum 1)
    Set {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
}

#[derive(Subcommand)]
enum ContactAction {
    /// Manage the saved draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
    /// Validate and send the contact form
    Submit(ContactArgs),
}

#[derive(Subcommand)]
enum DraftAction {
    /// Save the given fields as the draft
    Save(ContactArgs),
    /// Show the saved draft if it is still fresh
    Show,
    /// Delete the saved draft
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("click_me_storefront=info,click_me_cli=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if let AppError::Validation(errors) = &e {
            for (field, reason) in errors.iter() {
                tracing::error!(field = %field, "{reason}");
            }
        }
        if e.is_user_error() {
            tracing::warn!("{e}");
        } else {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::open(config)?;

    match cli.command {
        Commands::Products(args) => commands::products::list(&state, &args)?,
        Commands::Product { id } => commands::products::show(&state, id)?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await,
            CartAction::Add { id, quantity } => commands::cart::add(&state, id, quantity).await?,
            CartAction::Remove { id } => commands::cart::remove(&state, id).await?,
            CartAction::Set { id, quantity } => {
                commands::cart::set(&state, id, quantity).await?;
            }
        },
        Commands::Contact { action } => match action {
            ContactAction::Draft { action } => match action {
                DraftAction::Save(args) => commands::contact::save_draft(&state, args)?,
                DraftAction::Show => commands::contact::show_draft(&state),
                DraftAction::Clear => commands::contact::clear_draft(&state)?,
            },
            ContactAction::Submit(args) => commands::contact::submit(&state, args).await?,
        },
    }
    Ok(())
}
