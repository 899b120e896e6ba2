use std::io::Write as _;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use vitrine::{
    listing::{FilterState, PriceRange, SortOption, Subcategory, available_brands, visible_products},
    products::{Product, ProductId},
    receipt,
};
use vitrine_app::config::StoreConfig;

use super::{load_catalog, stdout};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List categories and their subcategories
    Categories,

    /// Products highlighted on the home page
    Featured,

    /// List a category with filters and sorting
    List(ListArgs),

    /// Search by name, category or brand
    Search(SearchArgs),

    /// Show one product
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Category slug, e.g. `hardware`; every product when omitted
    #[arg(long)]
    category: Option<String>,

    /// Subcategory name, or `Todos`
    #[arg(long, default_value = "Todos")]
    subcategory: Subcategory,

    /// Sort order (relevance, price-asc, price-desc, best-selling, best-rated)
    #[arg(long, default_value = "relevance")]
    sort: SortOption,

    /// Only these brands (repeatable)
    #[arg(long = "brand")]
    brands: Vec<String>,

    /// Minimum rating thresholds (repeatable); a product passes if it meets any
    #[arg(long = "min-rating")]
    ratings: Vec<Decimal>,

    /// Lowest price in reais
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest price in reais
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only products in stock
    #[arg(long)]
    in_stock: bool,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Search term
    term: String,

    /// Maximum results
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Product id
    id: String,
}

pub(crate) fn run(config: &StoreConfig, command: ProductsCommand) -> Result<(), String> {
    let catalog = load_catalog(config)?;
    let mut out = stdout();

    match command.command {
        ProductsSubcommand::Categories => {
            for category in catalog.categories() {
                writeln!(
                    out,
                    "{} ({}): {}",
                    category.name,
                    category.slug,
                    category.subcategories.join(", ")
                )
                .map_err(|error| error.to_string())?;
            }

            Ok(())
        }
        ProductsSubcommand::Featured => write_products(&mut out, &catalog.featured()),
        ProductsSubcommand::List(args) => {
            let products: Vec<&Product> = match &args.category {
                Some(slug) => catalog.products_in(slug).map_err(|error| error.to_string())?,
                None => catalog.iter().collect(),
            };

            if let Some(category) = args.category.as_deref().and_then(|slug| catalog.category(slug)) {
                writeln!(out, "{}: {}", category.name, category.description)
                    .map_err(|error| error.to_string())?;
            }

            let filters = build_filters(&args, &products)?;
            let visible = visible_products(products.iter().copied(), &args.subcategory, &filters, args.sort);

            writeln!(
                out,
                "{} de {} produtos | {} | marcas: {}",
                visible.len(),
                products.len(),
                args.sort.label(),
                available_brands(products.iter().copied()).join(", ")
            )
            .map_err(|error| error.to_string())?;

            write_products(&mut out, &visible)
        }
        ProductsSubcommand::Search(args) => {
            write_products(&mut out, &catalog.search(&args.term, args.limit))
        }
        ProductsSubcommand::Show(args) => {
            let id = ProductId::new(args.id);
            let product = catalog
                .product(&id)
                .ok_or_else(|| format!("product not found: {id}"))?;

            receipt::write_product(&mut out, product).map_err(|error| error.to_string())
        }
    }
}

fn build_filters(args: &ListArgs, products: &[&Product]) -> Result<FilterState, String> {
    let mut filters = FilterState::for_products(products.iter().copied());

    if args.min_price.is_some() || args.max_price.is_some() {
        let range = PriceRange::new(
            args.min_price.unwrap_or(Decimal::ZERO),
            args.max_price.unwrap_or_else(|| filters.price_range.max()),
        )
        .map_err(|error| error.to_string())?;

        filters = filters.with_price_range(range);
    }

    for brand in &args.brands {
        filters = filters.with_brand(brand.clone());
    }

    for rating in &args.ratings {
        filters = filters.with_rating(*rating);
    }

    if args.in_stock {
        filters = filters.in_stock_only();
    }

    Ok(filters)
}

fn write_products(out: &mut impl std::io::Write, products: &[&Product]) -> Result<(), String> {
    receipt::write_products(out, products).map_err(|error| error.to_string())
}
