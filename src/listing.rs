//! Listing
//!
//! Filtering and sorting of a category's products for display. Everything here is pure:
//! identical inputs always produce the identical ordered output.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::products::Product;

/// Errors from parsing or building listing parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ListingError {
    /// Lower price bound above the upper bound.
    #[error("price range minimum {min} is above maximum {max}")]
    InvertedPriceRange {
        /// Lower bound
        min: Decimal,
        /// Upper bound
        max: Decimal,
    },

    /// Unrecognised sort option.
    #[error("unknown sort option: {0}")]
    UnknownSort(String),
}

/// Inclusive price bounds, in reais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::InvertedPriceRange`] when `min > max`.
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, ListingError> {
        if min > max {
            return Err(ListingError::InvertedPriceRange { min, max });
        }

        Ok(Self { min, max })
    }

    /// Range from zero up to `max`, clamping negative bounds to zero.
    pub fn up_to(max: Decimal) -> Self {
        Self {
            min: Decimal::ZERO,
            max: max.max(Decimal::ZERO),
        }
    }

    /// Lower bound.
    pub fn min(&self) -> Decimal {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> Decimal {
        self.max
    }

    /// Whether `price` lies within the bounds, inclusive.
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Page-local filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Allowed price range
    pub price_range: PriceRange,

    /// Selected brands; empty means any brand
    pub brands: FxHashSet<String>,

    /// Selected minimum-rating thresholds; empty means any rating
    pub ratings: SmallVec<[Decimal; 5]>,

    /// Restrict to products in stock
    pub in_stock: bool,
}

impl FilterState {
    /// No restrictions beyond a `0..=max_price` range.
    pub fn unrestricted(max_price: Decimal) -> Self {
        Self {
            price_range: PriceRange::up_to(max_price),
            brands: FxHashSet::default(),
            ratings: SmallVec::new(),
            in_stock: false,
        }
    }

    /// Default filters for a page showing `products`: the full price range, nothing else.
    pub fn for_products<'p>(products: impl IntoIterator<Item = &'p Product>) -> Self {
        Self::unrestricted(max_price(products))
    }

    /// Replace the price range.
    #[must_use]
    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = range;
        self
    }

    /// Add a brand to the selection.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    /// Add a minimum-rating threshold.
    #[must_use]
    pub fn with_rating(mut self, threshold: Decimal) -> Self {
        self.toggle_rating(threshold, true);
        self
    }

    /// Restrict to in-stock products.
    #[must_use]
    pub fn in_stock_only(mut self) -> Self {
        self.in_stock = true;
        self
    }

    /// Check or uncheck a brand.
    pub fn toggle_brand(&mut self, brand: &str, checked: bool) {
        if checked {
            self.brands.insert(brand.to_string());
        } else {
            self.brands.remove(brand);
        }
    }

    /// Check or uncheck a rating threshold.
    pub fn toggle_rating(&mut self, threshold: Decimal, checked: bool) {
        if checked {
            if !self.ratings.contains(&threshold) {
                self.ratings.push(threshold);
            }
        } else {
            self.ratings.retain(|rating| *rating != threshold);
        }
    }

    /// Whether a product passes every filter (subcategory aside).
    pub fn accepts(&self, product: &Product) -> bool {
        self.price_range.contains(product.price_amount())
            && (self.brands.is_empty() || self.brands.contains(&product.brand))
            && (self.ratings.is_empty()
                || self.ratings.iter().any(|threshold| product.rating >= *threshold))
            && (!self.in_stock || product.in_stock)
    }
}

/// Subcategory selection on a category page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Subcategory {
    /// Every subcategory ("Todos")
    #[default]
    All,

    /// Only the named subcategory
    Named(String),
}

impl Subcategory {
    /// Whether a product belongs to the selection.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => product.subcategory == *name,
        }
    }
}

impl FromStr for Subcategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "All" | "all" | "Todos" | "todos" => Ok(Self::All),
            name => Ok(Self::Named(name.to_string())),
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order
    #[default]
    Relevance,

    /// Cheapest first
    PriceAsc,

    /// Most expensive first
    PriceDesc,

    /// Most reviewed first
    BestSelling,

    /// Highest rated first
    BestRated,
}

impl SortOption {
    /// Every option, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Relevance,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::BestSelling,
        Self::BestRated,
    ];

    /// Canonical key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::BestSelling => "best-selling",
            Self::BestRated => "best-rated",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Mais Relevantes",
            Self::PriceAsc => "Menor Preço",
            Self::PriceDesc => "Maior Preço",
            Self::BestSelling => "Mais Vendidos",
            Self::BestRated => "Melhor Avaliação",
        }
    }

    fn sort(self, products: &mut [&Product]) {
        // `sort_by` is stable, so ties keep catalog order.
        match self {
            Self::Relevance => {}
            Self::PriceAsc => products.sort_by_key(|p| p.price.to_minor_units()),
            Self::PriceDesc => {
                products.sort_by(|a, b| b.price.to_minor_units().cmp(&a.price.to_minor_units()));
            }
            Self::BestSelling => products.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
            Self::BestRated => products.sort_by(|a, b| b.rating.cmp(&a.rating)),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortOption {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "relevance" | "relevancia" => Ok(Self::Relevance),
            "price-asc" | "menor-preco" => Ok(Self::PriceAsc),
            "price-desc" | "maior-preco" => Ok(Self::PriceDesc),
            "best-selling" | "mais-vendidos" => Ok(Self::BestSelling),
            "best-rated" | "melhor-avaliacao" => Ok(Self::BestRated),
            other => Err(ListingError::UnknownSort(other.to_string())),
        }
    }
}

/// Products visible on a category page for the given selection.
pub fn visible_products<'p>(
    products: impl IntoIterator<Item = &'p Product>,
    subcategory: &Subcategory,
    filters: &FilterState,
    sort: SortOption,
) -> Vec<&'p Product> {
    let mut visible: Vec<&Product> = products
        .into_iter()
        .filter(|product| subcategory.matches(product) && filters.accepts(product))
        .collect();

    sort.sort(&mut visible);

    visible
}

/// Distinct brands, in the order they first appear.
pub fn available_brands<'p>(products: impl IntoIterator<Item = &'p Product>) -> Vec<&'p str> {
    let mut seen = FxHashSet::default();

    products
        .into_iter()
        .map(|product| product.brand.as_str())
        .filter(|brand| seen.insert(*brand))
        .collect()
}

/// Highest selling price, in reais; zero for no products.
pub fn max_price<'p>(products: impl IntoIterator<Item = &'p Product>) -> Decimal {
    products
        .into_iter()
        .map(Product::price_amount)
        .max()
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{pricing::brl, products::ProductId};

    use super::*;

    fn product(
        id: &str,
        subcategory: &str,
        brand: &str,
        price: i64,
        rating: i64,
        reviews: u32,
        in_stock: bool,
    ) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Produto {id}"),
            category: "Casa Inteligente".to_string(),
            subcategory: subcategory.to_string(),
            brand: brand.to_string(),
            price: brl(price),
            original_price: None,
            rating: Decimal::new(rating, 1),
            reviews,
            in_stock,
            image: String::new(),
            badge: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Assistentes", "Amazon", 379_00, 47, 890, true),
            product("2", "Iluminação", "Philips", 159_00, 45, 120, true),
            product("3", "Iluminação", "Positivo", 89_90, 42, 310, true),
            product("4", "Segurança", "Intelbras", 180_00, 48, 75, false),
            product("5", "Sensores", "Positivo", 89_90, 40, 310, true),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn unrestricted_relevance_keeps_catalog_order() {
        let products = catalog();
        let filters = FilterState::for_products(&products);

        let visible = visible_products(&products, &Subcategory::All, &filters, SortOption::Relevance);

        assert_eq!(ids(&visible), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn rating_and_stock_filters_keep_only_matching_product() -> TestResult {
        let products = vec![
            product("a", "Iluminação", "Philips", 159_00, 45, 10, true),
            product("b", "Segurança", "Intelbras", 180_00, 48, 10, false),
        ];

        let filters = FilterState::unrestricted(Decimal::new(200, 0))
            .with_price_range(PriceRange::new(Decimal::ZERO, Decimal::new(200, 0))?)
            .with_rating(Decimal::new(4, 0))
            .in_stock_only();

        let visible = visible_products(&products, &Subcategory::All, &filters, SortOption::Relevance);

        assert_eq!(ids(&visible), ["a"]);

        Ok(())
    }

    #[test]
    fn subcategory_and_brand_filters_combine() {
        let products = catalog();
        let filters = FilterState::for_products(&products).with_brand("Positivo");

        let visible = visible_products(
            &products,
            &Subcategory::Named("Iluminação".to_string()),
            &filters,
            SortOption::Relevance,
        );

        assert_eq!(ids(&visible), ["3"]);
    }

    #[test]
    fn any_rating_threshold_is_enough() {
        let products = catalog();
        let filters = FilterState::for_products(&products)
            .with_rating(Decimal::new(48, 1))
            .with_rating(Decimal::new(47, 1));

        let visible = visible_products(&products, &Subcategory::All, &filters, SortOption::Relevance);

        assert_eq!(ids(&visible), ["1", "4"]);
    }

    #[test]
    fn price_bounds_are_inclusive() -> TestResult {
        let products = catalog();
        let filters = FilterState::for_products(&products)
            .with_price_range(PriceRange::new(Decimal::new(8990, 2), Decimal::new(159, 0))?);

        let visible = visible_products(&products, &Subcategory::All, &filters, SortOption::Relevance);

        assert_eq!(ids(&visible), ["2", "3", "5"]);

        Ok(())
    }

    #[test]
    fn price_sorts_are_stable() {
        let products = catalog();
        let filters = FilterState::for_products(&products);

        let asc = visible_products(&products, &Subcategory::All, &filters, SortOption::PriceAsc);
        let desc = visible_products(&products, &Subcategory::All, &filters, SortOption::PriceDesc);

        assert_eq!(ids(&asc), ["3", "5", "2", "4", "1"]);
        assert_eq!(ids(&desc), ["1", "4", "2", "3", "5"]);
    }

    #[test]
    fn price_sorts_reverse_each_other_for_distinct_prices() {
        let products: Vec<Product> = catalog().into_iter().filter(|p| p.id.as_str() != "5").collect();
        let filters = FilterState::for_products(&products);

        let asc = visible_products(&products, &Subcategory::All, &filters, SortOption::PriceAsc);
        let mut desc = visible_products(&products, &Subcategory::All, &filters, SortOption::PriceDesc);

        desc.reverse();

        assert_eq!(ids(&asc), ids(&desc));
    }

    #[test]
    fn best_selling_and_best_rated_sort_descending() {
        let products = catalog();
        let filters = FilterState::for_products(&products);

        let selling = visible_products(&products, &Subcategory::All, &filters, SortOption::BestSelling);
        let rated = visible_products(&products, &Subcategory::All, &filters, SortOption::BestRated);

        assert_eq!(ids(&selling), ["1", "3", "5", "2", "4"]);
        assert_eq!(ids(&rated), ["4", "1", "2", "3", "5"]);
    }

    #[test]
    fn visible_products_is_idempotent() {
        let products = catalog();
        let filters = FilterState::for_products(&products).with_rating(Decimal::new(4, 0));

        let first = visible_products(&products, &Subcategory::All, &filters, SortOption::BestRated);
        let second = visible_products(&products, &Subcategory::All, &filters, SortOption::BestRated);

        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn empty_result_is_not_an_error() -> TestResult {
        let products = catalog();
        let filters = FilterState::for_products(&products)
            .with_price_range(PriceRange::new(Decimal::new(5000, 0), Decimal::new(6000, 0))?);

        assert!(visible_products(&products, &Subcategory::All, &filters, SortOption::PriceAsc).is_empty());

        Ok(())
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let result = PriceRange::new(Decimal::new(10, 0), Decimal::new(5, 0));

        assert!(matches!(result, Err(ListingError::InvertedPriceRange { .. })));
    }

    #[test]
    fn toggles_add_and_remove_selections() {
        let mut filters = FilterState::unrestricted(Decimal::new(100, 0));

        filters.toggle_brand("Philips", true);
        filters.toggle_rating(Decimal::new(4, 0), true);
        filters.toggle_rating(Decimal::new(4, 0), true);

        assert!(filters.brands.contains("Philips"));
        assert_eq!(filters.ratings.len(), 1);

        filters.toggle_brand("Philips", false);
        filters.toggle_rating(Decimal::new(4, 0), false);

        assert!(filters.brands.is_empty());
        assert!(filters.ratings.is_empty());
    }

    #[test]
    fn brands_are_deduplicated_in_first_seen_order() {
        let products = catalog();

        assert_eq!(
            available_brands(&products),
            ["Amazon", "Philips", "Positivo", "Intelbras"]
        );
    }

    #[test]
    fn max_price_of_empty_listing_is_zero() {
        let products: Vec<Product> = Vec::new();

        assert_eq!(max_price(&products), Decimal::ZERO);
        assert_eq!(max_price(&catalog()), Decimal::new(37900, 2));
    }

    #[test]
    fn sort_option_parses_keys_and_aliases() -> TestResult {
        assert_eq!("price-asc".parse::<SortOption>()?, SortOption::PriceAsc);
        assert_eq!("melhor-avaliacao".parse::<SortOption>()?, SortOption::BestRated);
        assert!(matches!("cheapest".parse::<SortOption>(), Err(ListingError::UnknownSort(_))));
        assert_eq!(SortOption::BestSelling.to_string(), "best-selling");

        Ok(())
    }

    #[test]
    fn subcategory_parses_all_aliases() -> TestResult {
        assert_eq!("Todos".parse::<Subcategory>()?, Subcategory::All);
        assert_eq!(
            "Sensores".parse::<Subcategory>()?,
            Subcategory::Named("Sensores".to_string())
        );

        Ok(())
    }
}
