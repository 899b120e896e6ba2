//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{BRL, Currency},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductId},
};

const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Subcategory within the enclosing category
    pub subcategory: String,

    /// Brand name
    pub brand: String,

    /// Selling price (e.g., "299.00 BRL")
    pub price: String,

    /// Price before discount
    #[serde(default)]
    pub original_price: Option<String>,

    /// Average rating (e.g., "4.8")
    pub rating: String,

    /// Number of reviews
    #[serde(default)]
    pub reviews: u32,

    /// Whether the product can be shipped
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,

    /// Display asset reference
    pub image: String,

    /// Optional merchandising label
    #[serde(default)]
    pub badge: Option<String>,
}

fn in_stock_default() -> bool {
    true
}

impl ProductFixture {
    /// Convert into a product listed under the given category display name.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or the rating is malformed, or if the
    /// original price is below the selling price.
    pub fn into_product(self, category: &str) -> Result<Product, FixtureError> {
        let id = ProductId::new(self.id);
        let price = parse_money(&self.price)?;

        let original_price = self
            .original_price
            .as_deref()
            .map(parse_money)
            .transpose()?;

        if original_price
            .as_ref()
            .is_some_and(|original| original.to_minor_units() < price.to_minor_units())
        {
            return Err(FixtureError::OriginalBelowPrice(id));
        }

        Ok(Product {
            id,
            name: self.name,
            category: category.to_string(),
            subcategory: self.subcategory,
            brand: self.brand,
            price,
            original_price,
            rating: parse_rating(&self.rating)?,
            reviews: self.reviews,
            in_stock: self.in_stock,
            image: self.image,
            badge: self.badge,
        })
    }
}

/// Parse price string (e.g., "299.00 BRL") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not the store currency.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .filter(|value| *value >= 0)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "BRL" => BRL,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse a price string into money.
///
/// # Errors
///
/// See [`parse_price`].
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse a rating between 0 and 5 (e.g., "4.8").
///
/// # Errors
///
/// Returns [`FixtureError::InvalidRating`] if the value is not a decimal in range.
pub fn parse_rating(s: &str) -> Result<Decimal, FixtureError> {
    s.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|rating| (Decimal::ZERO..=MAX_RATING).contains(rating))
        .ok_or_else(|| FixtureError::InvalidRating(s.to_string()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn fixture(price: &str, original: Option<&str>, rating: &str) -> ProductFixture {
        ProductFixture {
            id: "1".to_string(),
            name: "Teclado Mecânico RGB Gamer".to_string(),
            subcategory: "Teclados".to_string(),
            brand: "Redragon".to_string(),
            price: price.to_string(),
            original_price: original.map(str::to_string),
            rating: rating.to_string(),
            reviews: 234,
            in_stock: true,
            image: "/images/teclado-mecanico-rgb.png".to_string(),
            badge: Some("Mais Vendido".to_string()),
        }
    }

    #[test]
    fn parse_price_reads_brl_minor_units() -> TestResult {
        let (minor, currency) = parse_price("1299.00 BRL")?;

        assert_eq!(minor, 1299_00);
        assert_eq!(currency, BRL);
        assert_eq!(parse_price("29.9 BRL")?.0, 29_90);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        assert!(matches!(parse_price("299BRL"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("abc BRL"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("-1.00 BRL"), Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_other_currencies() {
        let result = parse_price("2.99 GBP");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "GBP"));
    }

    #[test]
    fn parse_rating_bounds() -> TestResult {
        assert_eq!(parse_rating("4.8")?, Decimal::new(48, 1));
        assert_eq!(parse_rating("5")?, Decimal::new(5, 0));
        assert!(matches!(parse_rating("5.1"), Err(FixtureError::InvalidRating(_))));
        assert!(matches!(parse_rating("-0.5"), Err(FixtureError::InvalidRating(_))));

        Ok(())
    }

    #[test]
    fn converts_into_product_under_category() -> TestResult {
        let product = fixture("299.00 BRL", Some("399.00 BRL"), "4.8").into_product("Hardware")?;

        assert_eq!(product.category, "Hardware");
        assert_eq!(product.price.to_minor_units(), 299_00);
        assert_eq!(product.original_price.map(|p| p.to_minor_units()), Some(399_00));
        assert_eq!(product.discount_percent(), Some(25));

        Ok(())
    }

    #[test]
    fn original_price_below_price_is_rejected() {
        let result = fixture("299.00 BRL", Some("199.00 BRL"), "4.8").into_product("Hardware");

        assert!(matches!(result, Err(FixtureError::OriginalBelowPrice(id)) if id.as_str() == "1"));
    }
}
