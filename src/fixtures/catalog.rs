//! Catalog Fixtures

use serde::Deserialize;

use crate::{
    catalog::{Catalog, Category},
    fixtures::{FixtureError, products::ProductFixture},
    products::ProductId,
};

/// Wrapper for the catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Categories in display order, each with its products
    pub categories: Vec<CategoryFixture>,

    /// Ids of products highlighted on the home page
    #[serde(default)]
    pub featured: Vec<String>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// URL-style key
    pub slug: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Display asset reference
    #[serde(default)]
    pub image: String,

    /// Subcategories in display order
    #[serde(default)]
    pub subcategories: Vec<String>,

    /// Products listed in this category
    #[serde(default)]
    pub products: Vec<ProductFixture>,
}

impl TryFrom<CatalogFixture> for Catalog {
    type Error = FixtureError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let mut builder = Catalog::builder();

        for category in fixture.categories {
            let slug = category.slug.clone();
            let name = category.name.clone();

            builder.category(Category {
                slug: category.slug,
                name: category.name,
                description: category.description,
                image: category.image,
                subcategories: category.subcategories,
            })?;

            for product in category.products {
                builder.product(&slug, product.into_product(&name)?)?;
            }
        }

        for id in &fixture.featured {
            builder.feature(&ProductId::new(id.as_str()))?;
        }

        Ok(builder.build())
    }
}

/// Parse a catalog document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a product or category is invalid.
pub fn parse(contents: &str) -> Result<Catalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;

    fixture.try_into()
}
