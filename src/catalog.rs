//! Catalog

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductId, ProductKey};

/// Errors raised while building or querying a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// Two categories share a slug.
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),

    /// The category slug is not part of the catalog.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// A featured product id does not exist.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// A browsable product category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// URL-style key, e.g. `casa-inteligente`
    pub slug: String,

    /// Display name
    pub name: String,

    /// Short description shown on the home page
    pub description: String,

    /// Display asset reference
    pub image: String,

    /// Subcategories in display order
    pub subcategories: Vec<String>,
}

/// Immutable product listing for the store.
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    product_keys: FxHashMap<ProductId, ProductKey>,
    order: Vec<ProductKey>,
    categories: Vec<Category>,
    category_products: FxHashMap<String, Vec<ProductKey>>,
    featured: Vec<ProductKey>,
}

impl Catalog {
    /// Start building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by slug.
    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.slug == slug)
    }

    /// Look up a product by id.
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.product_keys
            .get(id)
            .and_then(|key| self.products.get(*key))
    }

    /// Look up a product by its slot key.
    pub fn product_by_key(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Products of one category, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCategory`] if the slug is not in the catalog.
    pub fn products_in(&self, slug: &str) -> Result<Vec<&Product>, CatalogError> {
        let keys = self
            .category_products
            .get(slug)
            .ok_or_else(|| CatalogError::UnknownCategory(slug.to_string()))?;

        Ok(self.resolve(keys))
    }

    /// Products highlighted on the home page.
    pub fn featured(&self) -> Vec<&Product> {
        self.resolve(&self.featured)
    }

    /// All products, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Case-insensitive search over product name, category and brand.
    ///
    /// A blank term returns the first `limit` products.
    pub fn search(&self, term: &str, limit: usize) -> Vec<&Product> {
        let needle = term.trim().to_lowercase();

        self.iter()
            .filter(|product| {
                needle.is_empty()
                    || product.name.to_lowercase().contains(&needle)
                    || product.category.to_lowercase().contains(&needle)
                    || product.brand.to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn resolve(&self, keys: &[ProductKey]) -> Vec<&Product> {
        keys.iter()
            .filter_map(|key| self.products.get(*key))
            .collect()
    }
}

/// Builder that validates identity constraints before a catalog is frozen.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Register a category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCategory`] if the slug is already registered.
    pub fn category(&mut self, category: Category) -> Result<&mut Self, CatalogError> {
        if self.catalog.category_products.contains_key(&category.slug) {
            return Err(CatalogError::DuplicateCategory(category.slug));
        }

        self.catalog
            .category_products
            .insert(category.slug.clone(), Vec::new());

        self.catalog.categories.push(category);

        Ok(self)
    }

    /// Add a product under a registered category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is unknown or the product id is taken.
    pub fn product(&mut self, slug: &str, product: Product) -> Result<ProductKey, CatalogError> {
        if self.catalog.product_keys.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let id = product.id.clone();

        let keys = self
            .catalog
            .category_products
            .get_mut(slug)
            .ok_or_else(|| CatalogError::UnknownCategory(slug.to_string()))?;

        let key = self.catalog.products.insert(product);

        keys.push(key);
        self.catalog.product_keys.insert(id, key);
        self.catalog.order.push(key);

        Ok(key)
    }

    /// Mark an existing product as featured.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] if no product has the id.
    pub fn feature(&mut self, id: &ProductId) -> Result<&mut Self, CatalogError> {
        let key = self
            .catalog
            .product_keys
            .get(id)
            .copied()
            .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))?;

        self.catalog.featured.push(key);

        Ok(self)
    }

    /// Freeze the catalog.
    pub fn build(self) -> Catalog {
        self.catalog
    }
}
