//! Vitrine
//!
//! Vitrine is the domain core of an electronics storefront: a product catalog with
//! category listings and filters, a persistent shopping cart, checkout with card and
//! PIX payments, order history with delivery tracking, and customer support content.
//!
//! Money is kept in Brazilian reais. Everything here is synchronous and free of IO
//! apart from loading fixtures; waiting, persistence and address lookups live in the
//! application crate.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod fixtures;
pub mod listing;
pub mod orders;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod support;
