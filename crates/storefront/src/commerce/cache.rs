//! Cached catalog response values.

use super::types::{CategoryNode, ProductDetail, ShopScroll};

/// Values stored in the catalog response cache.
///
/// Boxed where the payload is large so cache entries stay small.
#[derive(Clone)]
pub enum CacheValue {
    /// A single product detail.
    Product(Box<ProductDetail>),
    /// The full category tree.
    CategoryTree(Vec<CategoryNode>),
    /// One page of the shop grid.
    Shop(Box<ShopScroll>),
}
