//! Shop route handlers.
//!
//! The shop page renders the category tree and the first grid page; further
//! pages are HTMX fragments keyed by `last_id` (keyset pagination, newest
//! first), appended by an infinite-scroll sentinel. Search is a separate
//! fragment endpoint hit per keystroke.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::instrument;

use aerovane_core::CategoryId;

use crate::commerce::types::{
    CategoryNode, SearchItem, ShopProduct, ShopQuery as ShopProductsQuery,
};
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Product card display data for grid templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub image: Option<String>,
}

impl From<&ShopProduct> for ProductCardView {
    fn from(product: &ShopProduct) -> Self {
        // A discount price replaces the list price, which becomes the
        // struck-through comparison
        let (price, compare_at_price) = match (product.discount_price, product.price) {
            (Some(discount), Some(list)) => {
                (discount.display_inr(), Some(list.display_inr()))
            }
            (Some(discount), None) => (discount.display_inr(), None),
            (None, Some(list)) => (list.display_inr(), None),
            (None, None) => ("Price on request".to_string(), None),
        };

        Self {
            id: product.id.get(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            category: product
                .sub_category_name
                .clone()
                .unwrap_or_else(|| product.category_name.clone()),
            price,
            compare_at_price,
            image: product.primary_image.clone(),
        }
    }
}

/// Category display data for the sidebar.
#[derive(Clone)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
    pub sub_categories: Vec<SubCategoryView>,
}

/// Sub-category link in the sidebar.
#[derive(Clone)]
pub struct SubCategoryView {
    pub id: i64,
    pub name: String,
}

impl From<&CategoryNode> for CategoryView {
    fn from(node: &CategoryNode) -> Self {
        Self {
            id: node.id.get(),
            name: node.name.clone(),
            sub_categories: node
                .sub_categories
                .iter()
                .map(|sub| SubCategoryView {
                    id: sub.id.get(),
                    name: sub.name.clone(),
                })
                .collect(),
        }
    }
}

/// One grid page plus the state the sentinel needs to request the next one.
#[derive(Clone)]
pub struct GridView {
    pub items: Vec<ProductCardView>,
    pub last_id: Option<i64>,
    pub has_more: bool,
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
}

impl GridView {
    /// Query string for the next page fragment.
    #[must_use]
    pub fn next_page_query(&self) -> String {
        let mut parts = Vec::new();
        if let Some(id) = self.category_id {
            parts.push(format!("category_id={id}"));
        }
        if let Some(id) = self.sub_category_id {
            parts.push(format!("sub_category_id={id}"));
        }
        if let Some(cursor) = self.last_id {
            parts.push(format!("last_id={cursor}"));
        }
        parts.join("&")
    }
}

/// Search result row display data.
#[derive(Clone)]
pub struct SearchResultView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&SearchItem> for SearchResultView {
    fn from(item: &SearchItem) -> Self {
        Self {
            id: item.id.get(),
            name: item.name.clone(),
            price: item.price.display_inr(),
            image: item.primary_image.clone(),
        }
    }
}

// =============================================================================
// Query Types
// =============================================================================

/// Filter and cursor query parameters for the shop grid.
#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub last_id: Option<i64>,
}

impl GridQuery {
    fn to_shop_query(&self) -> ShopProductsQuery {
        ShopProductsQuery {
            category_id: self.category_id.map(CategoryId::new),
            sub_category_id: self.sub_category_id.map(CategoryId::new),
            last_id: self.last_id,
            limit: None,
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub cursor: Option<i64>,
}

// =============================================================================
// Templates
// =============================================================================

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub categories: Vec<CategoryView>,
    pub grid: GridView,
}

/// Product grid fragment template (for HTMX infinite scroll).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: GridView,
}

/// Search results fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub results: Vec<SearchResultView>,
    pub query: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the shop page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> impl IntoResponse {
    let categories = state.commerce().get_category_tree().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch category tree: {e}");
            Vec::new()
        },
        |tree| tree.iter().map(CategoryView::from).collect(),
    );

    let grid = fetch_grid(&state, &query).await;

    ShopTemplate { categories, grid }
}

/// Next grid page (HTMX fragment).
#[instrument(skip(state))]
pub async fn products_fragment(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> impl IntoResponse {
    let grid = fetch_grid(&state, &query).await;
    ProductGridTemplate { grid }
}

/// Search results fragment (HTMX).
#[instrument(skip(state))]
pub async fn search_fragment(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let term = query.q.trim();
    if term.is_empty() {
        return SearchResultsTemplate {
            results: Vec::new(),
            query: String::new(),
        };
    }

    let results = state
        .commerce()
        .search_products(term, query.cursor, None)
        .await
        .map_or_else(
            |e| {
                tracing::warn!("Product search failed: {e}");
                Vec::new()
            },
            |page| page.items.iter().map(SearchResultView::from).collect(),
        );

    SearchResultsTemplate {
        results,
        query: term.to_string(),
    }
}

/// Fetch one grid page, folding failures into an empty page.
async fn fetch_grid(state: &AppState, query: &GridQuery) -> GridView {
    match state.commerce().get_shop_products(query.to_shop_query()).await {
        Ok(page) => GridView {
            items: page.items.iter().map(ProductCardView::from).collect(),
            last_id: page.last_id,
            has_more: page.has_more,
            category_id: query.category_id,
            sub_category_id: query.sub_category_id,
        },
        Err(e) => {
            tracing::error!("Failed to fetch shop products: {e}");
            GridView {
                items: Vec::new(),
                last_id: None,
                has_more: false,
                category_id: query.category_id,
                sub_category_id: query.sub_category_id,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aerovane_core::ProductId;

    fn shop_product() -> ShopProduct {
        ShopProduct {
            id: ProductId::new(7),
            name: "AV-220 Surveyor".to_string(),
            slug: "av-220-surveyor".to_string(),
            sku: "AV220".to_string(),
            category_id: CategoryId::new(1),
            category_name: "Drones".to_string(),
            sub_category_id: Some(CategoryId::new(9)),
            sub_category_name: Some("Mapping".to_string()),
            brand: Some("Aerovane".to_string()),
            price: Some("59999".parse().unwrap()),
            discount_price: Some("52499".parse().unwrap()),
            primary_image: Some("/media/products/av220.jpg".to_string()),
        }
    }

    #[test]
    fn test_product_card_discount_display() {
        let card = ProductCardView::from(&shop_product());
        assert_eq!(card.price, "₹52,499.00");
        assert_eq!(card.compare_at_price.as_deref(), Some("₹59,999.00"));
        assert_eq!(card.category, "Mapping");
    }

    #[test]
    fn test_product_card_without_pricing() {
        let mut product = shop_product();
        product.price = None;
        product.discount_price = None;
        product.sub_category_name = None;

        let card = ProductCardView::from(&product);
        assert_eq!(card.price, "Price on request");
        assert!(card.compare_at_price.is_none());
        assert_eq!(card.category, "Drones");
    }

    #[test]
    fn test_next_page_query_includes_filters_and_cursor() {
        let grid = GridView {
            items: Vec::new(),
            last_id: Some(88),
            has_more: true,
            category_id: Some(2),
            sub_category_id: None,
        };
        assert_eq!(grid.next_page_query(), "category_id=2&last_id=88");
    }

    #[test]
    fn test_next_page_query_empty_without_state() {
        let grid = GridView {
            items: Vec::new(),
            last_id: None,
            has_more: false,
            category_id: None,
            sub_category_id: None,
        };
        assert_eq!(grid.next_page_query(), "");
    }
}
