//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives at the commerce API keyed by user ID; the storefront
//! re-fetches it after every mutation and re-renders the fragment. Anonymous
//! visitors are prompted to log in, matching the API's login-gated cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aerovane_core::{Amount, CartItemId, ProductId};

use crate::commerce::types::{CartItemCreate, CartItemUpdate, CartList};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image: Option<String>,
    pub low_stock: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Amount::ZERO.display_inr(),
            item_count: 0,
        }
    }
}

impl From<&CartList> for CartView {
    fn from(cart: &CartList) -> Self {
        // Count and subtotal are recomputed from the lines, the same way the
        // API computes them; inactive (saved-for-later) lines don't count
        let active = || cart.items.iter().filter(|item| item.is_active);

        let item_count = active().map(|item| item.quantity).sum();
        let subtotal = active()
            .map(|item| item.total_price)
            .try_fold(Amount::ZERO, Amount::checked_add)
            .unwrap_or(Amount::ZERO);

        Self {
            items: active().map(CartItemView::from).collect(),
            subtotal: subtotal.display_inr(),
            item_count,
        }
    }
}

impl From<&crate::commerce::types::CartItem> for CartItemView {
    fn from(item: &crate::commerce::types::CartItem) -> Self {
        Self {
            id: item.id.get(),
            product_id: item.product.product_id.get(),
            name: item.product.name.clone(),
            category: item.product.category_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.display_inr(),
            line_price: item.total_price.display_inr(),
            image: item.product.primary_image.clone(),
            low_stock: item
                .product
                .stock_quantity
                .is_some_and(|stock| stock < i64::from(item.quantity)),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
    pub unit_price: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: i64,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: i64,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Login prompt fragment, shown when an anonymous visitor hits add-to-cart.
#[derive(Template, WebTemplate)]
#[template(path = "partials/login_prompt.html")]
pub struct LoginPromptTemplate;

/// Add-to-cart confirmation fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/added_to_cart.html")]
pub struct AddedToCartTemplate;

/// Inline cart error fragment (for HTMX).
///
/// Returned with a 200 so HTMX swaps it into the feedback slot; the failure
/// is the message itself, not a transport error.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_error.html")]
pub struct CartErrorTemplate {
    pub message: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Fetch the user's cart, folding failures into an empty view.
async fn fetch_cart(state: &AppState, user: &CurrentUser) -> CartView {
    match state
        .commerce()
        .get_cart(&user.access_token, user.user_id)
        .await
    {
        Ok(cart) => CartView::from(&cart),
        Err(e) => {
            tracing::warn!("Failed to fetch cart for user {}: {e}", user.user_id);
            CartView::empty()
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, user))]
pub async fn show(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> Response {
    let cart = fetch_cart(&state, &user).await;
    CartShowTemplate { cart }.into_response()
}

/// Add item to cart (HTMX).
///
/// Returns the refreshed count badge plus an HTMX trigger so other fragments
/// (the cart page, if open) can refresh themselves. Anonymous visitors get a
/// login prompt instead.
#[instrument(skip(state, auth, form))]
pub async fn add(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let Some(user) = auth else {
        return LoginPromptTemplate.into_response();
    };

    let Ok(unit_price) = form.unit_price.parse::<Amount>() else {
        return CartErrorTemplate {
            message: "This product cannot be added to the cart right now.".to_string(),
        }
        .into_response();
    };

    let item = CartItemCreate {
        user_id: user.user_id,
        product_id: ProductId::new(form.product_id),
        quantity: form.quantity.unwrap_or(1),
        unit_price,
        session_id: None,
    };

    if let Err(e) = state.commerce().add_cart_item(&user.access_token, &item).await {
        tracing::warn!("Failed to add item to cart: {e}");
        return CartErrorTemplate {
            message: e.user_message(),
        }
        .into_response();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        AddedToCartTemplate,
    )
        .into_response()
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, user, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let update = CartItemUpdate {
        quantity: Some(form.quantity),
        is_active: None,
    };

    if let Err(e) = state
        .commerce()
        .update_cart_item(&user.access_token, CartItemId::new(form.item_id), &update)
        .await
    {
        tracing::warn!("Failed to update cart item {}: {e}", form.item_id);
    }

    let cart = fetch_cart(&state, &user).await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, user, form))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    if let Err(e) = state
        .commerce()
        .delete_cart_item(&user.access_token, CartItemId::new(form.item_id))
        .await
    {
        tracing::warn!("Failed to remove cart item {}: {e}", form.item_id);
    }

    let cart = fetch_cart(&state, &user).await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(state, user))]
pub async fn clear(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> Response {
    if let Err(e) = state
        .commerce()
        .clear_cart(&user.access_token, user.user_id)
        .await
    {
        tracing::warn!("Failed to clear cart for user {}: {e}", user.user_id);
    }

    let cart = fetch_cart(&state, &user).await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, auth))]
pub async fn count(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
) -> impl IntoResponse {
    let count = match auth {
        Some(user) => fetch_cart(&state, &user).await.item_count,
        None => 0,
    };

    CartCountTemplate { count }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commerce::types::{CartItem, CartProductInfo};

    fn cart_item(id: i64, quantity: u32, total: &str, is_active: bool) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            quantity,
            unit_price: "52499".parse().unwrap(),
            total_price: total.parse().unwrap(),
            is_active,
            product: CartProductInfo {
                product_id: ProductId::new(7),
                name: "AV-220 Surveyor".to_string(),
                slug: "av-220-surveyor".to_string(),
                category_name: Some("Mapping Drones".to_string()),
                sub_category_name: None,
                primary_image: None,
                stock_quantity: Some(3),
            },
        }
    }

    #[test]
    fn test_cart_view_recomputes_count_and_subtotal() {
        let cart = CartList {
            total_items: 3,
            items: vec![
                cart_item(1, 2, "104998", true),
                cart_item(2, 1, "52499", true),
            ],
        };
        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "₹1,57,497.00");
        assert_eq!(view.items.len(), 2);
    }

    #[test]
    fn test_cart_view_skips_inactive_lines() {
        let cart = CartList {
            total_items: 2,
            items: vec![
                cart_item(1, 1, "52499", true),
                cart_item(2, 1, "52499", false),
            ],
        };
        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 1);
        assert_eq!(view.subtotal, "₹52,499.00");
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn test_cart_view_empty() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, "₹0.00");
    }

    #[test]
    fn test_item_view_flags_low_stock() {
        let mut item = cart_item(1, 5, "262495", true);
        item.product.stock_quantity = Some(3);
        let view = CartItemView::from(&item);
        assert!(view.low_stock);

        item.product.stock_quantity = Some(5);
        let view = CartItemView::from(&item);
        assert!(!view.low_stock);
    }
}
