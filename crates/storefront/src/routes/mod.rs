//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//! GET  /about                  - About page
//!
//! # Services
//! GET  /services               - Services page with inquiry form
//! POST /services               - Submit a service inquiry
//! GET  /contact                - Contact page
//! POST /contact                - Submit a general inquiry
//!
//! # Shop
//! GET  /shop                   - Shop page (category tree + first grid page)
//! GET  /shop/products          - Next grid page (HTMX fragment)
//! GET  /shop/search            - Search results (HTMX fragment)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments, login required)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add item (returns count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout (login required)
//! GET  /checkout               - Checkout snapshot (cart flow, or buy-now with product_id)
//! POST /checkout/pay           - Initiate payment, redirect to gateway
//! GET  /payment-status         - Terminal page after the gateway redirect
//!
//! # Auth (strict rate limit)
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! GET  /auth/verify-otp        - Registration OTP page
//! POST /auth/verify-otp        - Verify registration OTP
//! POST /auth/resend-otp        - Resend registration OTP
//! GET  /auth/forgot-password   - Request password-reset OTP page
//! POST /auth/forgot-password   - Send password-reset OTP
//! GET  /auth/reset-otp         - Reset OTP page
//! POST /auth/reset-otp         - Verify reset OTP
//! GET  /auth/reset-password    - New password page
//! POST /auth/reset-password    - Set new password
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Profile overview
//! POST /account/profile        - Update profile (multipart)
//! GET  /account/addresses      - Address list
//! GET  /account/addresses/new  - New address form
//! POST /account/addresses      - Create address
//! GET  /account/addresses/{id}/edit - Edit address form
//! POST /account/addresses/{id} - Update address
//! POST /account/addresses/{id}/delete - Delete address
//! POST /account/addresses/{id}/make-default - Make address the default
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod home;
pub mod pages;
pub mod products;
pub mod services;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/verify-otp",
            get(auth::verify_otp_page).post(auth::verify_otp),
        )
        .route("/resend-otp", post(auth::resend_otp))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route(
            "/reset-otp",
            get(auth::reset_otp_page).post(auth::verify_reset_otp),
        )
        .route(
            "/reset-password",
            get(auth::reset_password_page).post(auth::reset_password),
        )
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shop::index))
        .route("/products", get(shop::products_fragment))
        .route("/search", get(shop::search_fragment))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .layer(api_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/profile", post(account::update_profile))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route("/addresses/new", get(account::new_address))
        .route("/addresses/{id}", post(account::update_address))
        .route("/addresses/{id}/edit", get(account::edit_address))
        .route("/addresses/{id}/delete", post(account::delete_address))
        .route(
            "/addresses/{id}/make-default",
            post(account::make_default_address),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home and marketing pages
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route(
            "/services",
            get(services::index).post(services::submit_inquiry),
        )
        .route("/contact", get(contact::index).post(contact::submit))
        // Shop and catalog
        .nest("/shop", shop_routes())
        .route("/products/{id}", get(products::show))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout and payment
        .route("/checkout", get(checkout::show))
        .route("/checkout/pay", post(checkout::pay))
        .route("/payment-status", get(checkout::payment_status))
        // Account
        .nest("/account", account_routes())
        // Auth
        .nest("/auth", auth_routes())
}
