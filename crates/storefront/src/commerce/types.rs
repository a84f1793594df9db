//! Wire types for the commerce API.
//!
//! These structs mirror the API's JSON shapes field-for-field; the storefront
//! never invents fields and never owns the records behind them. Monetary
//! fields use [`Amount`], which tolerates the API sending either decimal
//! strings or plain numbers.

use serde::{Deserialize, Serialize};

use aerovane_core::{
    AddressId, Amount, CartItemId, CategoryId, FlowType, ProductId, ServiceRequestId, UserId,
};

// =============================================================================
// Shared
// =============================================================================

/// Generic acknowledgment from mutating endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body produced by the API on failure.
///
/// Every non-success response carries a `detail` string; that text is what
/// gets surfaced to the user.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

// =============================================================================
// Auth
// =============================================================================

/// `POST /auth/login` request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user_id: UserId,
    pub user_identity_id: String,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

/// `POST /auth/register` request body.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// `POST /auth/register` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role_id: i64,
    pub is_verify: bool,
    pub is_active: bool,
    pub created_at: String,
}

/// OTP verification body, shared by the registration and reset flows.
#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

/// `POST /auth/resend-otp` request body.
#[derive(Debug, Serialize)]
pub struct ResendOtpRequest<'a> {
    pub email: &'a str,
}

/// `POST /auth/reset-password` request body.
#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub new_password: &'a str,
}

// =============================================================================
// Users
// =============================================================================

/// `GET /users/{id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub user_identity_id: String,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub alternative_phone: Option<String>,
    pub role_id: i64,
    pub role_name: String,
    pub profile_image_url: Option<String>,
    pub is_verify: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login: Option<String>,
}

/// Text fields for `PUT /users/{id}` (sent as multipart form parts).
///
/// `None` fields are omitted so the API keeps their current values.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub alternative_phone: Option<String>,
}

impl ProfileUpdate {
    /// Field name / value pairs for the multipart form, omitting `None`s.
    #[must_use]
    pub fn parts(&self) -> Vec<(&'static str, String)> {
        [
            ("user_name", &self.user_name),
            ("email", &self.email),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone", &self.phone),
            ("alternative_phone", &self.alternative_phone),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
        .collect()
    }
}

/// An uploaded profile image, forwarded verbatim to the API.
#[derive(Debug, Clone)]
pub struct ProfileImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// =============================================================================
// Addresses
// =============================================================================

/// `POST /addresses` request body.
#[derive(Debug, Clone, Serialize)]
pub struct AddressCreate {
    pub address_type: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// `PUT /addresses/{id}` request body; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddressUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// A saved address.
#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    pub address_id: AddressId,
    pub address_type: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

// =============================================================================
// Cart
// =============================================================================

/// Product summary embedded in a cart line.
#[derive(Debug, Clone, Deserialize)]
pub struct CartProductInfo {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub category_name: Option<String>,
    pub sub_category_name: Option<String>,
    pub primary_image: Option<String>,
    pub stock_quantity: Option<i64>,
}

/// A cart line.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub quantity: u32,
    pub unit_price: Amount,
    pub total_price: Amount,
    pub is_active: bool,
    pub product: CartProductInfo,
}

/// `GET /cart/{user_id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CartList {
    pub total_items: u32,
    pub items: Vec<CartItem>,
}

/// `POST /cart` request body.
#[derive(Debug, Serialize)]
pub struct CartItemCreate {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// `PUT /cart/{item_id}` request body.
#[derive(Debug, Default, Serialize)]
pub struct CartItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// =============================================================================
// Checkout / payment
// =============================================================================

/// Buyer summary on the checkout snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutUser {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Shipping address option on the checkout snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutAddress {
    pub address_id: AddressId,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// A line on the checkout snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutProduct {
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub unit_price: Amount,
    pub quantity: u32,
    pub total_price: Amount,
    pub primary_image: Option<String>,
}

/// `GET /orders/checkout-page` response.
///
/// Totals are computed server-side; the storefront renders them untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutPage {
    pub user: CheckoutUser,
    pub address: Vec<CheckoutAddress>,
    pub products: Vec<CheckoutProduct>,
    pub subtotal: Amount,
    pub tax: Amount,
    pub shipping: Amount,
    pub total_amount: Amount,
}

/// `POST /orders/payment/initiate` request body.
#[derive(Debug, Serialize)]
pub struct InitiatePaymentRequest {
    pub user_id: UserId,
    pub amount: Amount,
    pub flow_type: FlowType,
    pub payload: serde_json::Value,
}

/// `POST /orders/payment/initiate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePaymentResponse {
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
    #[serde(rename = "paymentUrl")]
    pub payment_url: String,
}

// =============================================================================
// Catalog
// =============================================================================

/// Media attached to a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductMedia {
    pub id: i64,
    pub product_id: ProductId,
    pub url: String,
    pub media_type: String,
    pub is_primary: bool,
}

/// Pricing block on a product detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPricing {
    pub id: i64,
    pub product_id: ProductId,
    pub price: Amount,
    pub discount_price: Option<Amount>,
    pub currency: Option<String>,
}

/// Inventory block on a product detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInventory {
    pub id: i64,
    pub product_id: ProductId,
    pub quantity: i64,
    pub reserved: Option<i64>,
}

/// A technical attribute row (e.g., flight time, payload capacity).
#[derive(Debug, Clone, Deserialize)]
pub struct ProductAttribute {
    pub attribute_id: i64,
    pub attribute_name: String,
    pub unit: Option<String>,
    pub value: String,
}

/// `GET /products/{id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub slug: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub sub_category_id: Option<CategoryId>,
    pub sub_category_name: Option<String>,
    pub brand: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub pricing: Option<ProductPricing>,
    pub inventory: Option<ProductInventory>,
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
    #[serde(default)]
    pub media: Vec<ProductMedia>,
}

/// A sub-category leaf in the category tree.
#[derive(Debug, Clone, Deserialize)]
pub struct SubCategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub image_path: Option<String>,
    pub category_name: Option<String>,
}

/// `GET /category-tree` node; categories nest and carry sub-category leaves.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub image_path: Option<String>,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategoryNode>,
}

/// A product card on the shop grid.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopProduct {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub sub_category_id: Option<CategoryId>,
    pub sub_category_name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Amount>,
    pub discount_price: Option<Amount>,
    pub primary_image: Option<String>,
}

/// `GET /shop/products` response (keyset pagination).
#[derive(Debug, Clone, Deserialize)]
pub struct ShopScroll {
    pub items: Vec<ShopProduct>,
    pub last_id: Option<i64>,
    pub has_more: bool,
}

/// Filter and cursor parameters for `GET /shop/products`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShopQuery {
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<CategoryId>,
    pub last_id: Option<i64>,
    pub limit: Option<u32>,
}

impl ShopQuery {
    /// Default page size when the caller does not specify one.
    pub const DEFAULT_LIMIT: u32 = 12;

    /// Encode as query pairs, applying the default limit.
    #[must_use]
    pub fn to_pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.category_id {
            pairs.push(("category_id", id.to_string()));
        }
        if let Some(id) = self.sub_category_id {
            pairs.push(("sub_category_id", id.to_string()));
        }
        if let Some(cursor) = self.last_id {
            pairs.push(("last_id", cursor.to_string()));
        }
        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);
        pairs.push(("limit", limit.to_string()));
        pairs
    }
}

/// A row in the search dropdown.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: ProductId,
    pub name: String,
    pub primary_image: Option<String>,
    pub price: Amount,
}

/// `GET /product/search` response (cursor pagination).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub next_cursor: Option<i64>,
    pub items: Vec<SearchItem>,
}

// =============================================================================
// Services
// =============================================================================

/// `POST /services` request body - a service inquiry (survey, mapping,
/// spraying, training, or a general contact message).
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestCreate {
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub city: String,
    pub service_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A recorded service inquiry.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRequest {
    pub id: ServiceRequestId,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub city: String,
    pub service_type: String,
    pub message: Option<String>,
    pub created_at: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_deserializes() {
        let json = r#"{
            "access_token": "eyJhbGciOi",
            "user_id": 12,
            "user_identity_id": "9f1b6a0e",
            "user_name": "asha",
            "full_name": "Asha Rao",
            "email": "asha@example.com",
            "role": "customer"
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user_id, UserId::new(12));
        assert_eq!(response.role, "customer");
    }

    #[test]
    fn test_cart_list_deserializes_with_numeric_prices() {
        let json = r#"{
            "total_items": 2,
            "items": [{
                "id": 31,
                "quantity": 2,
                "unit_price": 52499.0,
                "total_price": 104998.0,
                "is_active": true,
                "product": {
                    "product_id": 7,
                    "name": "AV-220 Surveyor",
                    "slug": "av-220-surveyor",
                    "category_name": "Mapping Drones",
                    "sub_category_name": null,
                    "primary_image": "/media/products/av220.jpg",
                    "stock_quantity": 14
                }
            }]
        }"#;
        let cart: CartList = serde_json::from_str(json).unwrap();
        assert_eq!(cart.total_items, 2);
        let item = cart.items.first().unwrap();
        assert_eq!(item.id, CartItemId::new(31));
        assert_eq!(item.total_price.display_inr(), "₹1,04,998.00");
    }

    #[test]
    fn test_checkout_page_deserializes_with_string_totals() {
        let json = r#"{
            "user": {"user_id": 12, "first_name": "Asha", "last_name": "Rao",
                     "email": "asha@example.com", "phone": "9000000000"},
            "address": [{
                "address_id": 4, "address_line1": "14 MG Road", "address_line2": null,
                "city": "Bengaluru", "state_province": "Karnataka",
                "postal_code": "560001", "country": "India", "is_default": true
            }],
            "products": [{
                "product_id": 7, "product_name": "AV-220 Surveyor", "sku": "AV220",
                "unit_price": "52499.00", "quantity": 1, "total_price": "52499.00",
                "primary_image": null
            }],
            "subtotal": "52499.00",
            "tax": "9449.82",
            "shipping": "0.00",
            "total_amount": "61948.82"
        }"#;
        let page: CheckoutPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.address.len(), 1);
        assert_eq!(page.total_amount.display_inr(), "₹61,948.82");
    }

    #[test]
    fn test_initiate_payment_response_field_names() {
        // The payment gateway bridge uses camelCase, unlike the rest of the API
        let json = r#"{"transactionId": "TXN-081", "paymentUrl": "https://pay.example/TXN-081"}"#;
        let response: InitiatePaymentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.transaction_id, "TXN-081");
    }

    #[test]
    fn test_category_tree_deserializes_nested() {
        let json = r#"[{
            "id": 1, "name": "Drones", "slug": "drones", "image_path": null,
            "children": [{
                "id": 3, "name": "Enterprise", "slug": "enterprise", "image_path": null,
                "children": [], "sub_categories": []
            }],
            "sub_categories": [{
                "id": 9, "name": "Mapping", "slug": "mapping",
                "image_path": null, "category_name": "Drones"
            }]
        }]"#;
        let tree: Vec<CategoryNode> = serde_json::from_str(json).unwrap();
        let root = tree.first().unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.sub_categories.first().unwrap().name, "Mapping");
    }

    #[test]
    fn test_shop_query_pairs_defaults_limit() {
        let query = ShopQuery {
            category_id: Some(CategoryId::new(2)),
            ..ShopQuery::default()
        };
        let pairs = query.to_pairs();
        assert!(pairs.contains(&("category_id", "2".to_string())));
        assert!(pairs.contains(&("limit", "12".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "last_id"));
    }

    #[test]
    fn test_shop_query_pairs_with_cursor() {
        let query = ShopQuery {
            sub_category_id: Some(CategoryId::new(5)),
            last_id: Some(144),
            limit: Some(24),
            ..ShopQuery::default()
        };
        let pairs = query.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("sub_category_id", "5".to_string()),
                ("last_id", "144".to_string()),
                ("limit", "24".to_string()),
            ]
        );
    }

    #[test]
    fn test_profile_update_parts_omit_none() {
        let update = ProfileUpdate {
            first_name: Some("Asha".to_string()),
            phone: Some("9000000000".to_string()),
            ..ProfileUpdate::default()
        };
        let parts = update.parts();
        assert_eq!(
            parts,
            vec![
                ("first_name", "Asha".to_string()),
                ("phone", "9000000000".to_string()),
            ]
        );
    }

    #[test]
    fn test_cart_item_update_skips_none() {
        let update = CartItemUpdate {
            quantity: Some(3),
            is_active: None,
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"quantity":3}"#
        );
    }

    #[test]
    fn test_error_body_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "Invalid email or password"}"#).unwrap();
        assert_eq!(body.detail, "Invalid email or password");
    }
}
