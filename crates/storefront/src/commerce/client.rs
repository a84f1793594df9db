//! Commerce API client implementation.
//!
//! Thin request/response orchestration over `reqwest`: build the request,
//! await it, decode the body. Catalog reads go through a `moka` cache
//! (5-minute TTL); everything user-specific is fetched fresh.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use aerovane_core::{AddressId, CartItemId, ProductId, UserId};

use crate::commerce::ApiError;
use crate::commerce::cache::CacheValue;
use crate::commerce::types::{
    Address, AddressCreate, AddressUpdate, CartItem, CartItemCreate, CartItemUpdate, CartList,
    CategoryNode, CheckoutPage, ErrorBody, InitiatePaymentRequest, InitiatePaymentResponse,
    LoginRequest, LoginResponse, MessageResponse, ProductDetail, ProfileImage, ProfileUpdate,
    RegisterRequest, RegisterResponse, ResendOtpRequest, ResetPasswordRequest, SearchPage,
    ServiceRequest, ServiceRequestCreate, ShopQuery, ShopScroll, UserProfile, VerifyOtpRequest,
};
use crate::config::CommerceApiConfig;

/// Cache TTL for catalog responses.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of cached catalog responses.
const CATALOG_CACHE_CAPACITY: u64 = 1000;

// =============================================================================
// CommerceClient
// =============================================================================

/// Client for the commerce API.
///
/// Cheap to clone; all clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CommerceClient {
    /// Create a new commerce API client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying TLS backend cannot be initialized; this is a
    /// startup-time failure, not a per-request one.
    #[must_use]
    pub fn new(config: &CommerceApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CATALOG_CACHE_CAPACITY)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client construction only fails on TLS backend misconfiguration");

        Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Build a full endpoint URL from a path like `cart/12`.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Decode a response, mapping non-success statuses to [`ApiError`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map_or_else(
                    |_| {
                        status
                            .canonical_reason()
                            .unwrap_or("Request failed")
                            .to_string()
                    },
                    |e| e.detail,
                );

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(detail));
            }

            tracing::warn!(status = %status, detail = %detail, "Commerce API error response");
            return Err(ApiError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse commerce API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Attach a bearer token to a request builder.
    fn bearer(builder: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        builder.header(AUTHORIZATION, format!("Bearer {token}"))
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Register a new account. The API emails an OTP to verify the address.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected (e.g., email taken).
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/register"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Verify the registration OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the OTP is wrong or expired.
    #[instrument(skip(self, otp), fields(email = %email))]
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<MessageResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/verify-otp"))
            .json(&VerifyOtpRequest { email, otp })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Resend the registration OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn resend_otp(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/resend-otp"))
            .json(&ResendOtpRequest { email })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Request a password-reset OTP. The email goes as a query parameter,
    /// not a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/forgot-password"))
            .query(&[("email", email)])
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Verify the password-reset OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the OTP is wrong or expired.
    #[instrument(skip(self, otp), fields(email = %email))]
    pub async fn verify_reset_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/verify-forgot-password-otp"))
            .json(&VerifyOtpRequest { email, otp })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Set a new password after the reset OTP has been verified.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset is rejected.
    #[instrument(skip(self, new_password), fields(email = %email))]
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/reset-password"))
            .json(&ResetPasswordRequest {
                email,
                new_password,
            })
            .send()
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Fetch a user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the token is rejected.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn get_user(&self, token: &str, user_id: UserId) -> Result<UserProfile, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint(&format!("users/{user_id}")));
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Update a user profile via multipart form, optionally replacing the
    /// profile image.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the request fails.
    #[instrument(skip(self, token, update, image), fields(user_id = %user_id))]
    pub async fn update_user(
        &self,
        token: &str,
        user_id: UserId,
        update: &ProfileUpdate,
        image: Option<ProfileImage>,
    ) -> Result<UserProfile, ApiError> {
        let mut form = multipart::Form::new();
        for (name, value) in update.parts() {
            form = form.text(name, value);
        }
        if let Some(image) = image {
            let mut part = multipart::Part::bytes(image.bytes).file_name(image.file_name);
            if let Some(content_type) = image.content_type {
                part = part.mime_str(&content_type)?;
            }
            form = form.part("profile_image", part);
        }

        let request = self
            .inner
            .client
            .put(self.endpoint(&format!("users/{user_id}")))
            .multipart(form);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Create an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is rejected.
    #[instrument(skip(self, token, address), fields(user_id = %user_id))]
    pub async fn create_address(
        &self,
        token: &str,
        user_id: UserId,
        address: &AddressCreate,
    ) -> Result<Address, ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("addresses"))
            .query(&[("user_id", user_id.to_string())])
            .json(address);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// List a user's addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn list_addresses(
        &self,
        token: &str,
        user_id: UserId,
    ) -> Result<Vec<Address>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint("addresses"))
            .query(&[("user_id", user_id.to_string())]);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Fetch one address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not found.
    #[instrument(skip(self, token), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn get_address(
        &self,
        token: &str,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Address, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint(&format!("addresses/{address_id}")))
            .query(&[("user_id", user_id.to_string())]);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Update an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    #[instrument(skip(self, token, update), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn update_address(
        &self,
        token: &str,
        user_id: UserId,
        address_id: AddressId,
        update: &AddressUpdate,
    ) -> Result<Address, ApiError> {
        let request = self
            .inner
            .client
            .put(self.endpoint(&format!("addresses/{address_id}")))
            .query(&[("user_id", user_id.to_string())])
            .json(update);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Mark an address as the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn make_default_address(
        &self,
        token: &str,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .inner
            .client
            .patch(self.endpoint(&format!("addresses/{address_id}/make-default")))
            .query(&[("user_id", user_id.to_string())]);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id, address_id = %address_id))]
    pub async fn delete_address(
        &self,
        token: &str,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .inner
            .client
            .delete(self.endpoint(&format!("addresses/{address_id}")))
            .query(&[("user_id", user_id.to_string())]);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Cart (never cached - mutable state)
    // =========================================================================

    /// Fetch the user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn get_cart(&self, token: &str, user_id: UserId) -> Result<CartList, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint(&format!("cart/{user_id}")));
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Add an item to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the line (e.g., out of stock).
    #[instrument(skip(self, token, item), fields(user_id = %item.user_id, product_id = %item.product_id))]
    pub async fn add_cart_item(
        &self,
        token: &str,
        item: &CartItemCreate,
    ) -> Result<CartItem, ApiError> {
        let request = self.inner.client.post(self.endpoint("cart")).json(item);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Update a cart line's quantity or active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    #[instrument(skip(self, token, update), fields(item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        token: &str,
        item_id: CartItemId,
        update: &CartItemUpdate,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .inner
            .client
            .put(self.endpoint(&format!("cart/{item_id}")))
            .json(update);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn delete_cart_item(
        &self,
        token: &str,
        item_id: CartItemId,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .inner
            .client
            .delete(self.endpoint(&format!("cart/{item_id}")));
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Empty the user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn clear_cart(
        &self,
        token: &str,
        user_id: UserId,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .inner
            .client
            .delete(self.endpoint(&format!("cart/clear/{user_id}")));
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Checkout / payment
    // =========================================================================

    /// Fetch the checkout snapshot.
    ///
    /// With `buy_now` set, the snapshot covers that single product instead of
    /// the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be built (e.g., empty cart).
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn get_checkout_page(
        &self,
        token: &str,
        user_id: UserId,
        buy_now: Option<(ProductId, u32)>,
    ) -> Result<CheckoutPage, ApiError> {
        let mut params = vec![("user_id", user_id.to_string())];
        if let Some((product_id, quantity)) = buy_now {
            params.push(("product_id", product_id.to_string()));
            params.push(("quantity", quantity.to_string()));
        }

        let request = self
            .inner
            .client
            .get(self.endpoint("orders/checkout-page"))
            .query(&params);
        let response = Self::bearer(request, token).send().await?;
        Self::decode(response).await
    }

    /// Initiate a payment and get the gateway redirect URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the initiation.
    #[instrument(skip(self, token, request), fields(user_id = %request.user_id, flow = %request.flow_type))]
    pub async fn initiate_payment(
        &self,
        token: &str,
        request: &InitiatePaymentRequest,
    ) -> Result<InitiatePaymentResponse, ApiError> {
        let builder = self
            .inner
            .client
            .post(self.endpoint("orders/payment/initiate"))
            .json(request);
        let response = Self::bearer(builder, token).send().await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Catalog (cached)
    // =========================================================================

    /// Fetch a product detail.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<ProductDetail, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let response = self
            .inner
            .client
            .get(self.endpoint(&format!("products/{product_id}")))
            .send()
            .await?;
        let product: ProductDetail = Self::decode(response).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Fetch the category tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_category_tree(&self) -> Result<Vec<CategoryNode>, ApiError> {
        let cache_key = "category-tree".to_string();

        if let Some(CacheValue::CategoryTree(tree)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category tree");
            return Ok(tree);
        }

        let response = self
            .inner
            .client
            .get(self.endpoint("category-tree"))
            .send()
            .await?;
        let tree: Vec<CategoryNode> = Self::decode(response).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::CategoryTree(tree.clone()))
            .await;

        Ok(tree)
    }

    /// Fetch one page of the shop grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_shop_products(&self, query: ShopQuery) -> Result<ShopScroll, ApiError> {
        let pairs = query.to_pairs();
        let cache_key = format!(
            "shop:{}",
            pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&")
        );

        if let Some(CacheValue::Shop(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for shop page");
            return Ok(*page);
        }

        let response = self
            .inner
            .client
            .get(self.endpoint("shop/products"))
            .query(&pairs)
            .send()
            .await?;
        let page: ShopScroll = Self::decode(response).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Shop(Box::new(page.clone())))
            .await;

        Ok(page)
    }

    /// Search products (not cached; every keystroke is a fresh query).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(search = %search))]
    pub async fn search_products(
        &self,
        search: &str,
        cursor: Option<i64>,
        limit: Option<u32>,
    ) -> Result<SearchPage, ApiError> {
        let mut params = vec![("search", search.to_string())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }

        let response = self
            .inner
            .client
            .get(self.endpoint("product/search"))
            .query(&params)
            .send()
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Submit a service inquiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the inquiry is rejected.
    #[instrument(skip(self, request), fields(service_type = %request.service_type))]
    pub async fn create_service_request(
        &self,
        request: &ServiceRequestCreate,
    ) -> Result<ServiceRequest, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("services"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// List recorded service inquiries.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_service_requests(&self) -> Result<Vec<ServiceRequest>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("services"))
            .send()
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, product_id: ProductId) {
        self.inner
            .cache
            .invalidate(&format!("product:{product_id}"))
            .await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use url::Url;

    fn test_client() -> CommerceClient {
        CommerceClient::new(&CommerceApiConfig {
            base_url: Url::parse("http://localhost:8000/api/v1").unwrap(),
            timeout_secs: 10,
        })
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = test_client();
        assert_eq!(
            client.endpoint("cart/12"),
            "http://localhost:8000/api/v1/cart/12"
        );
        assert_eq!(
            client.endpoint("/category-tree"),
            "http://localhost:8000/api/v1/category-tree"
        );
    }

    #[test]
    fn test_endpoint_keeps_version_prefix() {
        let client = CommerceClient::new(&CommerceApiConfig {
            base_url: Url::parse("https://api.aerovane.in/api/v1/").unwrap(),
            timeout_secs: 5,
        });
        assert_eq!(
            client.endpoint("shop/products"),
            "https://api.aerovane.in/api/v1/shop/products"
        );
    }
}
