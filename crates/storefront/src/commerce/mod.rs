//! Commerce API client.
//!
//! # Architecture
//!
//! - The remote API is the source of truth - NO local sync, direct calls
//! - One method per documented endpoint, JSON in / JSON out
//! - In-memory caching via `moka` for read-only catalog responses (5 minute TTL)
//! - Mutable state (cart, account) is never cached
//!
//! Failed calls surface the API's `detail` message; there is no retry policy.
//! A failed request is terminal for that user action.
//!
//! # Example
//!
//! ```rust,ignore
//! use aerovane_storefront::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(&config.commerce);
//!
//! // Browse the catalog
//! let product = client.get_product(ProductId::new(7)).await?;
//!
//! // Authenticated cart call
//! let cart = client.get_cart(&token, user_id).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::CommerceClient;

use thiserror::Error;

/// Errors that can occur when calling the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API, retry after the given number of seconds.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API rejected the request and explained why in its `detail` field.
    #[error("API error ({status}): {detail}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// The `detail` message from the error body.
        detail: String,
    },
}

impl ApiError {
    /// The message shown to the user for this failure.
    ///
    /// Only `detail` text from the API is user-facing; transport and parse
    /// failures get a generic message so internals are not leaked into pages.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { detail, .. } => detail.clone(),
            Self::NotFound(_) => "The requested item could not be found.".to_string(),
            Self::RateLimited(_) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            Self::Http(_) | Self::Parse(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Whether this error means the bearer token was rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = ApiError::Api {
            status: 400,
            detail: "Cart is empty".to_string(),
        };
        assert_eq!(err.to_string(), "API error (400): Cart is empty");
    }

    #[test]
    fn test_user_message_surfaces_detail() {
        let err = ApiError::Api {
            status: 409,
            detail: "Email already registered".to_string(),
        };
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_user_message_hides_transport_failures() {
        let err = ApiError::Parse(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn test_is_unauthorized() {
        let err = ApiError::Api {
            status: 401,
            detail: "Could not validate credentials".to_string(),
        };
        assert!(err.is_unauthorized());

        let err = ApiError::Api {
            status: 400,
            detail: "bad".to_string(),
        };
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
