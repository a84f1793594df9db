//! Payment and order flow vocabulary shared with the commerce API.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Which flow a checkout originated from.
///
/// The payment initiation endpoint distinguishes a checkout of the whole cart
/// from a single-product "buy now" purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowType {
    /// Checkout of every active cart line.
    Cart,
    /// Direct purchase of one product, bypassing the cart.
    BuyNow,
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cart => f.write_str("CART"),
            Self::BuyNow => f.write_str("BUY_NOW"),
        }
    }
}

/// Outcome of a payment, as reported by the provider redirect.
///
/// The payment provider redirects the browser back to `/payment-status` with
/// a status query parameter. Verification happened server-side before the
/// redirect; this enum only drives which terminal page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment captured.
    Success,
    /// Payment declined or aborted.
    Failed,
    /// Provider has not settled yet.
    #[default]
    Pending,
}

impl PaymentStatus {
    /// Parse a status query parameter, tolerating case and unknown values.
    ///
    /// Unknown values are treated as [`Self::Pending`]: the backend has not
    /// confirmed an outcome, so nothing final should be shown.
    #[must_use]
    pub fn from_query(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "success" | "paid" => Self::Success,
            "failed" | "failure" | "cancelled" => Self::Failed,
            _ => Self::Pending,
        }
    }

    /// Human heading for the terminal page.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Success => "Payment successful",
            Self::Failed => "Payment failed",
            Self::Pending => "Payment pending",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failed => f.write_str("failed"),
            Self::Pending => f.write_str("pending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&FlowType::BuyNow).as_deref().ok(),
            Some("\"BUY_NOW\"")
        );
        assert_eq!(
            serde_json::to_string(&FlowType::Cart).as_deref().ok(),
            Some("\"CART\"")
        );
    }

    #[test]
    fn test_payment_status_from_query() {
        assert_eq!(PaymentStatus::from_query("SUCCESS"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_query("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_query("cancelled"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_query("bogus"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_query(""), PaymentStatus::Pending);
    }

    #[test]
    fn test_payment_status_display() {
        assert_eq!(PaymentStatus::Success.to_string(), "success");
    }
}
