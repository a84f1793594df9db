//! Checkout and payment route handlers.
//!
//! The checkout page renders the snapshot the commerce API builds (lines,
//! addresses, totals); nothing is computed locally. Payment initiation
//! returns a gateway URL the browser is redirected to; the gateway redirects
//! back to `/payment-status` once the backend has verified the outcome.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aerovane_core::{Amount, FlowType, PaymentStatus, ProductId};

use crate::commerce::types::{CheckoutPage, InitiatePaymentRequest};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// A line on the checkout summary.
#[derive(Clone)]
pub struct CheckoutLineView {
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// A selectable shipping address.
#[derive(Clone)]
pub struct CheckoutAddressView {
    pub id: i64,
    pub summary: String,
    pub is_default: bool,
}

/// Checkout page display data.
#[derive(Clone)]
pub struct CheckoutView {
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub addresses: Vec<CheckoutAddressView>,
    pub lines: Vec<CheckoutLineView>,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
    /// Undecorated total, posted back by the pay form.
    pub amount_raw: String,
    pub flow_type: FlowType,
}

impl CheckoutView {
    fn build(page: &CheckoutPage, flow_type: FlowType) -> Self {
        Self {
            buyer_name: format!("{} {}", page.user.first_name, page.user.last_name),
            buyer_email: page.user.email.clone(),
            buyer_phone: page.user.phone.clone(),
            addresses: page
                .address
                .iter()
                .map(|a| CheckoutAddressView {
                    id: a.address_id.get(),
                    summary: [
                        Some(a.address_line1.as_str()),
                        a.address_line2.as_deref().filter(|s| !s.is_empty()),
                        Some(a.city.as_str()),
                        Some(a.state_province.as_str()),
                        Some(a.postal_code.as_str()),
                    ]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(", "),
                    is_default: a.is_default,
                })
                .collect(),
            lines: page
                .products
                .iter()
                .map(|p| CheckoutLineView {
                    name: p.product_name.clone(),
                    sku: p.sku.clone(),
                    quantity: p.quantity,
                    unit_price: p.unit_price.display_inr(),
                    line_price: p.total_price.display_inr(),
                    image: p.primary_image.clone(),
                })
                .collect(),
            subtotal: page.subtotal.display_inr(),
            tax: page.tax.display_inr(),
            shipping: page.shipping.display_inr(),
            total: page.total_amount.display_inr(),
            amount_raw: page.total_amount.to_string(),
            flow_type,
        }
    }
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Checkout page query parameters; `product_id` selects the buy-now flow.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub product_id: Option<i64>,
    pub quantity: Option<u32>,
    pub error: Option<String>,
}

/// Pay form data.
#[derive(Debug, Deserialize)]
pub struct PayForm {
    pub flow_type: FlowType,
    pub amount: String,
    pub address_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<u32>,
}

/// Payment status query parameters, set by the gateway redirect.
#[derive(Debug, Deserialize)]
pub struct PaymentStatusQuery {
    pub status: Option<String>,
    pub transaction_id: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub checkout: CheckoutView,
    pub buy_now_product_id: Option<i64>,
    pub buy_now_quantity: Option<u32>,
    pub error: Option<String>,
}

/// Payment status page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment_status.html")]
pub struct PaymentStatusTemplate {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<CheckoutQuery>,
) -> Result<CheckoutTemplate> {
    let buy_now = query
        .product_id
        .map(|id| (ProductId::new(id), query.quantity.unwrap_or(1)));
    let flow_type = if buy_now.is_some() {
        FlowType::BuyNow
    } else {
        FlowType::Cart
    };

    let page = state
        .commerce()
        .get_checkout_page(&user.access_token, user.user_id, buy_now)
        .await?;

    Ok(CheckoutTemplate {
        checkout: CheckoutView::build(&page, flow_type),
        buy_now_product_id: query.product_id,
        buy_now_quantity: query.quantity,
        error: query.error,
    })
}

/// Initiate payment and redirect the browser to the gateway.
#[instrument(skip(state, user, form), fields(flow = %form.flow_type))]
pub async fn pay(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<PayForm>,
) -> Response {
    let Ok(amount) = form.amount.parse::<Amount>() else {
        return Redirect::to("/checkout?error=Invalid%20amount").into_response();
    };

    // The gateway payload is opaque to the storefront; the backend reads the
    // address and buy-now context out of it when building the order
    let request = InitiatePaymentRequest {
        user_id: user.user_id,
        amount,
        flow_type: form.flow_type,
        payload: serde_json::json!({
            "address_id": form.address_id,
            "product_id": form.product_id,
            "quantity": form.quantity,
        }),
    };

    match state
        .commerce()
        .initiate_payment(&user.access_token, &request)
        .await
    {
        Ok(response) => {
            tracing::info!(transaction_id = %response.transaction_id, "Payment initiated");
            Redirect::to(&response.payment_url).into_response()
        }
        Err(e) => {
            tracing::warn!("Payment initiation failed: {e}");
            let redirect_url = format!(
                "/checkout?error={}",
                urlencoding::encode(&e.user_message())
            );
            Redirect::to(&redirect_url).into_response()
        }
    }
}

/// Terminal page after the gateway redirect.
#[instrument]
pub async fn payment_status(Query(query): Query<PaymentStatusQuery>) -> impl IntoResponse {
    let status = query
        .status
        .as_deref()
        .map_or(PaymentStatus::Pending, PaymentStatus::from_query);

    PaymentStatusTemplate {
        status,
        transaction_id: query.transaction_id,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aerovane_core::{AddressId, UserId};
    use crate::commerce::types::{CheckoutAddress, CheckoutProduct, CheckoutUser};

    fn checkout_page() -> CheckoutPage {
        CheckoutPage {
            user: CheckoutUser {
                user_id: UserId::new(12),
                first_name: "Asha".to_string(),
                last_name: "Rao".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9000000000".to_string(),
            },
            address: vec![CheckoutAddress {
                address_id: AddressId::new(4),
                address_line1: "14 MG Road".to_string(),
                address_line2: None,
                city: "Bengaluru".to_string(),
                state_province: "Karnataka".to_string(),
                postal_code: "560001".to_string(),
                country: "India".to_string(),
                is_default: true,
            }],
            products: vec![CheckoutProduct {
                product_id: ProductId::new(7),
                product_name: "AV-220 Surveyor".to_string(),
                sku: "AV220".to_string(),
                unit_price: "52499.00".parse().unwrap(),
                quantity: 1,
                total_price: "52499.00".parse().unwrap(),
                primary_image: None,
            }],
            subtotal: "52499.00".parse().unwrap(),
            tax: "9449.82".parse().unwrap(),
            shipping: "0.00".parse().unwrap(),
            total_amount: "61948.82".parse().unwrap(),
        }
    }

    #[test]
    fn test_view_renders_totals_untouched() {
        let view = CheckoutView::build(&checkout_page(), FlowType::Cart);
        assert_eq!(view.subtotal, "₹52,499.00");
        assert_eq!(view.tax, "₹9,449.82");
        assert_eq!(view.total, "₹61,948.82");
        // Posted back to the API without formatting
        assert_eq!(view.amount_raw, "61948.82");
    }

    #[test]
    fn test_view_address_summary_skips_empty_line2() {
        let view = CheckoutView::build(&checkout_page(), FlowType::Cart);
        assert_eq!(
            view.addresses.first().unwrap().summary,
            "14 MG Road, Bengaluru, Karnataka, 560001"
        );
    }

    #[test]
    fn test_view_buyer_name() {
        let view = CheckoutView::build(&checkout_page(), FlowType::BuyNow);
        assert_eq!(view.buyer_name, "Asha Rao");
        assert_eq!(view.flow_type, FlowType::BuyNow);
    }
}
