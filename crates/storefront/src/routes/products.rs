//! Product detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use aerovane_core::ProductId;

use crate::commerce::types::ProductDetail;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub brand: Option<String>,
    pub category: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub price: String,
    pub compare_at_price: Option<String>,
    /// Raw unit price, posted back by the add-to-cart form.
    pub unit_price: String,
    pub in_stock: bool,
    pub attributes: Vec<AttributeView>,
    pub images: Vec<String>,
}

/// A technical attribute row.
#[derive(Clone)]
pub struct AttributeView {
    pub name: String,
    pub value: String,
}

impl From<&ProductDetail> for ProductView {
    fn from(product: &ProductDetail) -> Self {
        let (price, compare_at_price, unit_price) = match product.pricing.as_ref() {
            Some(pricing) => match pricing.discount_price {
                Some(discount) => (
                    discount.display_inr(),
                    Some(pricing.price.display_inr()),
                    discount.to_string(),
                ),
                None => (pricing.price.display_inr(), None, pricing.price.to_string()),
            },
            None => ("Price on request".to_string(), None, String::new()),
        };

        // Sellable stock is what's on hand minus what's already reserved
        let in_stock = product.inventory.as_ref().is_some_and(|inventory| {
            inventory.quantity - inventory.reserved.unwrap_or(0) > 0
        });

        // Primary image first, then the rest in API order
        let mut images: Vec<String> = product
            .media
            .iter()
            .filter(|m| m.is_primary)
            .map(|m| m.url.clone())
            .collect();
        images.extend(
            product
                .media
                .iter()
                .filter(|m| !m.is_primary)
                .map(|m| m.url.clone()),
        );

        let attributes = product
            .attributes
            .iter()
            .map(|attr| AttributeView {
                name: attr.attribute_name.clone(),
                value: match attr.unit.as_deref() {
                    Some(unit) if !unit.is_empty() => format!("{} {unit}", attr.value),
                    _ => attr.value.clone(),
                },
            })
            .collect();

        Self {
            id: product.id.get(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            brand: product.brand.clone(),
            category: product
                .sub_category_name
                .clone()
                .unwrap_or_else(|| product.category_name.clone()),
            short_description: product.short_description.clone(),
            long_description: product.long_description.clone(),
            price,
            compare_at_price,
            unit_price,
            in_stock,
            attributes,
            images,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display a product detail page.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ProductShowTemplate> {
    let product = state.commerce().get_product(ProductId::new(id)).await?;

    if !product.is_active {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aerovane_core::CategoryId;
    use crate::commerce::types::{ProductInventory, ProductMedia, ProductPricing};

    fn product_detail() -> ProductDetail {
        ProductDetail {
            id: ProductId::new(7),
            name: "AV-220 Surveyor".to_string(),
            sku: "AV220".to_string(),
            slug: "av-220-surveyor".to_string(),
            category_id: CategoryId::new(1),
            category_name: "Drones".to_string(),
            sub_category_id: None,
            sub_category_name: None,
            brand: Some("Aerovane".to_string()),
            short_description: Some("Survey-grade quadcopter".to_string()),
            long_description: None,
            is_active: true,
            created_at: "2025-02-01T10:00:00".to_string(),
            updated_at: "2025-06-01T10:00:00".to_string(),
            pricing: Some(ProductPricing {
                id: 1,
                product_id: ProductId::new(7),
                price: "59999".parse().unwrap(),
                discount_price: Some("52499".parse().unwrap()),
                currency: Some("INR".to_string()),
            }),
            inventory: Some(ProductInventory {
                id: 1,
                product_id: ProductId::new(7),
                quantity: 5,
                reserved: Some(2),
            }),
            attributes: vec![crate::commerce::types::ProductAttribute {
                attribute_id: 1,
                attribute_name: "Flight time".to_string(),
                unit: Some("min".to_string()),
                value: "42".to_string(),
            }],
            media: vec![
                ProductMedia {
                    id: 2,
                    product_id: ProductId::new(7),
                    url: "/media/products/av220-side.jpg".to_string(),
                    media_type: "image".to_string(),
                    is_primary: false,
                },
                ProductMedia {
                    id: 1,
                    product_id: ProductId::new(7),
                    url: "/media/products/av220.jpg".to_string(),
                    media_type: "image".to_string(),
                    is_primary: true,
                },
            ],
        }
    }

    #[test]
    fn test_view_discount_and_raw_unit_price() {
        let view = ProductView::from(&product_detail());
        assert_eq!(view.price, "₹52,499.00");
        assert_eq!(view.compare_at_price.as_deref(), Some("₹59,999.00"));
        // The add-to-cart form posts the undecorated amount back
        assert_eq!(view.unit_price, "52499");
    }

    #[test]
    fn test_view_stock_subtracts_reserved() {
        let view = ProductView::from(&product_detail());
        assert!(view.in_stock);

        let mut product = product_detail();
        product.inventory = Some(ProductInventory {
            id: 1,
            product_id: ProductId::new(7),
            quantity: 2,
            reserved: Some(2),
        });
        assert!(!ProductView::from(&product).in_stock);
    }

    #[test]
    fn test_view_missing_inventory_is_out_of_stock() {
        let mut product = product_detail();
        product.inventory = None;
        assert!(!ProductView::from(&product).in_stock);
    }

    #[test]
    fn test_view_primary_image_first() {
        let view = ProductView::from(&product_detail());
        assert_eq!(
            view.images,
            vec![
                "/media/products/av220.jpg".to_string(),
                "/media/products/av220-side.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_view_attribute_units() {
        let view = ProductView::from(&product_detail());
        assert_eq!(view.attributes.first().unwrap().value, "42 min");
    }
}
