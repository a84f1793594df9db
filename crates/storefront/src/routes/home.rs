//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::commerce::types::ShopQuery;
use crate::filters;
use crate::routes::shop::ProductCardView;
use crate::state::AppState;

// =============================================================================
// Hero Configuration (Static content for carousel)
// =============================================================================

/// A single slide in the hero carousel.
#[derive(Clone)]
pub struct HeroSlide {
    pub eyebrow: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub button_text: String,
    pub button_url: String,
    pub image_path: String,
    pub image_alt: String,
}

/// Hero carousel configuration.
#[derive(Clone)]
pub struct HeroConfig {
    pub slides: Vec<HeroSlide>,
    pub autoplay_ms: Option<u32>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            slides: vec![
                HeroSlide {
                    eyebrow: Some("Survey. Map. Deliver.".to_string()),
                    title: "Professional drones for serious work".to_string(),
                    subtitle: Some(
                        "Survey-grade aircraft, agricultural sprayers and enterprise payloads, backed by DGCA-certified pilots.".to_string(),
                    ),
                    button_text: "Shop Drones".to_string(),
                    button_url: "/shop".to_string(),
                    image_path: "/static/images/hero/hero-surveyor.jpg".to_string(),
                    image_alt: "Surveyor drone over farmland at sunrise".to_string(),
                },
                HeroSlide {
                    eyebrow: None,
                    title: "Your fields, sprayed in hours, not days".to_string(),
                    subtitle: Some(
                        "Agri-spraying services with per-acre pricing across Karnataka and Maharashtra.".to_string(),
                    ),
                    button_text: "Book a Service".to_string(),
                    button_url: "/services".to_string(),
                    image_path: "/static/images/hero/hero-spraying.jpg".to_string(),
                    image_alt: "Agricultural drone spraying a field".to_string(),
                },
                HeroSlide {
                    eyebrow: None,
                    title: "From site survey to final ortho".to_string(),
                    subtitle: None,
                    button_text: "Talk to Us".to_string(),
                    button_url: "/contact".to_string(),
                    image_path: "/static/images/hero/hero-mapping.jpg".to_string(),
                    image_alt: "Engineer reviewing an orthomosaic map".to_string(),
                },
            ],
            autoplay_ms: Some(6000),
        }
    }
}

// =============================================================================
// Static marketing sections
// =============================================================================

/// A service card on the home page services section.
#[derive(Clone)]
pub struct ServiceCardView {
    pub title: String,
    pub description: String,
    pub icon: String,
}

/// The four service lines shown on the home page.
fn service_cards() -> Vec<ServiceCardView> {
    vec![
        ServiceCardView {
            title: "Aerial Survey & Mapping".to_string(),
            description: "Ortho-rectified maps, DEMs and contour outputs for construction, mining and irrigation projects.".to_string(),
            icon: "map".to_string(),
        },
        ServiceCardView {
            title: "Agricultural Spraying".to_string(),
            description: "Precision spraying with 10L and 16L tanks; per-acre pricing and trained operators.".to_string(),
            icon: "droplet".to_string(),
        },
        ServiceCardView {
            title: "Inspection & Monitoring".to_string(),
            description: "Towers, solar farms and pipelines inspected without scaffolding or shutdowns.".to_string(),
            icon: "eye".to_string(),
        },
        ServiceCardView {
            title: "Pilot Training".to_string(),
            description: "DGCA-syllabus small and medium category remote pilot training with exam support.".to_string(),
            icon: "award".to_string(),
        },
    ]
}

/// A customer testimonial for display on the homepage.
#[derive(Clone)]
pub struct TestimonialView {
    pub author: String,
    pub role: String,
    pub content: String,
}

/// Static testimonials for the homepage.
fn testimonials() -> Vec<TestimonialView> {
    vec![
        TestimonialView {
            author: "Ravi Kulkarni".to_string(),
            role: "Farm owner, Belagavi".to_string(),
            content: "Forty acres sprayed in a single afternoon. The crew was on time and the coverage was visibly even.".to_string(),
        },
        TestimonialView {
            author: "Meera Iyer".to_string(),
            role: "Project lead, Chennai Metro".to_string(),
            content: "The corridor survey deliverables matched our total-station checkpoints within tolerance. We now order quarterly flights.".to_string(),
        },
        TestimonialView {
            author: "Arjun Shetty".to_string(),
            role: "Solar O&M contractor".to_string(),
            content: "Thermal inspection caught twelve failing strings we would have found months later. Paid for itself on the first flight.".to_string(),
        },
    ]
}

// =============================================================================
// Template
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Hero carousel configuration.
    pub hero: HeroConfig,
    /// Featured products for the grid.
    pub featured_products: Vec<ProductCardView>,
    /// Service line cards.
    pub services: Vec<ServiceCardView>,
    /// Customer testimonials.
    pub testimonials: Vec<TestimonialView>,
}

/// Number of featured products to show on the home page.
const FEATURED_PRODUCT_COUNT: u32 = 8;

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    // Featured products are just the newest shop page; the backend orders
    // the grid newest-first
    let featured_products = state
        .commerce()
        .get_shop_products(ShopQuery {
            limit: Some(FEATURED_PRODUCT_COUNT),
            ..ShopQuery::default()
        })
        .await
        .map_or_else(
            |e| {
                tracing::error!("Failed to fetch featured products: {e}");
                Vec::new()
            },
            |page| page.items.iter().map(ProductCardView::from).collect(),
        );

    HomeTemplate {
        hero: HeroConfig::default(),
        featured_products,
        services: service_cards(),
        testimonials: testimonials(),
    }
}
