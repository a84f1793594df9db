//! Static marketing page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;

/// A milestone row on the about page timeline.
#[derive(Clone)]
pub struct MilestoneView {
    pub year: &'static str,
    pub text: &'static str,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub milestones: Vec<MilestoneView>,
}

/// Display the about page.
pub async fn about() -> impl IntoResponse {
    AboutTemplate {
        milestones: vec![
            MilestoneView {
                year: "2019",
                text: "Founded as a two-person survey crew with a single quadcopter.",
            },
            MilestoneView {
                year: "2021",
                text: "DGCA type certification for the AV-110 trainer airframe.",
            },
            MilestoneView {
                year: "2023",
                text: "Agri-spraying fleet crosses 50,000 acres serviced.",
            },
            MilestoneView {
                year: "2025",
                text: "Online store launched; same-week delivery across southern India.",
            },
        ],
    }
}
