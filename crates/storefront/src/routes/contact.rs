//! Contact page route handlers.
//!
//! The contact form is a general inquiry; it lands in the same queue as
//! service inquiries, tagged with the `other` service type.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use aerovane_core::Email;

use crate::commerce::types::ServiceRequestCreate;
use crate::filters;
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub form: ContactForm,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl ContactTemplate {
    fn blank() -> Self {
        Self {
            form: ContactForm::default(),
            error: None,
            success: None,
        }
    }
}

/// Display the contact page.
pub async fn index() -> impl IntoResponse {
    ContactTemplate::blank()
}

/// Handle a contact form submission.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let name = form.name.trim().to_string();
    let message = form.message.trim().to_string();
    if name.is_empty() || message.is_empty() {
        return ContactTemplate {
            form,
            error: Some("Name and message are required.".to_string()),
            ..ContactTemplate::blank()
        };
    }

    let Ok(email) = Email::parse(&form.email) else {
        return ContactTemplate {
            form,
            error: Some("Please enter a valid email address.".to_string()),
            ..ContactTemplate::blank()
        };
    };

    let request = ServiceRequestCreate {
        name,
        email: email.into_inner(),
        mobile_number: form.mobile_number.trim().to_string(),
        city: form.city.trim().to_string(),
        service_type: "other".to_string(),
        message: Some(message),
    };

    match state.commerce().create_service_request(&request).await {
        Ok(_) => ContactTemplate {
            success: Some("Message received. We reply within one working day.".to_string()),
            ..ContactTemplate::blank()
        },
        Err(e) => {
            tracing::warn!("Contact submission failed: {e}");
            ContactTemplate {
                form,
                error: Some(e.user_message()),
                ..ContactTemplate::blank()
            }
        }
    }
}
