//! Services page route handlers.
//!
//! Renders the service lines and takes inquiry submissions. An inquiry is a
//! plain record handed to the commerce API; scheduling and follow-up happen
//! on the operations side.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use aerovane_core::Email;

use crate::commerce::types::ServiceRequestCreate;
use crate::filters;
use crate::state::AppState;

/// Service types offered, as (form value, label) pairs.
pub const SERVICE_TYPES: &[(&str, &str)] = &[
    ("survey-mapping", "Aerial Survey & Mapping"),
    ("agri-spraying", "Agricultural Spraying"),
    ("inspection", "Inspection & Monitoring"),
    ("training", "Pilot Training"),
    ("other", "Something else"),
];

/// Service inquiry form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub message: String,
}

impl InquiryForm {
    /// Validate and convert to the API request shape.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when a field is missing or malformed.
    pub fn into_request(self) -> Result<ServiceRequestCreate, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Please enter your name.".to_string());
        }

        let email = Email::parse(&self.email)
            .map_err(|_| "Please enter a valid email address.".to_string())?;

        let mobile_number = self.mobile_number.trim().to_string();
        if mobile_number.is_empty() {
            return Err("Please enter a mobile number.".to_string());
        }

        let city = self.city.trim().to_string();
        if city.is_empty() {
            return Err("Please enter your city.".to_string());
        }

        let service_type = self.service_type.trim().to_string();
        if !SERVICE_TYPES.iter().any(|(value, _)| *value == service_type) {
            return Err("Please pick a service.".to_string());
        }

        let message = self.message.trim();
        let message = if message.is_empty() {
            None
        } else {
            Some(message.to_string())
        };

        Ok(ServiceRequestCreate {
            name,
            email: email.into_inner(),
            mobile_number,
            city,
            service_type,
            message,
        })
    }
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub service_types: Vec<(&'static str, &'static str)>,
    pub form: InquiryForm,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl ServicesTemplate {
    fn blank() -> Self {
        Self {
            service_types: SERVICE_TYPES.to_vec(),
            form: InquiryForm::default(),
            error: None,
            success: None,
        }
    }
}

/// Display the services page.
pub async fn index() -> impl IntoResponse {
    ServicesTemplate::blank()
}

/// Handle an inquiry submission.
///
/// Re-renders the page with a success note or the failure message; a failed
/// submission keeps the visitor's input so they can resubmit.
#[instrument(skip(state, form), fields(service_type = %form.service_type))]
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Form(form): Form<InquiryForm>,
) -> impl IntoResponse {
    let request = match form.clone().into_request() {
        Ok(request) => request,
        Err(message) => {
            return ServicesTemplate {
                form,
                error: Some(message),
                ..ServicesTemplate::blank()
            };
        }
    };

    match state.commerce().create_service_request(&request).await {
        Ok(record) => {
            tracing::info!(id = %record.id, "Service inquiry recorded");
            ServicesTemplate {
                success: Some(
                    "Thanks! Our operations team will call you within one working day."
                        .to_string(),
                ),
                ..ServicesTemplate::blank()
            }
        }
        Err(e) => {
            tracing::warn!("Service inquiry failed: {e}");
            ServicesTemplate {
                form,
                error: Some(e.user_message()),
                ..ServicesTemplate::blank()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> InquiryForm {
        InquiryForm {
            name: "Ravi Kulkarni".to_string(),
            email: "ravi@example.com".to_string(),
            mobile_number: "9000000000".to_string(),
            city: "Belagavi".to_string(),
            service_type: "agri-spraying".to_string(),
            message: "  40 acres of sugarcane  ".to_string(),
        }
    }

    #[test]
    fn test_into_request_trims_and_converts() {
        let request = valid_form().into_request().unwrap();
        assert_eq!(request.service_type, "agri-spraying");
        assert_eq!(request.message.as_deref(), Some("40 acres of sugarcane"));
    }

    #[test]
    fn test_into_request_empty_message_becomes_none() {
        let mut form = valid_form();
        form.message = "   ".to_string();
        let request = form.into_request().unwrap();
        assert!(request.message.is_none());
    }

    #[test]
    fn test_into_request_rejects_bad_email() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        assert!(form.into_request().is_err());
    }

    #[test]
    fn test_into_request_rejects_unknown_service_type() {
        let mut form = valid_form();
        form.service_type = "time-travel".to_string();
        assert!(form.into_request().is_err());
    }

    #[test]
    fn test_into_request_requires_name() {
        let mut form = valid_form();
        form.name = " ".to_string();
        assert!(form.into_request().is_err());
    }
}
