//! Account route handlers (profile and addresses).
//!
//! Everything here requires a logged-in user; the commerce API owns the
//! records and enforces ownership via the bearer token and `user_id`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use aerovane_core::AddressId;

use crate::commerce::types::{
    Address, AddressCreate, AddressUpdate, ProfileImage, ProfileUpdate, UserProfile,
};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Profile display data for templates.
#[derive(Clone)]
pub struct ProfileView {
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub alternative_phone: String,
    pub profile_image_url: Option<String>,
    pub verified: bool,
}

impl From<&UserProfile> for ProfileView {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_name: profile.user_name.clone(),
            full_name: format!("{} {}", profile.first_name, profile.last_name),
            email: profile.email.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            alternative_phone: profile.alternative_phone.clone().unwrap_or_default(),
            profile_image_url: profile.profile_image_url.clone(),
            verified: profile.is_verify,
        }
    }
}

/// Address display data for templates.
#[derive(Clone)]
pub struct AddressView {
    pub id: i64,
    pub address_type: String,
    pub summary: String,
    pub is_default: bool,
}

impl From<&Address> for AddressView {
    fn from(address: &Address) -> Self {
        Self {
            id: address.address_id.get(),
            address_type: address.address_type.clone(),
            summary: [
                Some(address.address_line1.as_str()),
                address.address_line2.as_deref().filter(|s| !s.is_empty()),
                Some(address.city.as_str()),
                Some(address.state_province.as_str()),
                Some(address.postal_code.as_str()),
                Some(address.country.as_str()),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", "),
            is_default: address.is_default,
        }
    }
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Address form data (create and edit share the shape).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub address_type: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state_province: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    /// Checkbox; present means checked.
    pub is_default: Option<String>,
}

impl AddressForm {
    fn line2(&self) -> Option<String> {
        let line2 = self.address_line2.trim();
        if line2.is_empty() {
            None
        } else {
            Some(line2.to_string())
        }
    }

    fn to_create(&self) -> AddressCreate {
        AddressCreate {
            address_type: self.address_type.trim().to_string(),
            address_line1: self.address_line1.trim().to_string(),
            address_line2: self.line2(),
            city: self.city.trim().to_string(),
            state_province: self.state_province.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
            is_default: Some(self.is_default.is_some()),
        }
    }

    fn to_update(&self) -> AddressUpdate {
        AddressUpdate {
            address_type: Some(self.address_type.trim().to_string()),
            address_line1: Some(self.address_line1.trim().to_string()),
            address_line2: self.line2(),
            city: Some(self.city.trim().to_string()),
            state_province: Some(self.state_province.trim().to_string()),
            postal_code: Some(self.postal_code.trim().to_string()),
            country: Some(self.country.trim().to_string()),
            is_default: Some(self.is_default.is_some()),
        }
    }

    fn from_address(address: &Address) -> Self {
        Self {
            address_type: address.address_type.clone(),
            address_line1: address.address_line1.clone(),
            address_line2: address.address_line2.clone().unwrap_or_default(),
            city: address.city.clone(),
            state_province: address.state_province.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            is_default: address.is_default.then(|| "on".to_string()),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub profile: ProfileView,
    pub addresses: Vec<AddressView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Address list template.
#[derive(Template, WebTemplate)]
#[template(path = "account/addresses.html")]
pub struct AddressesTemplate {
    pub addresses: Vec<AddressView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Address form template (create and edit).
#[derive(Template, WebTemplate)]
#[template(path = "account/address_form.html")]
pub struct AddressFormTemplate {
    pub heading: &'static str,
    pub action: String,
    pub form: AddressForm,
}

// =============================================================================
// Handlers
// =============================================================================

/// Account overview: profile plus addresses.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<AccountTemplate> {
    let profile = state
        .commerce()
        .get_user(&user.access_token, user.user_id)
        .await?;

    let addresses = state
        .commerce()
        .list_addresses(&user.access_token, user.user_id)
        .await
        .map_or_else(
            |e| {
                tracing::warn!("Failed to list addresses: {e}");
                Vec::new()
            },
            |addresses| addresses.iter().map(AddressView::from).collect(),
        );

    Ok(AccountTemplate {
        profile: ProfileView::from(&profile),
        addresses,
        error: query.error,
        success: query.success,
    })
}

/// Update the profile from a multipart form (text fields plus an optional
/// `profile_image` file).
#[instrument(skip(state, user, multipart))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Response {
    let mut update = ProfileUpdate::default();
    let mut image: Option<ProfileImage> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if name == "profile_image" {
            let file_name = field.file_name().map(ToString::to_string);
            let content_type = field.content_type().map(ToString::to_string);
            match field.bytes().await {
                Ok(bytes) if !bytes.is_empty() => {
                    image = Some(ProfileImage {
                        file_name: file_name.unwrap_or_else(|| "profile".to_string()),
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                // An empty file input still submits a zero-byte part
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read profile image upload: {e}");
                }
            }
            continue;
        }

        let Ok(value) = field.text().await else {
            continue;
        };
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }

        match name.as_str() {
            "user_name" => update.user_name = Some(value),
            "email" => update.email = Some(value),
            "first_name" => update.first_name = Some(value),
            "last_name" => update.last_name = Some(value),
            "phone" => update.phone = Some(value),
            "alternative_phone" => update.alternative_phone = Some(value),
            _ => {}
        }
    }

    match state
        .commerce()
        .update_user(&user.access_token, user.user_id, &update, image)
        .await
    {
        Ok(_) => Redirect::to("/account?success=Profile%20updated").into_response(),
        Err(e) => {
            tracing::warn!("Profile update failed: {e}");
            let url = format!("/account?error={}", urlencoding::encode(&e.user_message()));
            Redirect::to(&url).into_response()
        }
    }
}

/// Address list page.
#[instrument(skip(state, user))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<AddressesTemplate> {
    let addresses = state
        .commerce()
        .list_addresses(&user.access_token, user.user_id)
        .await?;

    Ok(AddressesTemplate {
        addresses: addresses.iter().map(AddressView::from).collect(),
        error: query.error,
        success: query.success,
    })
}

/// New address form.
pub async fn new_address(RequireAuth(_user): RequireAuth) -> impl IntoResponse {
    AddressFormTemplate {
        heading: "Add address",
        action: "/account/addresses".to_string(),
        form: AddressForm {
            country: "India".to_string(),
            ..AddressForm::default()
        },
    }
}

/// Create an address.
#[instrument(skip(state, user, form))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddressForm>,
) -> Response {
    match state
        .commerce()
        .create_address(&user.access_token, user.user_id, &form.to_create())
        .await
    {
        Ok(_) => Redirect::to("/account/addresses?success=Address%20saved").into_response(),
        Err(e) => {
            tracing::warn!("Address create failed: {e}");
            let url = format!(
                "/account/addresses?error={}",
                urlencoding::encode(&e.user_message())
            );
            Redirect::to(&url).into_response()
        }
    }
}

/// Edit address form, prefilled from the API.
#[instrument(skip(state, user))]
pub async fn edit_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<AddressFormTemplate> {
    let address = state
        .commerce()
        .get_address(&user.access_token, user.user_id, AddressId::new(id))
        .await?;

    Ok(AddressFormTemplate {
        heading: "Edit address",
        action: format!("/account/addresses/{id}"),
        form: AddressForm::from_address(&address),
    })
}

/// Update an address.
#[instrument(skip(state, user, form))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Form(form): Form<AddressForm>,
) -> Response {
    match state
        .commerce()
        .update_address(
            &user.access_token,
            user.user_id,
            AddressId::new(id),
            &form.to_update(),
        )
        .await
    {
        Ok(_) => Redirect::to("/account/addresses?success=Address%20updated").into_response(),
        Err(e) => {
            tracing::warn!("Address update failed: {e}");
            let url = format!(
                "/account/addresses?error={}",
                urlencoding::encode(&e.user_message())
            );
            Redirect::to(&url).into_response()
        }
    }
}

/// Delete an address.
#[instrument(skip(state, user))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Response {
    match state
        .commerce()
        .delete_address(&user.access_token, user.user_id, AddressId::new(id))
        .await
    {
        Ok(_) => Redirect::to("/account/addresses?success=Address%20removed").into_response(),
        Err(e) => {
            tracing::warn!("Address delete failed: {e}");
            let url = format!(
                "/account/addresses?error={}",
                urlencoding::encode(&e.user_message())
            );
            Redirect::to(&url).into_response()
        }
    }
}

/// Make an address the default.
#[instrument(skip(state, user))]
pub async fn make_default_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Response {
    match state
        .commerce()
        .make_default_address(&user.access_token, user.user_id, AddressId::new(id))
        .await
    {
        Ok(_) => Redirect::to("/account/addresses?success=Default%20address%20set").into_response(),
        Err(e) => {
            tracing::warn!("Make-default failed: {e}");
            let url = format!(
                "/account/addresses?error={}",
                urlencoding::encode(&e.user_message())
            );
            Redirect::to(&url).into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            address_id: AddressId::new(4),
            address_type: "home".to_string(),
            address_line1: "14 MG Road".to_string(),
            address_line2: Some("".to_string()),
            city: "Bengaluru".to_string(),
            state_province: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: "India".to_string(),
            is_default: true,
        }
    }

    #[test]
    fn test_address_view_summary_skips_empty_line2() {
        let view = AddressView::from(&address());
        assert_eq!(
            view.summary,
            "14 MG Road, Bengaluru, Karnataka, 560001, India"
        );
        assert!(view.is_default);
    }

    #[test]
    fn test_form_to_create_checkbox_semantics() {
        let form = AddressForm {
            address_type: " home ".to_string(),
            address_line1: "14 MG Road".to_string(),
            is_default: Some("on".to_string()),
            ..AddressForm::default()
        };
        let create = form.to_create();
        assert_eq!(create.address_type, "home");
        assert_eq!(create.is_default, Some(true));

        let form = AddressForm::default();
        assert_eq!(form.to_create().is_default, Some(false));
    }

    #[test]
    fn test_form_roundtrip_from_address() {
        let form = AddressForm::from_address(&address());
        assert_eq!(form.city, "Bengaluru");
        assert!(form.is_default.is_some());

        let update = form.to_update();
        assert_eq!(update.city.as_deref(), Some("Bengaluru"));
        // Blank line2 collapses to None rather than overwriting with ""
        assert!(update.address_line2.is_none());
    }
}
