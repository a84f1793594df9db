//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use aerovane_core::{Email, UserId};

use crate::commerce::types::LoginResponse;

/// Session-stored user identity.
///
/// Captured from the login response and kept until logout. The access token
/// accompanies authenticated commerce API calls as a bearer header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's commerce API ID.
    pub user_id: UserId,
    /// User's email address.
    pub email: Email,
    /// Login handle.
    pub user_name: String,
    /// Display name.
    pub full_name: String,
    /// Role reported by the API (e.g., "customer").
    pub role: String,
    /// Bearer token for authenticated API calls.
    pub access_token: String,
}

impl CurrentUser {
    /// Build session state from a successful login response.
    ///
    /// Returns `None` if the response carries an email the frontend cannot
    /// even parse as one; that would mean the session key could never be
    /// used for a valid API call.
    #[must_use]
    pub fn from_login(response: LoginResponse) -> Option<Self> {
        let email = Email::parse(&response.email).ok()?;
        Some(Self {
            user_id: response.user_id,
            email,
            user_name: response.user_name,
            full_name: response.full_name,
            role: response.role,
            access_token: response.access_token,
        })
    }

    /// First name, for greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.user_name)
    }
}

/// Session keys for state held by the storefront.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the email awaiting OTP verification (registration flow).
    pub const PENDING_VERIFICATION_EMAIL: &str = "pending_verification_email";

    /// Key for the email mid password-reset (forgot password flow).
    pub const PASSWORD_RESET_EMAIL: &str = "password_reset_email";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn login_response() -> LoginResponse {
        LoginResponse {
            access_token: "tok".to_string(),
            user_id: UserId::new(5),
            user_identity_id: "e4c6".to_string(),
            user_name: "asha".to_string(),
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            role: "customer".to_string(),
        }
    }

    #[test]
    fn test_from_login() {
        let user = CurrentUser::from_login(login_response()).unwrap();
        assert_eq!(user.user_id, UserId::new(5));
        assert_eq!(user.email.as_str(), "asha@example.com");
        assert_eq!(user.first_name(), "Asha");
    }

    #[test]
    fn test_from_login_rejects_bad_email() {
        let mut response = login_response();
        response.email = "not-an-email".to_string();
        assert!(CurrentUser::from_login(response).is_none());
    }

    #[test]
    fn test_first_name_falls_back_to_user_name() {
        let mut response = login_response();
        response.full_name = "   ".to_string();
        let user = CurrentUser::from_login(response).unwrap();
        assert_eq!(user.first_name(), "asha");
    }
}
