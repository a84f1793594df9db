//! Authentication route handlers.
//!
//! Login, registration with OTP verification, and the password-reset flow.
//! All credential checks happen at the commerce API; the storefront's job is
//! carrying the visitor through the multi-step flows and holding the email
//! in the session between steps.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::commerce::types::RegisterRequest;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

/// OTP entry form data (registration and reset flows).
#[derive(Debug, Deserialize)]
pub struct OtpForm {
    pub otp: String,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// New password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// OTP verification page template (registration flow).
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify_otp.html")]
pub struct VerifyOtpTemplate {
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub error: Option<String>,
}

/// Reset OTP page template (password-reset flow).
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_otp.html")]
pub struct ResetOtpTemplate {
    pub email: String,
    pub error: Option<String>,
}

/// New password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Redirect to `path` with the message in the `error` query parameter.
fn redirect_with_error(path: &str, message: &str) -> Response {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message))).into_response()
}

/// Read a flow email out of the session.
async fn session_email(session: &Session, key: &str) -> Option<String> {
    session.get::<String>(key).await.ok().flatten()
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.commerce().login(&form.email, &form.password).await {
        Ok(response) => {
            let Some(user) = CurrentUser::from_login(response) else {
                tracing::error!("Login response carried an unparseable email");
                return redirect_with_error("/auth/login", "Something went wrong. Please try again.");
            };

            set_sentry_user(&user.user_id, Some(user.email.as_str()));

            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {e}");
                return redirect_with_error("/auth/login", "Session error. Please try again.");
            }

            Redirect::to("/account").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            redirect_with_error("/auth/login", &e.user_message())
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();

    Redirect::to("/").into_response()
}

// =============================================================================
// Registration + OTP verification
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
///
/// On success the API emails an OTP; the visitor is sent to the verification
/// page with their email held in the session.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return redirect_with_error("/auth/register", "Passwords do not match.");
    }

    if form.password.len() < 8 {
        return redirect_with_error("/auth/register", "Password must be at least 8 characters.");
    }

    let phone = form.phone.trim();
    let request = RegisterRequest {
        user_name: form.user_name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        phone: if phone.is_empty() {
            None
        } else {
            Some(phone.to_string())
        },
    };

    match state.commerce().register(&request).await {
        Ok(response) => {
            if let Err(e) = session
                .insert(session_keys::PENDING_VERIFICATION_EMAIL, &response.email)
                .await
            {
                tracing::error!("Failed to store pending verification email: {e}");
            }
            Redirect::to("/auth/verify-otp").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            redirect_with_error("/auth/register", &e.user_message())
        }
    }
}

/// Display the OTP verification page.
pub async fn verify_otp_page(session: Session, Query(query): Query<MessageQuery>) -> Response {
    let Some(email) = session_email(&session, session_keys::PENDING_VERIFICATION_EMAIL).await
    else {
        // No registration in flight; start over
        return Redirect::to("/auth/register").into_response();
    };

    VerifyOtpTemplate {
        email,
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle OTP verification.
#[instrument(skip(state, session, form))]
pub async fn verify_otp(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OtpForm>,
) -> Response {
    let Some(email) = session_email(&session, session_keys::PENDING_VERIFICATION_EMAIL).await
    else {
        return Redirect::to("/auth/register").into_response();
    };

    match state.commerce().verify_otp(&email, form.otp.trim()).await {
        Ok(_) => {
            let _ = session
                .remove::<String>(session_keys::PENDING_VERIFICATION_EMAIL)
                .await;
            Redirect::to("/auth/login?success=Account%20verified.%20Please%20log%20in.")
                .into_response()
        }
        Err(e) => {
            tracing::warn!("OTP verification failed: {e}");
            redirect_with_error("/auth/verify-otp", &e.user_message())
        }
    }
}

/// Resend the registration OTP.
#[instrument(skip(state, session))]
pub async fn resend_otp(State(state): State<AppState>, session: Session) -> Response {
    let Some(email) = session_email(&session, session_keys::PENDING_VERIFICATION_EMAIL).await
    else {
        return Redirect::to("/auth/register").into_response();
    };

    match state.commerce().resend_otp(&email).await {
        Ok(_) => {
            Redirect::to("/auth/verify-otp?success=A%20new%20code%20is%20on%20its%20way.")
                .into_response()
        }
        Err(e) => {
            tracing::warn!("OTP resend failed: {e}");
            redirect_with_error("/auth/verify-otp", &e.user_message())
        }
    }
}

// =============================================================================
// Password Reset
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    ForgotPasswordTemplate { error: query.error }
}

/// Handle forgot password form submission.
///
/// Always proceeds to the OTP page to prevent email enumeration; a wrong
/// email just means no code ever arrives.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn forgot_password(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let email = form.email.trim().to_string();

    if let Err(e) = state.commerce().forgot_password(&email).await {
        tracing::warn!("Password reset request failed: {e}");
        // Still proceed to prevent email enumeration
    }

    if let Err(e) = session
        .insert(session_keys::PASSWORD_RESET_EMAIL, &email)
        .await
    {
        tracing::error!("Failed to store reset email: {e}");
    }

    Redirect::to("/auth/reset-otp").into_response()
}

/// Display the reset OTP page.
pub async fn reset_otp_page(session: Session, Query(query): Query<MessageQuery>) -> Response {
    let Some(email) = session_email(&session, session_keys::PASSWORD_RESET_EMAIL).await else {
        return Redirect::to("/auth/forgot-password").into_response();
    };

    ResetOtpTemplate {
        email,
        error: query.error,
    }
    .into_response()
}

/// Handle reset OTP verification.
#[instrument(skip(state, session, form))]
pub async fn verify_reset_otp(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OtpForm>,
) -> Response {
    let Some(email) = session_email(&session, session_keys::PASSWORD_RESET_EMAIL).await else {
        return Redirect::to("/auth/forgot-password").into_response();
    };

    match state
        .commerce()
        .verify_reset_otp(&email, form.otp.trim())
        .await
    {
        Ok(_) => Redirect::to("/auth/reset-password").into_response(),
        Err(e) => {
            tracing::warn!("Reset OTP verification failed: {e}");
            redirect_with_error("/auth/reset-otp", &e.user_message())
        }
    }
}

/// Display the new password page.
pub async fn reset_password_page(session: Session, Query(query): Query<MessageQuery>) -> Response {
    if session_email(&session, session_keys::PASSWORD_RESET_EMAIL)
        .await
        .is_none()
    {
        return Redirect::to("/auth/forgot-password").into_response();
    }

    ResetPasswordTemplate { error: query.error }.into_response()
}

/// Handle new password submission.
#[instrument(skip(state, session, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let Some(email) = session_email(&session, session_keys::PASSWORD_RESET_EMAIL).await else {
        return Redirect::to("/auth/forgot-password").into_response();
    };

    if form.password != form.password_confirm {
        return redirect_with_error("/auth/reset-password", "Passwords do not match.");
    }

    if form.password.len() < 8 {
        return redirect_with_error(
            "/auth/reset-password",
            "Password must be at least 8 characters.",
        );
    }

    match state
        .commerce()
        .reset_password(&email, &form.password)
        .await
    {
        Ok(_) => {
            let _ = session
                .remove::<String>(session_keys::PASSWORD_RESET_EMAIL)
                .await;
            Redirect::to("/auth/login?success=Password%20updated.%20Please%20log%20in.")
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Password reset failed: {e}");
            redirect_with_error("/auth/reset-password", &e.user_message())
        }
    }
}
