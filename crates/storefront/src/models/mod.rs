//! Domain models for storefront.
//!
//! The storefront owns no durable records; everything here is session-held
//! state mirroring the last response from the commerce API.

mod session;

pub use session::{CurrentUser, session_keys};
