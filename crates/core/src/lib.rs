//! Aerovane Core - Shared types library.
//!
//! This crate provides common types used by the Aerovane web frontend:
//! - `storefront` - Public-facing marketing and shop site
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! Every durable record (users, products, carts, orders) is owned by the
//! remote commerce API; these types exist so the frontend can refer to those
//! records without mixing up raw integers and strings.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
