//! Shared newtype wrappers.

mod email;
mod id;
mod price;
mod status;

pub use email::{Email, EmailError};
pub use id::{AddressId, CartItemId, CategoryId, ProductId, ServiceRequestId, UserId};
pub use price::{Amount, AmountParseError};
pub use status::{FlowType, PaymentStatus};
