//! Network layer: wire types, the API client and its error type.

pub mod api;
pub mod error;
pub mod types;

pub use api::{ApiClient, RentalApi};
pub use error::ApiError;
