//! # rentride
//!
//! Client core for the RentRide vehicle-rental service.
//!
//! The crate owns the session gate (persisted credentials, auth state,
//! per-navigation route guard), the HTTP client for the rental REST API,
//! the booking cost estimate, and one view-model per page. Rendering is
//! left to the front end; the `cli` crate is the terminal one.

pub mod app;
pub mod config;
pub mod estimate;
pub mod net;
pub mod pages;
pub mod routing;
pub mod state;
pub mod storage;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;
