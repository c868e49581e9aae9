//! One view-model per screen.
//!
//! ARCHITECTURE
//! ============
//! A page is built from a [`Scope`](crate::state::Scope), pulling the auth
//! context and the API handle from it. Its state lives in a
//! [`lifecycle::ViewCell`]; front ends render snapshots and call the page's
//! async operations. Every page carries a loading flag and an inline error,
//! and drops responses that land after `unmount`.
//!
//! ERROR HANDLING
//! ==============
//! A failed request never escapes a page. It clears the loading flag and
//! sets the inline error to the server's `message` or a page-specific
//! fallback, leaving the action re-attemptable.

pub mod admin;
pub mod booking;
pub mod confirm;
pub mod layout;
pub mod lifecycle;
pub mod login;
pub mod profile;
pub mod register;
pub mod vehicle_details;
pub mod vehicles;

pub use admin::{AdminDashboard, AdminTab, ManageBookings, ManageUsers, ManageVehicles};
pub use booking::{BookingDraft, BookingPage};
pub use confirm::ConfirmGate;
pub use layout::{NavLink, nav_links};
pub use login::LoginPage;
pub use profile::ProfilePage;
pub use register::{RegisterForm, RegisterPage};
pub use vehicle_details::VehicleDetailsPage;
pub use vehicles::VehicleListPage;
