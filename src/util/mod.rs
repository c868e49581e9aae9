//! Small display and search helpers shared by the views.

pub mod filter;
pub mod format;

pub use filter::{contains_ci, matches_any};
pub use format::{display_date, format_money};
