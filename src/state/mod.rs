//! Client-side state: the persisted session, the auth context that owns it,
//! and the scope that hands both to views.
//!
//! DESIGN
//! ======
//! The session is the only shared mutable resource in the client. It is
//! written exclusively through [`auth::AuthContext`]; everything else reads.

pub mod auth;
pub mod context;
pub mod session;

pub use auth::{AuthContext, AuthPhase, AuthState};
pub use context::{MissingProvider, Scope, use_api, use_auth};
pub use session::{Session, SessionStore};
