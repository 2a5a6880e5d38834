//! Authentication module for the docrender SDK
//!
//! Basic-credential login against `/authenticate`, bearer token caching with
//! renewal ahead of expiry, and best-effort logout.

pub mod session;
pub mod types;

pub use session::AuthSession;
pub use types::{AuthToken, Credentials, User, DEFAULT_RENEWAL_MARGIN};
