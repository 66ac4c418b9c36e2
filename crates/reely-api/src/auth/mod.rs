//! Bearer-token authentication.

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, issue_token, verify_token, AuthState};
pub use models::{AuthClaims, AuthUser};
