//! Shared client-side state.
//!
//! DESIGN
//! ======
//! `session` owns who is logged in, `auth` is the operation set consumers
//! call to change it, and `fetch`/`paginated` wrap arbitrary loads with
//! observable `{data, loading, error}` state.

pub mod auth;
pub mod fetch;
pub mod paginated;
pub mod session;

pub use auth::{Access, Auth};
pub use fetch::{FetchOptions, FetchState, Resource};
pub use paginated::{PageMeta, Paginated};
pub use session::{SessionState, SessionStore};
