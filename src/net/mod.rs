//! Backend API access: wire types, typed errors, the intercepting client and
//! one module of endpoint calls per backend resource.

pub mod auth;
pub mod error;
pub mod events;
pub mod faq;
pub mod http;
pub mod messages;
pub mod tickets;
pub mod types;
pub mod users;

pub use error::{ApiError, ErrorKind};
pub use http::ApiClient;

#[cfg(test)]
#[path = "helpers_test.rs"]
pub mod test_helpers;
