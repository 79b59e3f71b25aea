//! Client core for the theatre ticket storefront.
//!
//! The crate owns everything a front end needs between the user and the
//! ticketing backend: the persisted login session, an HTTP client whose
//! interceptors handle expiry and outages in one place, typed calls for every
//! backend resource, observable fetch and pagination state, and validated
//! forms. Rendering is left to the host; navigation and user notices reach it
//! through the [`util::nav::Navigator`] and [`util::notify::Notifier`] traits.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Typed client configuration from the environment |
//! | [`net`] | Wire types, [`net::ApiError`], [`net::ApiClient`] and the endpoint calls |
//! | [`state`] | Session store, [`state::Auth`] operations, fetch and paginated state |
//! | [`forms`] | Validated login, registration, account and storefront forms |
//! | [`util`] | Key-value storage, navigation and notification seams |

pub mod config;
pub mod forms;
pub mod net;
pub mod state;
pub mod util;
