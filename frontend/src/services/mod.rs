//! Browser-side services.
//!
//! # Services
//!
//! - [`bulk`] - Bulk trade submission over gloo-net
//! - [`session`] - CSRF token from the session cookie, client context
//! - [`file`] - Reading the selected CSV file

pub mod bulk;
pub mod file;
pub mod session;

pub use bulk::*;
pub use file::*;
pub use session::*;
