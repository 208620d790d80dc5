//! XSS-filtering request decorator.
//!
//! [`XssHandler::handle`] wraps an inbound [`Request`] in an [`XssRequest`] before handing it to
//! the user-supplied [`XssHandler::filter`]. Every value read through the wrapper's sanitized
//! accessors passes through [`sanitize`] first; the raw request stays reachable through
//! [`XssRequest::inner`].

mod handler;
mod request;
mod sanitize;

pub use handler::*;
pub use request::*;
pub use sanitize::sanitize;
