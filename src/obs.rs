//! Optional observability helpers shared by every helper in the crate.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `webutils.op` with the `op` (operation) and
//!   `stage` (call site) fields, plus error events for failures that never reach a caller.
//! - Enable `metrics` to increment the `webutils_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Authorization redirect construction.
	Authorize,
	/// Authorization Code token exchange.
	AuthorizationCode,
	/// Client Credentials token request.
	ClientCredentials,
	/// Bearer-authenticated call to a protected resource.
	ProtectedResource,
	/// Email notification rendering + dispatch.
	Email,
	/// XSS-filtered request handling.
	XssFilter,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Authorize => "authorize",
			OpKind::AuthorizationCode => "authorization_code",
			OpKind::ClientCredentials => "client_credentials",
			OpKind::ProtectedResource => "protected_resource",
			OpKind::Email => "email",
			OpKind::XssFilter => "xss_filter",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
