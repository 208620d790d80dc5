//! Transport error mapping.

// crates.io
use oauth2::HttpClientError;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	obs::OpKind,
};

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(&self, kind: OpKind, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, _kind: OpKind, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			other => map_generic_error(other),
		}
	}
}

/// Maps the transport-independent [`HttpClientError`] variants.
///
/// Custom mappers can delegate here after handling their transport-specific variant.
pub fn map_generic_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unrecognized transport failure".into() }.into(),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	TransportError::from(err).into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, ThisError)]
	#[error("Socket hung up.")]
	struct HungUp;

	#[test]
	fn generic_variants_map_to_transport_errors() {
		let err = map_generic_error::<HungUp>(HttpClientError::Reqwest(Box::new(HungUp)));

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));

		let err = map_generic_error::<HungUp>(HttpClientError::Other("timeout".into()));

		assert!(matches!(
			err,
			Error::Transport(TransportError::Other { ref message }) if message == "timeout"
		));

		let err = map_generic_error::<HungUp>(HttpClientError::Io(std::io::Error::other("eof")));

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	}
}
