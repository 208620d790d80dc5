// self
use crate::{
	_prelude::*,
	obs::{self, OpKind, OpOutcome},
};

/// `tracing::Instrumented` with the feature on, the bare future otherwise.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// `tracing::Instrumented` with the feature on, the bare future otherwise.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// One observed call to a helper: a `webutils.op` span plus its attempt/outcome counters.
///
/// [`OpSpan::start`] counts the attempt; [`OpSpan::finish`] counts the outcome and reports
/// failures.
#[derive(Clone, Debug)]
pub struct OpSpan {
	kind: OpKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Opens the span for `kind` at call site `stage` and counts the attempt.
	pub fn start(kind: OpKind, stage: &'static str) -> Self {
		obs::record_op_outcome(kind, OpOutcome::Attempt);

		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("webutils.op", op = kind.as_str(), stage);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Operation this span observes.
	pub fn kind(&self) -> OpKind {
		self.kind
	}

	/// Runs `f` inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to `fut` so no guard is held across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Counts the outcome of `result`; failures are also reported through [`report_failure`].
	pub fn finish<T>(&self, result: &Result<T>) {
		match result {
			Ok(_) => obs::record_op_outcome(self.kind, OpOutcome::Success),
			Err(err) => {
				obs::record_op_outcome(self.kind, OpOutcome::Failure);
				self.in_scope(|| report_failure(self.kind, err));
			},
		}
	}
}

/// Emits an `error` event for a failed operation.
pub fn report_failure(kind: OpKind, err: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(op = kind.as_str(), error = %err, "{}", err.error_code());
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, err);
	}
}
