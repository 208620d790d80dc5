// self
use crate::obs::{OpKind, OpOutcome};

/// Counter incremented once per attempt and once per outcome.
pub const OP_COUNTER: &str = "webutils_op_total";

/// Increments [`OP_COUNTER`] for `kind` and `outcome`; a no-op without the `metrics` feature.
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(OP_COUNTER, "op" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcomes_are_recorded_without_a_recorder() {
		for outcome in [OpOutcome::Attempt, OpOutcome::Success, OpOutcome::Failure] {
			record_op_outcome(OpKind::Email, outcome);
		}
	}
}
