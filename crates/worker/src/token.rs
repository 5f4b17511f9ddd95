use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter handing out generation and request numbers.
///
/// The first value returned is 1, so 0 can stand for "nothing issued yet".
/// Clones share the same counter.
#[derive(Debug, Default, Clone)]
pub struct SequenceClock {
	last: Arc<AtomicU64>,
}

impl SequenceClock {
	/// Creates a clock that has issued nothing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues the next number.
	pub fn next(&self) -> u64 {
		self.last.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns the most recently issued number, 0 if none.
	pub fn current(&self) -> u64 {
		self.last.load(Ordering::Acquire)
	}
}
