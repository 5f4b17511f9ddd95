//! Prefix-carry propagation of pending height deltas.
//!
//! Measurement only moves the measured entry. This pass walks forward from a
//! start index and lays every later entry against its predecessor's trailing
//! edge, which shifts it by the sum of the deltas seen so far. Any number of
//! corrections is absorbed in one O(n) sweep.
//!
//! Offsets are re-derived from heights rather than shifted by subtraction, so
//! `bottom == top + height` holds exactly however many fractional corrections
//! an entry has seen.
//!
//! The pass works on an owned cache and hands an owned cache back, which lets
//! callers run it on a worker without sharing the caller's copy.

use crate::cache::PositionCache;

/// Corrected cache returned by [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
	/// Cache with no pending delta at or after the start index.
	pub cache: PositionCache,
	/// Trailing edge of the last entry after correction.
	pub total_extent: f64,
}

/// Consumes `cache`, propagates pending deltas from `start`, and returns it.
pub fn reconcile(mut cache: PositionCache, start: usize) -> Reconciled {
	let total_extent = reconcile_in_place(&mut cache, start);
	Reconciled { cache, total_extent }
}

/// Propagates pending deltas from `start` through the end of `cache`.
///
/// Entries before `start` are assumed consistent and left untouched. A start
/// past the last index is clamped to it. Returns the new total extent.
pub fn reconcile_in_place(cache: &mut PositionCache, start: usize) -> f64 {
	let Some(last) = cache.len().checked_sub(1) else {
		return 0.0;
	};
	let start = start.min(last);
	let entries = cache.entries_mut();

	let mut carry = std::mem::take(&mut entries[start].pending_delta);
	let mut absorbed = usize::from(carry != 0.0);
	for i in start + 1..entries.len() {
		let prev_bottom = entries[i - 1].bottom;
		let entry = &mut entries[i];
		entry.top = prev_bottom;
		entry.bottom = entry.top + entry.height;
		if entry.pending_delta != 0.0 {
			carry += std::mem::take(&mut entry.pending_delta);
			absorbed += 1;
		}
	}

	cache.mark_clean_from(start);
	let total_extent = cache.total_extent();
	tracing::trace!(start, absorbed, carry, total_extent, "positions.reconcile");
	total_extent
}
