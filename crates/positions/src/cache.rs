use thiserror::Error;

use crate::entry::PositionEntry;

/// Rejected measurement.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MeasureError {
	/// The measured index is not part of the cache.
	#[error("index {index} out of range for {len} cached positions")]
	OutOfRange {
		/// Measured index.
		index: usize,
		/// Number of cached entries.
		len: usize,
	},
	/// Heights must be finite and strictly positive so trailing edges stay strictly increasing.
	#[error("invalid height {height} measured at index {index}")]
	InvalidHeight {
		/// Measured index.
		index: usize,
		/// Offending height.
		height: f64,
	},
}

/// Outcome of recording one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measured {
	/// The cached height already matched.
	Unchanged,
	/// The entry was corrected locally and now carries a pending delta.
	Corrected {
		/// `cached height - measured height` for this measurement.
		delta: f64,
	},
}

/// Per-item geometry for a fixed number of items.
///
/// Allocated once with every entry at the estimated height. Entries are never
/// added or removed; measurements correct them in place and
/// [`crate::reconcile`] restores the offset invariants for the entries that
/// follow a correction.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionCache {
	entries: Vec<PositionEntry>,
	estimate: f64,
	/// Lowest index carrying a pending delta.
	dirty_from: Option<usize>,
}

impl PositionCache {
	/// Lays out `total` items at `estimate` height each.
	pub fn new(total: usize, estimate: f64) -> Self {
		// Running sum, matching how reconciliation derives offsets.
		let mut top = 0.0;
		let entries = (0..total)
			.map(|index| {
				let entry = PositionEntry::estimated(index, top, estimate);
				top = entry.bottom;
				entry
			})
			.collect();
		tracing::trace!(total, estimate, "positions.init");
		Self {
			entries,
			estimate,
			dirty_from: None,
		}
	}

	/// Number of cached items.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the cache holds no items.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Height every entry started from.
	pub fn estimate(&self) -> f64 {
		self.estimate
	}

	/// All entries in index order.
	pub fn entries(&self) -> &[PositionEntry] {
		&self.entries
	}

	pub(crate) fn entries_mut(&mut self) -> &mut [PositionEntry] {
		&mut self.entries
	}

	/// Returns the entry at `index`.
	pub fn get(&self, index: usize) -> Option<&PositionEntry> {
		self.entries.get(index)
	}

	/// Trailing edge of the last entry, or 0 for an empty cache.
	///
	/// Only exact once every pending delta has been reconciled.
	pub fn total_extent(&self) -> f64 {
		self.entries.last().map_or(0.0, |entry| entry.bottom)
	}

	/// Offset at which `index` starts when laid out after its predecessor.
	///
	/// This is the predecessor's trailing edge, or 0 for the first item.
	pub fn leading_offset(&self, index: usize) -> f64 {
		match index.checked_sub(1) {
			Some(prev) => self.entries.get(prev).map_or_else(|| self.total_extent(), |entry| entry.bottom),
			None => 0.0,
		}
	}

	/// Lowest index still carrying a pending delta.
	pub fn dirty_from(&self) -> Option<usize> {
		self.dirty_from
	}

	/// Returns `true` if any measurement awaits reconciliation.
	pub fn is_dirty(&self) -> bool {
		self.dirty_from.is_some()
	}

	/// Records the rendered height of one item.
	///
	/// Only the measured entry moves: `height` takes the new value, `bottom` is
	/// re-derived from `top`, and the difference is parked in `pending_delta`. Later entries
	/// stay stale until reconciliation. Repeated corrections at the same index
	/// add up, so the parked delta always equals the distance between this
	/// entry's trailing edge and the one its successors were laid out against.
	pub fn record_measurement(&mut self, index: usize, actual: f64) -> Result<Measured, MeasureError> {
		let len = self.entries.len();
		let Some(entry) = self.entries.get_mut(index) else {
			return Err(MeasureError::OutOfRange { index, len });
		};
		if !actual.is_finite() || actual <= 0.0 {
			return Err(MeasureError::InvalidHeight { index, height: actual });
		}

		let delta = entry.height - actual;
		if delta == 0.0 {
			return Ok(Measured::Unchanged);
		}

		entry.height = actual;
		entry.bottom = entry.top + actual;
		entry.pending_delta += delta;
		if entry.pending_delta == 0.0 {
			// Back to the height successors were laid out against.
			if self.dirty_from == Some(index) {
				self.dirty_from = self.entries[index..].iter().position(PositionEntry::is_pending).map(|offset| index + offset);
			}
		} else {
			self.dirty_from = Some(self.dirty_from.map_or(index, |from| from.min(index)));
		}
		Ok(Measured::Corrected { delta })
	}

	/// Forgets dirty tracking for every index at or after `start`.
	pub(crate) fn mark_clean_from(&mut self, start: usize) {
		if self.dirty_from.is_some_and(|from| from >= start) {
			self.dirty_from = None;
		}
	}
}

#[cfg(test)]
mod tests;
