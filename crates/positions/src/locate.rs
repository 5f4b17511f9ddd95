use std::cmp::Ordering;

use crate::entry::PositionEntry;

/// Raw result of searching trailing edges for an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
	/// `entries[i].bottom` equals the offset exactly.
	Edge(usize),
	/// First index whose trailing edge lies past the offset. Equals the entry
	/// count when the offset is at or beyond the end of the content.
	Within(usize),
}

/// Binary search over trailing edges with a three-way comparison.
///
/// Requires `bottom` to be strictly increasing, which holds whenever every
/// height is positive and the cache has been reconciled.
pub fn probe(entries: &[PositionEntry], offset: f64) -> Probe {
	match entries.binary_search_by(|entry| compare_edge(entry, offset)) {
		Ok(index) => Probe::Edge(index),
		Err(index) => Probe::Within(index),
	}
}

fn compare_edge(entry: &PositionEntry, offset: f64) -> Ordering {
	entry.bottom.total_cmp(&offset)
}

/// Returns the first item still visible at scroll offset `offset`.
///
/// That is the unique `i` with `top <= offset < bottom`. An offset landing
/// exactly on a trailing edge belongs to the following item, since the item
/// ending there has no visible pixels left. Offsets outside the content clamp
/// to the first or last item. Returns 0 for an empty slice.
pub fn locate(entries: &[PositionEntry], offset: f64) -> usize {
	let Some(last) = entries.len().checked_sub(1) else {
		return 0;
	};
	let offset = if offset.is_nan() { 0.0 } else { offset.max(0.0) };
	let index = match probe(entries, offset) {
		Probe::Edge(index) => index + 1,
		Probe::Within(index) => index,
	};
	index.min(last)
}
