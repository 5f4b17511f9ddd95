use pretty_assertions::assert_eq;

use super::*;

#[test]
fn new_lays_out_estimated_heights() {
	let cache = PositionCache::new(1000, 90.0);
	assert_eq!(cache.len(), 1000);
	assert_eq!(cache.total_extent(), 90_000.0);
	assert_eq!(
		cache.get(3).copied(),
		Some(PositionEntry {
			index: 3,
			top: 270.0,
			bottom: 360.0,
			height: 90.0,
			pending_delta: 0.0,
		})
	);
	assert!(!cache.is_dirty());
}

#[test]
fn empty_cache_has_zero_extent() {
	let cache = PositionCache::new(0, 90.0);
	assert!(cache.is_empty());
	assert_eq!(cache.total_extent(), 0.0);
	assert_eq!(cache.leading_offset(0), 0.0);
}

#[test]
fn measurement_moves_only_the_measured_entry() {
	let mut cache = PositionCache::new(10, 90.0);
	assert_eq!(cache.record_measurement(3, 50.0), Ok(Measured::Corrected { delta: 40.0 }));

	let entry = cache.get(3).copied().unwrap();
	assert_eq!(entry.top, 270.0);
	assert_eq!(entry.bottom, 320.0);
	assert_eq!(entry.height, 50.0);
	assert_eq!(entry.pending_delta, 40.0);

	// Successors stay stale until reconciliation.
	assert_eq!(cache.get(4).map(|e| e.top), Some(360.0));
	assert_eq!(cache.dirty_from(), Some(3));
}

#[test]
fn matching_measurement_is_a_no_op() {
	let mut cache = PositionCache::new(10, 90.0);
	let before = cache.clone();
	assert_eq!(cache.record_measurement(4, 90.0), Ok(Measured::Unchanged));
	assert_eq!(cache, before);
}

#[test]
fn repeated_corrections_at_one_index_add_up() {
	let mut cache = PositionCache::new(10, 90.0);
	let _ = cache.record_measurement(2, 50.0);
	assert_eq!(cache.record_measurement(2, 60.0), Ok(Measured::Corrected { delta: -10.0 }));

	let entry = cache.get(2).copied().unwrap();
	assert_eq!(entry.bottom, entry.top + 60.0);
	assert_eq!(entry.pending_delta, 30.0);
}

#[test]
fn reverting_a_correction_clears_dirty_state() {
	let mut cache = PositionCache::new(10, 90.0);
	let _ = cache.record_measurement(2, 50.0);
	let _ = cache.record_measurement(6, 100.0);
	assert_eq!(cache.dirty_from(), Some(2));

	let _ = cache.record_measurement(2, 90.0);
	assert_eq!(cache.get(2).map(|e| e.pending_delta), Some(0.0));
	assert_eq!(cache.dirty_from(), Some(6));

	let _ = cache.record_measurement(6, 90.0);
	assert_eq!(cache.dirty_from(), None);
}

#[test]
fn dirty_from_tracks_the_lowest_index() {
	let mut cache = PositionCache::new(20, 90.0);
	let _ = cache.record_measurement(10, 120.0);
	let _ = cache.record_measurement(3, 50.0);
	let _ = cache.record_measurement(15, 10.0);
	assert_eq!(cache.dirty_from(), Some(3));
}

#[test]
fn rejects_out_of_range_index() {
	let mut cache = PositionCache::new(5, 90.0);
	assert_eq!(cache.record_measurement(5, 40.0), Err(MeasureError::OutOfRange { index: 5, len: 5 }));
}

#[test]
fn rejects_degenerate_heights() {
	let mut cache = PositionCache::new(5, 90.0);
	for height in [0.0, -4.0, f64::NAN, f64::INFINITY] {
		assert!(matches!(cache.record_measurement(1, height), Err(MeasureError::InvalidHeight { index: 1, .. })));
	}
	assert!(!cache.is_dirty());
}

#[test]
fn leading_offset_is_predecessor_bottom() {
	let mut cache = PositionCache::new(5, 90.0);
	let _ = cache.record_measurement(0, 30.0);
	assert_eq!(cache.leading_offset(0), 0.0);
	assert_eq!(cache.leading_offset(1), 30.0);
	assert_eq!(cache.leading_offset(99), cache.total_extent());
}

#[test]
fn fractional_estimate_lays_out_contiguous_entries() {
	let cache = PositionCache::new(500, 33.3);
	for entry in cache.entries() {
		assert_eq!(entry.bottom, entry.top + entry.height, "entry {}", entry.index);
	}
	for pair in cache.entries().windows(2) {
		assert_eq!(pair[1].top, pair[0].bottom, "entry {}", pair[1].index);
	}
}

#[test]
fn fractional_corrections_keep_bottom_derived_from_top() {
	let mut cache = PositionCache::new(10, 90.0);
	let top = cache.get(4).map(|e| e.top).unwrap();
	for height in [50.3, 33.7, 12.34, 71.9] {
		let _ = cache.record_measurement(4, height);
		let entry = cache.get(4).copied().unwrap();
		assert_eq!(entry.top, top);
		assert_eq!(entry.bottom, top + height);
	}
	assert!(cache.is_dirty());
}
