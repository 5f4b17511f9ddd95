use std::ops::RangeInclusive;

/// Inclusive range of item indices handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
	/// First rendered index.
	pub start: usize,
	/// Last rendered index, inclusive.
	pub end: usize,
}

impl VisibleRange {
	/// Number of rendered items.
	pub fn len(&self) -> usize {
		self.end - self.start + 1
	}

	/// Always false; a range holds at least one item.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Returns true if `index` is rendered.
	pub fn contains(&self, index: usize) -> bool {
		self.start <= index && index <= self.end
	}

	/// Rendered indices in order.
	pub fn indices(&self) -> RangeInclusive<usize> {
		self.start..=self.end
	}

	/// Window rendered around `anchor`.
	///
	/// Spans `buffer` items before the anchor and `visible_count + buffer`
	/// after it, clamped to `[0, total)`. When the end is clamped at the last
	/// item the start moves back instead, so the window still covers at least
	/// `visible_count` items whenever the list has that many.
	///
	/// `total` must be non-zero.
	pub fn around(anchor: usize, total: usize, visible_count: usize, buffer: usize) -> Self {
		debug_assert!(total > 0, "windowing an empty list");
		let last = total.saturating_sub(1);
		let anchor = anchor.min(last);
		let end = anchor.saturating_add(visible_count).saturating_add(buffer).min(last);
		let start = anchor.saturating_sub(buffer).min((end + 1).saturating_sub(visible_count));
		Self { start, end }
	}
}

/// Scroll-derived state recomputed on every qualifying scroll and after every
/// applied reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
	/// Scroll offset after clamping to the scrollable range.
	pub scroll_offset: f64,
	/// First item still visible at `scroll_offset`.
	pub anchor_index: usize,
	/// Rendered window including the buffer.
	pub visible: VisibleRange,
	/// Total scrollable length from the last consistent cache.
	pub total_content_extent: f64,
}

/// Clamps a raw scroll offset to `[0, max(extent - viewport, 0)]`. NaN maps to 0.
pub fn clamp_scroll(offset: f64, total_extent: f64, viewport_height: f64) -> f64 {
	if offset.is_nan() {
		return 0.0;
	}
	let max = (total_extent - viewport_height).max(0.0);
	offset.clamp(0.0, max)
}
