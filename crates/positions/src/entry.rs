/// Cached geometry for one item, indexed by its position in the list.
///
/// `top` and `bottom` are offsets from the start of the content. Between a
/// measurement and the next reconciliation pass, `pending_delta` holds the
/// correction discovered at this index that later entries have not absorbed yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionEntry {
	/// Item index. Never changes after allocation.
	pub index: usize,
	/// Leading edge.
	pub top: f64,
	/// Trailing edge, `top + height` once reconciled.
	pub bottom: f64,
	/// Last known height; the estimate until the item is measured.
	pub height: f64,
	/// Signed correction (`old height - new height`) not yet propagated.
	pub pending_delta: f64,
}

impl PositionEntry {
	/// Creates an entry of the estimated height starting at `top`.
	pub fn estimated(index: usize, top: f64, estimate: f64) -> Self {
		Self {
			index,
			top,
			bottom: top + estimate,
			height: estimate,
			pending_delta: 0.0,
		}
	}

	/// Returns true when a correction at this index still needs propagating.
	pub fn is_pending(&self) -> bool {
		self.pending_delta != 0.0
	}

	/// Returns true when `offset` lies inside `[top, bottom)`.
	pub fn contains(&self, offset: f64) -> bool {
		self.top <= offset && offset < self.bottom
	}
}
