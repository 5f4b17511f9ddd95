//! Offset bookkeeping for dynamically sized list items.
//!
//! A [`PositionCache`] starts out filled with estimated heights. Rendered items
//! are measured and corrected locally with [`PositionCache::record_measurement`],
//! and [`reconcile`] later carries the accumulated corrections through every
//! following entry in one pass. [`locate`] maps a scroll offset back to an
//! item index with a binary search over trailing edges.

/// Position cache and local measurement recording.
pub mod cache;
/// Single entry geometry.
pub mod entry;
/// Scroll offset to item index lookup.
pub mod locate;
/// Forward propagation of pending height deltas.
pub mod reconcile;

pub use cache::{MeasureError, Measured, PositionCache};
pub use entry::PositionEntry;
pub use locate::{Probe, locate, probe};
pub use reconcile::{Reconciled, reconcile, reconcile_in_place};
