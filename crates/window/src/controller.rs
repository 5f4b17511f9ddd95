//! Scroll-driven windowing over a [`PositionCache`].
//!
//! The controller keeps two copies of the cache. The settled copy is always
//! consistent and answers scroll lookups and render offsets. The working copy
//! collects measurements from each commit and is snapshotted for
//! reconciliation; once the matching response arrives both copies are
//! replaced by the reconciled cache.

use vista_positions::{Measured, PositionCache, locate, reconcile_in_place};
use vista_worker::SequenceClock;

use crate::config::{ConfigError, ReconcileMode, WindowConfig};
use crate::reconciler::{BackgroundReconciler, ReconcileRequest, ReconcileResponse, RequestSeq, WorkerClosed};
use crate::render::{EmptyContent, Frame, HeightProbe, ItemRenderer, ItemStyle, RenderOffset, RenderedItem};
use crate::viewport::{ViewportState, VisibleRange, clamp_scroll};

/// Render state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// The rendered window matches the anchor.
	Idle,
	/// The window moved; a render and commit are due.
	Reflow,
}

/// Result of [`WindowController::on_scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
	/// The anchor did not move; nothing needs rendering.
	Unchanged,
	/// The anchor moved and the visible range was recomputed.
	Reflowed,
}

/// Summary of one [`WindowController::commit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
	/// Rendered items the probe returned a height for.
	pub measured: usize,
	/// Measurements that differed from the cached height.
	pub corrected: usize,
	/// Measurements rejected as invalid and skipped.
	pub rejected: usize,
	/// Sequence of the reconciliation dispatched by this commit.
	pub dispatched: Option<RequestSeq>,
}

#[derive(Debug, Clone, Copy)]
struct Geometry {
	viewport_height: f64,
	total: usize,
	visible_count: usize,
	buffer: usize,
}

#[derive(Debug, Clone, Copy)]
struct Awaiting {
	seq: RequestSeq,
	start: usize,
}

/// Everything that only exists for a non-empty list.
#[derive(Debug)]
struct Layout {
	geometry: Geometry,
	settled: PositionCache,
	working: PositionCache,
	viewport: ViewportState,
	phase: Phase,
	reconciler: Option<BackgroundReconciler>,
	requests: SequenceClock,
	awaiting: Option<Awaiting>,
}

impl Layout {
	fn new(geometry: Geometry, estimate: f64, mode: ReconcileMode) -> Self {
		let cache = PositionCache::new(geometry.total, estimate);
		let viewport = ViewportState {
			scroll_offset: 0.0,
			anchor_index: 0,
			visible: VisibleRange::around(0, geometry.total, geometry.visible_count, geometry.buffer),
			total_content_extent: cache.total_extent(),
		};
		let reconciler = match mode {
			ReconcileMode::Background => Some(BackgroundReconciler::spawn()),
			ReconcileMode::Inline => None,
		};
		Self {
			geometry,
			working: cache.clone(),
			settled: cache,
			viewport,
			phase: Phase::Reflow,
			reconciler,
			requests: SequenceClock::new(),
			awaiting: None,
		}
	}

	fn reflow(&mut self, anchor: usize) {
		let Geometry { total, visible_count, buffer, .. } = self.geometry;
		self.viewport.anchor_index = anchor;
		self.viewport.visible = VisibleRange::around(anchor, total, visible_count, buffer);
		self.phase = Phase::Reflow;
		tracing::debug!(anchor, start = self.viewport.visible.start, end = self.viewport.visible.end, "window.reflow");
	}

	/// Re-clamps the scroll offset against the settled extent and moves the
	/// window if the anchor changed.
	fn relocate(&mut self, offset: f64) -> ScrollOutcome {
		let offset = clamp_scroll(offset, self.viewport.total_content_extent, self.geometry.viewport_height);
		self.viewport.scroll_offset = offset;
		let anchor = locate(self.settled.entries(), offset);
		if anchor == self.viewport.anchor_index {
			return ScrollOutcome::Unchanged;
		}
		self.reflow(anchor);
		ScrollOutcome::Reflowed
	}

	fn measure<P: HeightProbe + ?Sized>(&mut self, probe: &mut P) -> CommitReport {
		let mut report = CommitReport::default();
		for index in self.viewport.visible.indices() {
			let Some(height) = probe.measure(index) else {
				continue;
			};
			report.measured += 1;
			match self.working.record_measurement(index, height) {
				Ok(Measured::Corrected { delta }) => {
					report.corrected += 1;
					tracing::trace!(index, height, delta, "window.measure");
				}
				Ok(Measured::Unchanged) => {}
				Err(err) => {
					report.rejected += 1;
					tracing::warn!(%err, "window.measure.rejected");
				}
			}
		}
		report
	}

	fn dispatch(&mut self) -> RequestSeq {
		let visible_start = self.viewport.visible.start;
		let start = self.working.dirty_from().map_or(visible_start, |from| from.min(visible_start));
		let seq = RequestSeq(self.requests.next());

		if let Some(reconciler) = &self.reconciler {
			let request = ReconcileRequest {
				seq,
				start,
				snapshot: self.working.clone(),
			};
			match reconciler.dispatch(request) {
				Ok(outcome) => {
					tracing::debug!(seq = seq.0, start, ?outcome, "window.reconcile.dispatch");
					self.awaiting = Some(Awaiting { seq, start });
					return seq;
				}
				Err(err) => {
					tracing::warn!(%err, "window.reconcile.fallback");
					self.reconciler = None;
				}
			}
		}

		self.awaiting = None;
		self.reconcile_inline(start);
		seq
	}

	fn reconcile_inline(&mut self, start: usize) {
		let total_extent = reconcile_in_place(&mut self.working, start);
		tracing::trace!(start, total_extent, "window.reconcile.inline");
		self.install(self.working.clone(), total_extent);
	}

	fn install(&mut self, cache: PositionCache, total_extent: f64) {
		if self.reconciler.is_some() {
			self.working = cache.clone();
		}
		self.settled = cache;
		self.viewport.total_content_extent = total_extent;
		self.relocate(self.viewport.scroll_offset);
	}

	fn accept(&mut self, response: ReconcileResponse) -> bool {
		let ReconcileResponse { seq, reconciled } = response;
		if self.awaiting.map(|awaiting| awaiting.seq) != Some(seq) {
			tracing::debug!(seq = seq.0, latest = self.requests.current(), "window.reconcile.stale");
			return false;
		}
		self.awaiting = None;
		tracing::debug!(seq = seq.0, total_extent = reconciled.total_extent, "window.reconcile.applied");
		self.install(reconciled.cache, reconciled.total_extent);
		true
	}

	/// Drops the closed worker and reconciles the outstanding request here.
	fn fall_back(&mut self) -> bool {
		tracing::warn!("window.reconcile.worker_closed");
		self.reconciler = None;
		match self.awaiting.take() {
			Some(Awaiting { start, .. }) => {
				self.reconcile_inline(start);
				true
			}
			None => false,
		}
	}

	fn poll(&mut self) -> bool {
		let mut applied = false;
		while let Some(reconciler) = self.reconciler.as_mut() {
			match reconciler.try_next() {
				Ok(Some(response)) => applied |= self.accept(response),
				Ok(None) => break,
				Err(WorkerClosed) => {
					applied |= self.fall_back();
					break;
				}
			}
		}
		applied
	}

	async fn settle(&mut self) -> bool {
		let mut applied = false;
		while self.awaiting.is_some() {
			let Some(reconciler) = self.reconciler.as_mut() else {
				break;
			};
			match reconciler.next().await {
				Some(response) => applied |= self.accept(response),
				None => applied |= self.fall_back(),
			}
		}
		applied
	}
}

/// Windowing controller for a list of dynamically sized items.
///
/// Drive it from the host's event loop:
///
/// 1. [`on_scroll`](Self::on_scroll) with every raw scroll offset.
/// 2. [`render`](Self::render) when [`phase`](Self::phase) is [`Phase::Reflow`]
///    or after a reconciliation was applied.
/// 3. [`commit`](Self::commit) once the rendered items are on screen, to
///    measure them and dispatch reconciliation.
/// 4. [`poll_reconciled`](Self::poll_reconciled) on later ticks to apply the
///    background result.
///
/// A list with zero items allocates no cache, spawns no worker and renders
/// only the empty state. Dropping the controller cancels its worker.
#[derive(Debug)]
pub struct WindowController {
	config: WindowConfig,
	layout: Option<Layout>,
}

impl WindowController {
	/// Validates `config` and lays every item out at the estimated height.
	///
	/// With [`ReconcileMode::Background`] this spawns the reconcile worker on the
	/// ambient Tokio runtime, or on a shared fallback runtime outside one.
	pub fn new(config: WindowConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		let layout = (config.total_items > 0).then(|| {
			let geometry = Geometry {
				viewport_height: config.viewport_height,
				total: config.total_items,
				visible_count: config.estimated_visible_count(),
				buffer: config.buffer_size,
			};
			Layout::new(geometry, config.estimate_row_height, config.reconcile)
		});
		tracing::debug!(
			total = config.total_items,
			estimate = config.estimate_row_height,
			buffer = config.buffer_size,
			mode = ?config.reconcile,
			"window.mount"
		);
		Ok(Self { config, layout })
	}

	/// Configuration the controller was built with.
	pub fn config(&self) -> &WindowConfig {
		&self.config
	}

	/// Returns `true` if the list has no items.
	pub fn is_empty(&self) -> bool {
		self.layout.is_none()
	}

	/// Handles a raw scroll offset from the host.
	///
	/// The offset is clamped to the scrollable range and looked up in the
	/// last consistent cache. Pending reconciliation never blocks this call.
	pub fn on_scroll(&mut self, offset: f64) -> ScrollOutcome {
		let Some(layout) = self.layout.as_mut() else {
			return ScrollOutcome::Unchanged;
		};
		let outcome = layout.relocate(offset);
		tracing::trace!(offset, anchor = layout.viewport.anchor_index, ?outcome, "window.scroll");
		outcome
	}

	/// Renders the current window, or the empty state for an empty list.
	pub fn render<R: ItemRenderer + ?Sized>(&self, renderer: &mut R) -> Frame<R::Output> {
		let Some(layout) = &self.layout else {
			return Frame::Empty(renderer.render_empty().map_or(EmptyContent::Placeholder, EmptyContent::Custom));
		};
		let items = layout
			.viewport
			.visible
			.indices()
			.map(|index| RenderedItem {
				index,
				node: renderer.render_item(index, &ItemStyle::FLOW),
			})
			.collect();
		Frame::Items {
			offset: self.render_offset(),
			items,
		}
	}

	/// Measures the rendered window and dispatches reconciliation.
	///
	/// Call once the items returned by [`render`](Self::render) are on the
	/// host surface. Items the probe cannot see are skipped; invalid heights
	/// are logged and skipped. Every commit dispatches, even without
	/// corrections.
	pub fn commit<P: HeightProbe + ?Sized>(&mut self, probe: &mut P) -> CommitReport {
		let Some(layout) = self.layout.as_mut() else {
			return CommitReport::default();
		};
		layout.phase = Phase::Idle;
		let mut report = layout.measure(probe);
		report.dispatched = Some(layout.dispatch());
		report
	}

	/// Applies a ready reconciliation response without waiting.
	///
	/// Returns `true` if the caches were replaced; the host should render
	/// again since offsets may have moved.
	pub fn poll_reconciled(&mut self) -> bool {
		self.layout.as_mut().is_some_and(Layout::poll)
	}

	/// Waits until the latest dispatched reconciliation has been applied.
	///
	/// Returns `true` if anything was applied. Returns immediately when
	/// nothing is outstanding.
	pub async fn settle(&mut self) -> bool {
		match self.layout.as_mut() {
			Some(layout) => layout.settle().await,
			None => false,
		}
	}

	/// Returns `true` while a dispatched reconciliation has not been applied.
	pub fn is_reconciling(&self) -> bool {
		self.layout.as_ref().is_some_and(|layout| layout.awaiting.is_some())
	}

	/// Stops the reconcile worker and waits for it to exit.
	///
	/// Outstanding responses are discarded. Later commits reconcile inline.
	pub async fn shutdown(&mut self) {
		let Some(layout) = self.layout.as_mut() else {
			return;
		};
		layout.awaiting = None;
		if let Some(mut reconciler) = layout.reconciler.take() {
			let exit = reconciler.shutdown().await;
			tracing::debug!(exit = ?exit.as_ref().map(|exit| exit.kind()), "window.shutdown");
		}
	}

	/// Rendered window, `None` for an empty list.
	pub fn visible_range(&self) -> Option<VisibleRange> {
		self.layout.as_ref().map(|layout| layout.viewport.visible)
	}

	/// Total scrollable length according to the last consistent cache.
	pub fn total_content_extent(&self) -> f64 {
		self.layout.as_ref().map_or(0.0, |layout| layout.viewport.total_content_extent)
	}

	/// Translation for the rendered block: the trailing edge of the item
	/// before the window, or 0 when the window starts at the first item.
	pub fn render_offset(&self) -> RenderOffset {
		let offset = self
			.layout
			.as_ref()
			.map_or(0.0, |layout| layout.settled.leading_offset(layout.viewport.visible.start));
		RenderOffset(offset)
	}

	/// Scroll-derived state, `None` for an empty list.
	pub fn viewport(&self) -> Option<&ViewportState> {
		self.layout.as_ref().map(|layout| &layout.viewport)
	}

	/// Last consistent cache, `None` for an empty list.
	pub fn cache(&self) -> Option<&PositionCache> {
		self.layout.as_ref().map(|layout| &layout.settled)
	}

	/// Current render phase. An empty list is always idle.
	pub fn phase(&self) -> Phase {
		self.layout.as_ref().map_or(Phase::Idle, |layout| layout.phase)
	}
}
