//! Host-facing collaborators: item rendering, empty state, measurement.

use std::fmt;

/// Text shown when the list is empty and no empty-state renderer is supplied.
pub const PLACEHOLDER_TEXT: &str = "No data";

/// Positioning hints passed with every item render call.
///
/// Items are laid out in normal flow inside a block that is translated by
/// [`RenderOffset`], so each item only needs to stretch across the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
	/// Left inset in pixels.
	pub left: f64,
	/// Right inset in pixels.
	pub right: f64,
	/// Width as a percentage of the viewport.
	pub width_percent: f64,
}

impl ItemStyle {
	/// Full-width flow positioning.
	pub const FLOW: Self = Self {
		left: 0.0,
		right: 0.0,
		width_percent: 100.0,
	};
}

/// Translation applied to the block holding the rendered items.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct RenderOffset(pub f64);

impl RenderOffset {
	/// Offset in pixels along the scroll axis.
	pub fn px(self) -> f64 {
		self.0
	}

	/// CSS `transform` value for hosts that render to a DOM.
	pub fn css_transform(self) -> String {
		format!("translate3d(0, {}px, 0)", self.0)
	}
}

impl fmt::Display for RenderOffset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}px", self.0)
	}
}

/// One rendered item, tagged with the index it was rendered for.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem<R> {
	/// Item index, for measuring the node after commit.
	pub index: usize,
	/// Whatever the [`ItemRenderer`] produced.
	pub node: R,
}

/// What an empty list renders.
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyContent<R> {
	/// Output of the caller's empty-state renderer.
	Custom(R),
	/// Built-in [`PLACEHOLDER_TEXT`].
	Placeholder,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame<R> {
	/// Items of the visible window, translated by `offset`.
	Items {
		/// Leading offset of the first rendered item.
		offset: RenderOffset,
		/// Visible window in index order.
		items: Vec<RenderedItem<R>>,
	},
	/// The list has no items.
	Empty(EmptyContent<R>),
}

impl<R> Frame<R> {
	/// Rendered indices in order; empty for [`Frame::Empty`].
	pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
		let items: &[RenderedItem<R>] = match self {
			Self::Items { items, .. } => items,
			Self::Empty(_) => &[],
		};
		items.iter().map(|item| item.index)
	}
}

/// Produces host nodes for list items.
///
/// Closures `FnMut(usize, &ItemStyle) -> R` implement this with the built-in
/// placeholder for the empty state; wrap one with [`with_empty_state`] to
/// supply your own.
pub trait ItemRenderer {
	type Output;

	/// Renders the item at `index`.
	fn render_item(&mut self, index: usize, style: &ItemStyle) -> Self::Output;

	/// Renders the empty state. `None` selects the built-in placeholder.
	fn render_empty(&mut self) -> Option<Self::Output> {
		None
	}
}

impl<F, R> ItemRenderer for F
where
	F: FnMut(usize, &ItemStyle) -> R,
{
	type Output = R;

	fn render_item(&mut self, index: usize, style: &ItemStyle) -> R {
		self(index, style)
	}
}

/// Item renderer paired with an empty-state renderer.
#[derive(Debug, Clone)]
pub struct WithEmptyState<I, E> {
	items: I,
	empty: E,
}

/// Pairs `items` with an `empty` renderer used when the list has no items.
pub fn with_empty_state<I, E>(items: I, empty: E) -> WithEmptyState<I, E>
where
	I: ItemRenderer,
	E: FnMut() -> I::Output,
{
	WithEmptyState { items, empty }
}

impl<I, E> ItemRenderer for WithEmptyState<I, E>
where
	I: ItemRenderer,
	E: FnMut() -> I::Output,
{
	type Output = I::Output;

	fn render_item(&mut self, index: usize, style: &ItemStyle) -> Self::Output {
		self.items.render_item(index, style)
	}

	fn render_empty(&mut self) -> Option<Self::Output> {
		Some((self.empty)())
	}
}

/// Reports the rendered extent of committed items along the scroll axis.
pub trait HeightProbe {
	/// Height of the item rendered for `index`, or `None` if it is not on the
	/// rendered surface.
	fn measure(&mut self, index: usize) -> Option<f64>;
}

impl<F> HeightProbe for F
where
	F: FnMut(usize) -> Option<f64>,
{
	fn measure(&mut self, index: usize) -> Option<f64> {
		self(index)
	}
}
