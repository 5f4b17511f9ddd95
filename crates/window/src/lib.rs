//! Windowing for virtualized lists whose item heights are only known once rendered.
//!
//! [`WindowController`] renders a buffered slice of a long list around the
//! current scroll position. Items start at an estimated height; after each
//! commit the rendered items are measured, corrected locally and a snapshot of
//! the cache is reconciled, either on a background worker or inline. Scroll
//! lookups always run against the last consistent cache, so a pending
//! reconciliation never blocks the caller.
//!
//! ```no_run
//! use vista_window::{WindowConfig, WindowController, ItemStyle};
//!
//! let mut list = WindowController::new(WindowConfig::new(600.0, 10_000, 48.0))?;
//! list.on_scroll(1_250.0);
//! let frame = list.render(&mut |index: usize, _: &ItemStyle| format!("row {index}"));
//! # let _ = frame;
//! list.commit(&mut |_: usize| Some(52.0));
//! list.poll_reconciled();
//! # Ok::<(), vista_window::ConfigError>(())
//! ```

pub mod config;
mod controller;
pub mod reconciler;
pub mod render;
pub mod viewport;

pub use config::{ConfigError, DEFAULT_BUFFER_SIZE, ReconcileMode, WindowConfig};
pub use controller::{CommitReport, Phase, ScrollOutcome, WindowController};
pub use reconciler::{BackgroundReconciler, ReconcileRequest, ReconcileResponse, RequestSeq};
pub use render::{EmptyContent, Frame, HeightProbe, ItemRenderer, ItemStyle, PLACEHOLDER_TEXT, RenderOffset, RenderedItem, WithEmptyState, with_empty_state};
pub use viewport::{ViewportState, VisibleRange, clamp_scroll};
pub use vista_positions::{PositionCache, PositionEntry};
