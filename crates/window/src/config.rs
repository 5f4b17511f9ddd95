//! Controller configuration.
//!
//! Loaded from TOML or built in code:
//!
//! ```toml
//! viewport-height = 600
//! total-items = 1000
//! estimate-row-height = 90
//! buffer-size = 5          # optional
//! reconcile = "background" # or "inline"
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Default number of extra items rendered on each side of the viewport.
pub const DEFAULT_BUFFER_SIZE: usize = 5;

/// Errors raised while loading or validating a [`WindowConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A length that must be strictly positive was not.
	#[error("invalid {field}: {value} (expected a finite value greater than zero)")]
	NonPositive {
		/// Config key of the offending field.
		field: &'static str,
		/// Rejected value.
		value: f64,
	},
}

/// Where pending height deltas are propagated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileMode {
	/// On a supervised worker, off the caller's thread.
	#[default]
	Background,
	/// Synchronously inside the commit that recorded the measurements.
	Inline,
}

/// Configuration for one [`crate::WindowController`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WindowConfig {
	/// Height of the scrolling viewport in pixels.
	pub viewport_height: f64,
	/// Number of items in the list. Fixed for the controller's lifetime.
	pub total_items: usize,
	/// Height assumed for items that have not been measured yet.
	#[serde(alias = "row-height")]
	pub estimate_row_height: f64,
	/// Items rendered beyond the viewport on each side.
	#[serde(default = "default_buffer_size")]
	pub buffer_size: usize,
	/// Reconciliation strategy.
	#[serde(default)]
	pub reconcile: ReconcileMode,
}

fn default_buffer_size() -> usize {
	DEFAULT_BUFFER_SIZE
}

impl WindowConfig {
	/// Creates a config with the default buffer and background reconciliation.
	pub fn new(viewport_height: f64, total_items: usize, estimate_row_height: f64) -> Self {
		Self {
			viewport_height,
			total_items,
			estimate_row_height,
			buffer_size: DEFAULT_BUFFER_SIZE,
			reconcile: ReconcileMode::default(),
		}
	}

	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Sets the buffer size.
	#[must_use]
	pub fn buffer_size(mut self, buffer_size: usize) -> Self {
		self.buffer_size = buffer_size;
		self
	}

	/// Sets the reconciliation strategy.
	#[must_use]
	pub fn reconcile(mut self, mode: ReconcileMode) -> Self {
		self.reconcile = mode;
		self
	}

	/// Checks that both lengths are finite and strictly positive.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (field, value) in [("viewport-height", self.viewport_height), ("estimate-row-height", self.estimate_row_height)] {
			if !value.is_finite() || value <= 0.0 {
				return Err(ConfigError::NonPositive { field, value });
			}
		}
		Ok(())
	}

	/// Items needed to fill the viewport at the estimated height, rounded up.
	///
	/// Only an approximation once real heights are known; the buffer absorbs
	/// the difference.
	pub fn estimated_visible_count(&self) -> usize {
		(self.viewport_height / self.estimate_row_height).ceil() as usize
	}
}

#[cfg(test)]
mod tests;
