use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parses_full_document() {
	let config = WindowConfig::from_toml_str(
		r#"
		viewport-height = 600
		total-items = 1000
		estimate-row-height = 90
		buffer-size = 8
		reconcile = "inline"
		"#,
	)
	.unwrap();

	assert_eq!(config, WindowConfig::new(600.0, 1000, 90.0).buffer_size(8).reconcile(ReconcileMode::Inline));
}

#[test]
fn optional_fields_take_defaults() {
	let config = WindowConfig::from_toml_str("viewport-height = 300.5\ntotal-items = 0\nestimate-row-height = 40\n").unwrap();
	assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
	assert_eq!(config.reconcile, ReconcileMode::Background);
	assert_eq!(config.viewport_height, 300.5);
}

#[test]
fn row_height_alias_is_accepted() {
	let config = WindowConfig::from_toml_str("viewport-height = 300\ntotal-items = 10\nrow-height = 30\n").unwrap();
	assert_eq!(config.estimate_row_height, 30.0);
}

#[test]
fn unknown_keys_are_rejected() {
	let err = WindowConfig::from_toml_str("viewport-height = 300\ntotal-items = 10\nrow-height = 30\ncolumns = 2\n").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)), "got {err}");
}

#[test]
fn non_positive_lengths_are_rejected() {
	let err = WindowConfig::from_toml_str("viewport-height = 0\ntotal-items = 10\nrow-height = 30\n").unwrap_err();
	assert!(matches!(err, ConfigError::NonPositive { field: "viewport-height", .. }), "got {err}");

	let err = WindowConfig::new(100.0, 10, -1.0).validate().unwrap_err();
	assert!(matches!(err, ConfigError::NonPositive { field: "estimate-row-height", .. }), "got {err}");

	assert!(WindowConfig::new(f64::NAN, 10, 20.0).validate().is_err());
}

#[test]
fn visible_count_rounds_up() {
	assert_eq!(WindowConfig::new(600.0, 1000, 90.0).estimated_visible_count(), 7);
	assert_eq!(WindowConfig::new(540.0, 1000, 90.0).estimated_visible_count(), 6);
}
