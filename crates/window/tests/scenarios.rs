//! End-to-end windowing scenarios, run once inline and once against the
//! background worker.

use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing_subscriber::EnvFilter;
use vista_positions::{locate, reconcile};
use vista_window::{
	BackgroundReconciler, EmptyContent, Frame, ItemStyle, PLACEHOLDER_TEXT, PositionCache, ReconcileMode, ReconcileRequest, RequestSeq, ScrollOutcome,
	WindowConfig, WindowController, with_empty_state,
};

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

fn controller(total: usize, mode: ReconcileMode) -> WindowController {
	init_tracing();
	WindowController::new(WindowConfig::new(600.0, total, 90.0).reconcile(mode)).unwrap()
}

async fn settled(controller: &mut WindowController) {
	tokio::time::timeout(Duration::from_secs(5), controller.settle())
		.await
		.expect("reconciliation settles");
}

#[rstest]
#[case::inline(ReconcileMode::Inline)]
#[case::background(ReconcileMode::Background)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fresh_mount_uses_estimates(#[case] mode: ReconcileMode) {
	let mut list = controller(1000, mode);
	assert_eq!(list.total_content_extent(), 90_000.0);
	assert_eq!(locate(list.cache().unwrap().entries(), 0.0), 0);
	assert_eq!(list.viewport().unwrap().anchor_index, 0);
	list.shutdown().await;
}

#[rstest]
#[case::inline(ReconcileMode::Inline)]
#[case::background(ReconcileMode::Background)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_short_item_shifts_everything_after_it(#[case] mode: ReconcileMode) {
	let mut list = controller(1000, mode);
	list.commit(&mut |index: usize| Some(if index == 3 { 50.0 } else { 90.0 }));
	settled(&mut list).await;

	let entries = list.cache().unwrap().entries();
	assert_eq!(entries[3].bottom, entries[3].top + 50.0);
	assert_eq!(entries[4].top, entries[3].bottom);
	assert_eq!(entries[999].bottom, 90_000.0 - 40.0);
	assert_eq!(list.total_content_extent(), 90_000.0 - 40.0);
	list.shutdown().await;
}

#[rstest]
#[case::inline(ReconcileMode::Inline)]
#[case::background(ReconcileMode::Background)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_corrections_settle_in_one_pass(#[case] mode: ReconcileMode) {
	let mut list = controller(1000, mode);
	let report = list.commit(&mut |index: usize| {
		Some(match index {
			3 => 50.0,
			10 => 120.0,
			_ => 90.0,
		})
	});
	assert_eq!(report.corrected, 2);
	settled(&mut list).await;

	let entries = list.cache().unwrap().entries();
	assert_eq!(entries[999].bottom, 90_000.0 - 40.0 + 30.0);
	assert_eq!(entries[11].top, 3.0 * 90.0 + 50.0 + 6.0 * 90.0 + 120.0);
	assert!(entries.iter().all(|entry| entry.pending_delta == 0.0));
	list.shutdown().await;
}

#[rstest]
#[case::inline(ReconcileMode::Inline)]
#[case::background(ReconcileMode::Background)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scrolling_onto_an_item_edge_anchors_the_next_item(#[case] mode: ReconcileMode) {
	let mut list = controller(1000, mode);
	let edge = list.cache().unwrap().entries()[5].bottom;
	assert_eq!(list.on_scroll(edge), ScrollOutcome::Reflowed);
	assert_eq!(list.viewport().unwrap().anchor_index, 6);
	assert_eq!(list.render_offset().css_transform(), "translate3d(0, 90px, 0)");
	list.shutdown().await;
}

#[test]
fn empty_list_shows_only_the_empty_state() {
	let list = controller(0, ReconcileMode::Background);
	assert!(list.cache().is_none());
	assert_eq!(list.visible_range(), None);

	let frame = list.render(&mut |index: usize, _: &ItemStyle| index.to_string());
	assert_eq!(frame, Frame::Empty(EmptyContent::Placeholder));
	assert_eq!(PLACEHOLDER_TEXT, "No data");

	let mut calls = 0;
	let mut renderer = with_empty_state(
		|_: usize, _: &ItemStyle| {
			calls += 1;
			String::new()
		},
		|| "Nothing yet".to_string(),
	);
	assert_eq!(list.render(&mut renderer), Frame::Empty(EmptyContent::Custom("Nothing yet".to_string())));
	drop(renderer);
	assert_eq!(calls, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scroll_keeps_answering_from_the_settled_cache_while_reconciling() {
	let mut list = controller(1000, ReconcileMode::Background);
	list.commit(&mut |index: usize| Some(if index < 13 { 45.0 } else { 90.0 }));

	// Offsets are still the estimated ones until the response is applied.
	if list.is_reconciling() {
		list.on_scroll(900.0);
		assert!(list.viewport().unwrap().anchor_index >= 6);
	}
	settled(&mut list).await;

	list.on_scroll(900.0);
	let anchor = list.viewport().unwrap().anchor_index;
	let entries = list.cache().unwrap().entries();
	assert!(entries[anchor].top <= 900.0 && 900.0 < entries[anchor].bottom);
	assert_eq!(list.total_content_extent(), 90_000.0 - 13.0 * 45.0);
	list.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rapid_commits_apply_only_the_latest_response() {
	let mut list = controller(1000, ReconcileMode::Background);
	for step in 0..20 {
		list.on_scroll(step as f64 * 450.0);
		list.commit(&mut |index: usize| Some(if index % 7 == 0 { 60.0 } else { 90.0 }));
	}
	settled(&mut list).await;

	let cache = list.cache().unwrap();
	let expected = reconcile(cache.clone(), 0);
	assert_eq!(cache.entries(), expected.cache.entries());
	assert_eq!(list.total_content_extent(), cache.total_extent());
	assert!(!cache.is_dirty());
	list.shutdown().await;
}

#[tokio::test]
async fn out_of_order_responses_are_told_apart_by_sequence() {
	init_tracing();
	let mut worker = BackgroundReconciler::spawn();
	let mut snapshot = PositionCache::new(50, 90.0);
	snapshot.record_measurement(0, 30.0).unwrap();

	worker
		.dispatch(ReconcileRequest {
			seq: RequestSeq(7),
			start: 0,
			snapshot,
		})
		.unwrap();
	let response = worker.next().await.unwrap();
	assert_eq!(response.seq, RequestSeq(7));
	assert!(response.seq < RequestSeq(8));
	assert_eq!(response.reconciled.total_extent, 50.0 * 90.0 - 60.0);
	worker.shutdown().await;
}
