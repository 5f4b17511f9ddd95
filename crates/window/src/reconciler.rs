//! Background reconciliation over a supervised worker.
//!
//! Each request moves an owned cache snapshot into the worker and each response
//! moves a corrected snapshot back. Requests carry a [`RequestSeq`]; the
//! controller only applies the response for the latest sequence it sent, so an
//! older response that arrives late never clobbers newer state. The worker's
//! mailbox keeps at most one queued request, newer ones superseding it.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TryRecvError;
use vista_positions::{PositionCache, Reconciled, reconcile};
use vista_worker::{
	ActorContext, ActorEvents, ActorExit, ActorHandle, ActorSendError, ActorSpec, MailboxSendOutcome, RestartPolicy, TaskClass, WorkerActor,
	spawn_actor,
};

/// Sequence number of one reconciliation request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

/// Work item sent to the reconcile worker.
#[derive(Debug)]
pub struct ReconcileRequest {
	/// Sequence the controller issued for this request.
	pub seq: RequestSeq,
	/// Lowest index that may carry a pending delta.
	pub start: usize,
	/// Owned copy of the working cache, moved into the worker.
	pub snapshot: PositionCache,
}

/// Corrected snapshot sent back by the reconcile worker.
#[derive(Debug)]
pub struct ReconcileResponse {
	/// Echo of [`ReconcileRequest::seq`].
	pub seq: RequestSeq,
	/// The snapshot after reconciliation.
	pub reconciled: Reconciled,
}

/// Actor running [`reconcile`] on the blocking pool, one request at a time.
struct ReconcileActor;

#[async_trait]
impl WorkerActor for ReconcileActor {
	type Cmd = ReconcileRequest;
	type Evt = ReconcileResponse;

	async fn handle(&mut self, cmd: Self::Cmd, ctx: &mut ActorContext<Self::Evt>) -> Result<(), String> {
		let ReconcileRequest { seq, start, snapshot } = cmd;
		let entries = snapshot.len();
		let reconciled = vista_worker::spawn_blocking(TaskClass::CpuBlocking, move || reconcile(snapshot, start))
			.await
			.map_err(|err| err.to_string())?;
		tracing::trace!(seq = seq.0, start, entries, total_extent = reconciled.total_extent, "window.reconcile.done");
		ctx.emit(ReconcileResponse { seq, reconciled });
		Ok(())
	}
}

/// The worker closed its response channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerClosed;

/// Handle to a running reconcile worker.
pub struct BackgroundReconciler {
	actor: ActorHandle<ReconcileRequest>,
	responses: ActorEvents<ReconcileResponse>,
}

impl BackgroundReconciler {
	/// Spawns the worker on the ambient Tokio runtime, or the shared fallback
	/// runtime when called from a plain thread.
	pub fn spawn() -> Self {
		let (actor, responses) = spawn_actor(ActorSpec::new("window.reconcile", TaskClass::Background, || ReconcileActor).restart(RestartPolicy {
			max_restarts: 3,
			backoff: Duration::ZERO,
		}));
		Self { actor, responses }
	}

	/// Queues a request without waiting.
	pub fn dispatch(&self, request: ReconcileRequest) -> Result<MailboxSendOutcome, ActorSendError> {
		let seq = request.seq;
		let outcome = self.actor.send(request)?;
		if outcome == MailboxSendOutcome::Superseded {
			tracing::trace!(seq = seq.0, "window.reconcile.superseded");
		}
		Ok(outcome)
	}

	/// Returns true once the worker no longer accepts requests.
	pub fn is_closed(&self) -> bool {
		self.actor.is_closed()
	}

	/// Takes one ready response without waiting.
	pub fn try_next(&mut self) -> Result<Option<ReconcileResponse>, WorkerClosed> {
		match self.responses.try_recv() {
			Ok(response) => Ok(Some(response)),
			Err(TryRecvError::Empty) => Ok(None),
			Err(TryRecvError::Disconnected) => Err(WorkerClosed),
		}
	}

	/// Waits for the next response. `None` once the worker has exited.
	pub async fn next(&mut self) -> Option<ReconcileResponse> {
		self.responses.recv().await
	}

	/// Cancels the worker. Responses still in flight are discarded.
	pub fn close(&mut self) {
		self.actor.cancel();
		self.responses.close();
	}

	/// Cancels the worker and waits for it to exit, returning how it ended.
	pub async fn shutdown(&mut self) -> Option<ActorExit> {
		self.responses.close();
		self.actor.shutdown().await
	}
}

impl std::fmt::Debug for BackgroundReconciler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BackgroundReconciler")
			.field("actor", &self.actor.name())
			.field("generation", &self.actor.generation())
			.field("closed", &self.is_closed())
			.finish()
	}
}
