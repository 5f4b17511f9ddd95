//! Supervised actors fed by a latest-wins [mailbox](crate::mailbox).
//!
//! Commands go in through a synchronous [`ActorHandle::send`], so callers on a
//! UI thread never await. Events come back on an unbounded channel handed out
//! by [`spawn_actor`], which moves each payload to its single owner instead of
//! cloning it per subscriber.
//!
//! Each actor instance runs as one generation under a supervisor task. When
//! an instance fails, the factory builds a fresh one against the same mailbox
//! until the [`RestartPolicy`] budget runs out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::TaskClass;
use crate::mailbox::{self, MailboxReceiver, MailboxSendError, MailboxSendOutcome, MailboxSender};
use crate::token::SequenceClock;

/// Why a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActorExitKind {
	/// Every sender was closed and the queue drained.
	MailboxClosed,
	/// The handle cancelled the actor.
	Cancelled,
	/// `handle` returned an error.
	HandlerFailed,
	/// `handle` panicked; the join caught it.
	Panicked,
	/// The runtime failed to join the instance task.
	JoinFailed,
}

impl ActorExitKind {
	fn is_failure(self) -> bool {
		matches!(self, Self::HandlerFailed | Self::Panicked | Self::JoinFailed)
	}
}

/// How one generation ended, with the error text when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorExit {
	kind: ActorExitKind,
	message: Option<String>,
}

impl ActorExit {
	fn clean(kind: ActorExitKind) -> Self {
		Self { kind, message: None }
	}

	fn failed(kind: ActorExitKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: Some(message.into()),
		}
	}

	pub fn kind(&self) -> ActorExitKind {
		self.kind
	}

	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	/// Failures are the exits the supervisor may restart.
	pub fn is_failure(&self) -> bool {
		self.kind.is_failure()
	}
}

/// Restart budget for failed instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartPolicy {
	/// Restarts allowed over the actor's lifetime.
	pub max_restarts: usize,
	/// Wait before each restart.
	pub backoff: Duration,
}

impl RestartPolicy {
	fn delay_after(&self, exit: &ActorExit, restarts: usize) -> Option<Duration> {
		(exit.is_failure() && restarts < self.max_restarts).then_some(self.backoff)
	}
}

impl Default for RestartPolicy {
	fn default() -> Self {
		Self {
			max_restarts: 3,
			backoff: Duration::from_millis(50),
		}
	}
}

/// A unit of work driven by the supervisor, one command at a time.
#[async_trait]
pub trait WorkerActor: Send + 'static {
	type Cmd: Send + 'static;
	type Evt: Send + 'static;

	async fn handle(&mut self, cmd: Self::Cmd, ctx: &mut ActorContext<Self::Evt>) -> Result<(), String>;
}

/// Per-generation view handed to [`WorkerActor::handle`].
pub struct ActorContext<Evt> {
	events: mpsc::UnboundedSender<Evt>,
}

impl<Evt> ActorContext<Evt>
where
	Evt: Send + 'static,
{
	/// Sends one event to the owner of the event receiver. Dropped silently
	/// once nobody listens.
	pub fn emit(&self, evt: Evt) {
		let _ = self.events.send(evt);
	}
}

/// Receiving side of an actor's events.
pub type ActorEvents<Evt> = mpsc::UnboundedReceiver<Evt>;

/// Everything needed to start one supervised actor.
pub struct ActorSpec<A>
where
	A: WorkerActor,
{
	name: String,
	class: TaskClass,
	restart: RestartPolicy,
	factory: Arc<dyn Fn() -> A + Send + Sync>,
}

impl<A> ActorSpec<A>
where
	A: WorkerActor,
{
	/// Starts from [`RestartPolicy::default`].
	pub fn new(name: impl Into<String>, class: TaskClass, factory: impl Fn() -> A + Send + Sync + 'static) -> Self {
		Self {
			name: name.into(),
			class,
			restart: RestartPolicy::default(),
			factory: Arc::new(factory),
		}
	}

	#[must_use]
	pub fn restart(mut self, restart: RestartPolicy) -> Self {
		self.restart = restart;
		self
	}
}

/// A command could not be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActorSendError {
	#[error("actor is no longer accepting commands")]
	Closed,
}

impl From<MailboxSendError> for ActorSendError {
	fn from(err: MailboxSendError) -> Self {
		match err {
			MailboxSendError::Closed => Self::Closed,
		}
	}
}

/// State the supervisor publishes for the handle.
#[derive(Default)]
struct Published {
	generation: AtomicU64,
	last_exit: Mutex<Option<ActorExit>>,
}

/// Owner side of one supervised actor. Dropping it cancels the actor.
pub struct ActorHandle<Cmd>
where
	Cmd: Send + 'static,
{
	name: String,
	tx: MailboxSender<Cmd>,
	cancel: CancellationToken,
	published: Arc<Published>,
	supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl<Cmd> Drop for ActorHandle<Cmd>
where
	Cmd: Send + 'static,
{
	fn drop(&mut self) {
		self.cancel();
	}
}

impl<Cmd> ActorHandle<Cmd>
where
	Cmd: Send + 'static,
{
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Generation of the running (or last) instance, starting at 1.
	pub fn generation(&self) -> u64 {
		self.published.generation.load(Ordering::Acquire)
	}

	/// Queues one command without waiting, superseding one still queued.
	pub fn send(&self, cmd: Cmd) -> Result<MailboxSendOutcome, ActorSendError> {
		Ok(self.tx.try_send(cmd)?)
	}

	/// Returns true once the mailbox no longer accepts commands.
	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	/// Cancels the running instance and closes the mailbox.
	///
	/// No restart follows. Later sends fail with [`ActorSendError::Closed`].
	pub fn cancel(&self) {
		self.cancel.cancel();
		self.tx.close();
	}

	pub fn last_exit(&self) -> Option<ActorExit> {
		self.published.last_exit.lock().clone()
	}

	/// Cancels the actor and waits for its supervisor to finish.
	///
	/// Only the first call joins; later calls return the recorded exit at once.
	pub async fn shutdown(&self) -> Option<ActorExit> {
		self.cancel();
		let supervisor = self.supervisor.lock().take();
		if let Some(supervisor) = supervisor
			&& let Err(err) = supervisor.await
		{
			tracing::warn!(actor = %self.name, %err, "worker.actor.join_failed");
		}
		self.last_exit()
	}
}

/// Spawns `spec` under a supervisor on the ambient runtime, returning the
/// command handle and the receiver for everything the actor emits.
pub fn spawn_actor<A>(spec: ActorSpec<A>) -> (ActorHandle<A::Cmd>, ActorEvents<A::Evt>)
where
	A: WorkerActor,
{
	let (tx, rx) = mailbox::latest_wins();
	let (events_tx, events_rx) = mpsc::unbounded_channel();
	let cancel = CancellationToken::new();
	let published = Arc::new(Published::default());

	let supervisor = Supervisor {
		name: spec.name.clone(),
		class: spec.class,
		factory: spec.factory,
		restart: spec.restart,
		rx: Arc::new(rx),
		events: events_tx,
		cancel: cancel.clone(),
		published: Arc::clone(&published),
	};
	let task = crate::spawn(spec.class, supervisor.run());

	let handle = ActorHandle {
		name: spec.name,
		tx,
		cancel,
		published,
		supervisor: Mutex::new(Some(task)),
	};
	(handle, events_rx)
}

struct Supervisor<A>
where
	A: WorkerActor,
{
	name: String,
	class: TaskClass,
	factory: Arc<dyn Fn() -> A + Send + Sync>,
	restart: RestartPolicy,
	rx: Arc<MailboxReceiver<A::Cmd>>,
	events: mpsc::UnboundedSender<A::Evt>,
	cancel: CancellationToken,
	published: Arc<Published>,
}

impl<A> Supervisor<A>
where
	A: WorkerActor,
{
	async fn run(self) {
		let generations = SequenceClock::new();
		let mut restarts = 0usize;
		while !self.cancel.is_cancelled() {
			let generation = generations.next();
			self.published.generation.store(generation, Ordering::Release);

			let exit = self.run_generation().await;
			tracing::debug!(
				actor = %self.name,
				class = self.class.as_str(),
				generation,
				restarts,
				exit = ?exit.kind(),
				message = exit.message(),
				"worker.actor.exit"
			);
			let delay = self.restart.delay_after(&exit, restarts);
			*self.published.last_exit.lock() = Some(exit);

			let Some(delay) = delay else {
				return;
			};
			restarts += 1;
			if !delay.is_zero() {
				tokio::select! {
					_ = self.cancel.cancelled() => break,
					_ = tokio::time::sleep(delay) => {}
				}
			}
		}
		*self.published.last_exit.lock() = Some(ActorExit::clean(ActorExitKind::Cancelled));
	}

	/// Runs one instance on its own task so a panic is caught by the join.
	async fn run_generation(&self) -> ActorExit {
		let token = self.cancel.child_token();
		let ctx = ActorContext { events: self.events.clone() };
		let instance = crate::spawn(self.class, drive((self.factory)(), Arc::clone(&self.rx), ctx, token.clone()));
		let exit = match instance.await {
			Ok(exit) => exit,
			Err(err) if err.is_panic() => ActorExit::clean(ActorExitKind::Panicked),
			Err(err) if err.is_cancelled() => ActorExit::clean(ActorExitKind::Cancelled),
			Err(err) => ActorExit::failed(ActorExitKind::JoinFailed, err.to_string()),
		};
		token.cancel();
		exit
	}
}

/// Feeds commands to `actor` until it fails or is cancelled.
async fn drive<A>(mut actor: A, rx: Arc<MailboxReceiver<A::Cmd>>, mut ctx: ActorContext<A::Evt>, token: CancellationToken) -> ActorExit
where
	A: WorkerActor,
{
	loop {
		let next = tokio::select! {
			biased;
			_ = token.cancelled() => None,
			cmd = rx.recv() => Some(cmd),
		};
		let cmd = match next {
			None => return ActorExit::clean(ActorExitKind::Cancelled),
			Some(None) => return ActorExit::clean(ActorExitKind::MailboxClosed),
			Some(Some(cmd)) => cmd,
		};

		let handled = tokio::select! {
			biased;
			_ = token.cancelled() => None,
			handled = actor.handle(cmd, &mut ctx) => Some(handled),
		};
		match handled {
			None => return ActorExit::clean(ActorExitKind::Cancelled),
			Some(Ok(())) => {}
			Some(Err(err)) => return ActorExit::failed(ActorExitKind::HandlerFailed, err),
		}
	}
}
