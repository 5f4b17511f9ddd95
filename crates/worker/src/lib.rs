//! Background execution primitives.
//!
//! * [`spawn`] / [`spawn_blocking`] route work onto the ambient Tokio runtime,
//!   or a shared fallback runtime when the caller is a plain thread.
//! * [`mailbox::latest_wins`] is a single-slot queue with synchronous
//!   producers where each send supersedes the one still waiting.
//! * [`spawn_actor`] runs a [`WorkerActor`] under a restarting supervisor.
//! * [`SequenceClock`] issues monotonically increasing request numbers.

pub mod actor;
mod class;
pub mod mailbox;
mod spawn;
mod token;

pub use actor::{ActorContext, ActorEvents, ActorExit, ActorExitKind, ActorHandle, ActorSendError, ActorSpec, RestartPolicy, WorkerActor, spawn_actor};
pub use class::TaskClass;
pub use mailbox::{MailboxReceiver, MailboxSendError, MailboxSendOutcome, MailboxSender};
pub use spawn::{spawn, spawn_blocking};
pub use token::SequenceClock;
