//! Single-slot latest-wins mailbox with a synchronous producer side.
//!
//! Producers are usually UI-thread code that must never block or await, so
//! [`MailboxSender::try_send`] completes under a short `parking_lot` critical
//! section. At most one message waits behind the one being processed; a newer
//! send replaces it.

use std::pin::pin;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Notify;

/// Outcome from enqueueing a mailbox message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxSendOutcome {
	/// The slot was empty.
	Enqueued,
	/// A queued message was replaced before anyone received it.
	Superseded,
}

/// Mailbox send error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MailboxSendError {
	/// Mailbox is closed.
	#[error("mailbox closed")]
	Closed,
}

struct MailboxState<T> {
	slot: Option<T>,
	closed: bool,
}

struct MailboxInner<T> {
	state: Mutex<MailboxState<T>>,
	notify_recv: Notify,
}

/// Multi-producer mailbox sender.
pub struct MailboxSender<T> {
	inner: Arc<MailboxInner<T>>,
}

/// Mailbox receiver.
pub struct MailboxReceiver<T> {
	inner: Arc<MailboxInner<T>>,
}

impl<T> Clone for MailboxSender<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

/// Creates a latest-wins mailbox.
pub fn latest_wins<T>() -> (MailboxSender<T>, MailboxReceiver<T>) {
	let inner = Arc::new(MailboxInner {
		state: Mutex::new(MailboxState { slot: None, closed: false }),
		notify_recv: Notify::new(),
	});
	(MailboxSender { inner: Arc::clone(&inner) }, MailboxReceiver { inner })
}

impl<T> MailboxSender<T> {
	/// Closes the mailbox. The receiver drains a queued message then returns `None`.
	pub fn close(&self) {
		self.inner.state.lock().closed = true;
		self.inner.notify_recv.notify_waiters();
	}

	/// Returns true once the mailbox has been closed.
	pub fn is_closed(&self) -> bool {
		self.inner.state.lock().closed
	}

	/// Non-blocking enqueue, replacing any message still waiting.
	pub fn try_send(&self, msg: T) -> Result<MailboxSendOutcome, MailboxSendError> {
		let mut state = self.inner.state.lock();
		if state.closed {
			return Err(MailboxSendError::Closed);
		}
		let outcome = match state.slot.replace(msg) {
			Some(_) => MailboxSendOutcome::Superseded,
			None => MailboxSendOutcome::Enqueued,
		};
		drop(state);
		self.inner.notify_recv.notify_one();
		Ok(outcome)
	}
}

impl<T> MailboxReceiver<T> {
	/// Receives one message. Returns `None` once mailbox is closed and drained.
	pub async fn recv(&self) -> Option<T> {
		loop {
			// Enabled before the state check so a close or send between the
			// check and the await still wakes us.
			let mut notified = pin!(self.inner.notify_recv.notified());
			notified.as_mut().enable();
			{
				let mut state = self.inner.state.lock();
				if let Some(msg) = state.slot.take() {
					return Some(msg);
				}
				if state.closed {
					return None;
				}
			}
			notified.await;
		}
	}
}
