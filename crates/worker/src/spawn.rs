use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

/// Runtime backing callers that are not on a Tokio thread, such as a host's
/// UI loop. Built on first use and kept for the life of the process.
static FALLBACK: LazyLock<Runtime> = LazyLock::new(|| {
	Builder::new_multi_thread()
		.enable_all()
		.worker_threads(2)
		.thread_name("vista-worker")
		.build()
		.expect("failed to build vista-worker fallback runtime")
});

/// Handle of the ambient runtime, falling back to [`FALLBACK`].
pub(crate) fn runtime_handle() -> Handle {
	Handle::try_current().unwrap_or_else(|_| {
		tracing::trace!("worker.runtime.fallback");
		FALLBACK.handle().clone()
	})
}

/// Spawns an async task tagged with its execution class.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}

/// Spawns blocking work tagged with its execution class.
pub fn spawn_blocking<F, R>(class: TaskClass, f: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn_blocking");
	runtime_handle().spawn_blocking(f)
}
