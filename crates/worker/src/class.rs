use std::fmt;

/// Where a spawned unit of work runs, recorded on every spawn for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Async work on the runtime whose results may arrive late or be superseded.
	Background,
	/// CPU-bound passes moved onto the blocking pool so they never stall the
	/// runtime's worker threads.
	CpuBlocking,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Background => "background",
			Self::CpuBlocking => "cpu_blocking",
		}
	}
}

impl fmt::Display for TaskClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
