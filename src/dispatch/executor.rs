//! # Executor trait and simple executors.

use std::sync::Arc;

use tokio::runtime::Handle;

/// Unit of work submitted by the multiplexer.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Dispatch target for consumer invocations.
///
/// ### Implementation requirements
/// - `execute` should return promptly; it is called on the provider's notifying thread.
/// - Faults raised by `job` are the executor's responsibility.
pub trait Executor: Send + Sync + 'static {
    /// Submits a job.
    fn execute(&self, job: Job);

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared executor handle.
pub type ExecutorRef = Arc<dyn Executor>;

/// Runs jobs immediately on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl InlineExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Shared handle to an inline executor.
    pub fn arc() -> ExecutorRef {
        Arc::new(Self)
    }
}

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) {
        job()
    }

    fn name(&self) -> &str {
        "inline"
    }
}

/// Spawns each job as a task on a tokio runtime.
///
/// A panicking job only fails its own task.
#[derive(Clone, Debug)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    /// Uses the given runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the runtime the caller is running on, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, job: Job) {
        self.handle.spawn(async move { job() });
    }

    fn name(&self) -> &str {
        "tokio"
    }
}
