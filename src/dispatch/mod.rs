//! # Dispatch executors.
//!
//! Every subscription carries the [`Executor`] its consumer runs on. The multiplexer
//! only *submits* jobs; it never waits for them.
//!
//! ## Stock executors
//! | Executor          | Runs the job                         | Non-blocking submit | Panic handling            |
//! |-------------------|--------------------------------------|---------------------|---------------------------|
//! | [`InlineExecutor`]| on the submitting thread, immediately| no                  | propagates to submitter   |
//! | [`TokioExecutor`] | as a task on a tokio runtime         | yes                 | absorbed by the task      |
//! | [`QueueExecutor`] | on a dedicated FIFO worker           | yes (`try_send`)    | caught, `DispatchPanicked`|
//!
//! [`InlineExecutor`] suits tests and consumers that are already cheap and thread-safe;
//! a slow inline consumer stalls the provider's notifying thread.

mod executor;
mod queue;

pub use executor::{Executor, ExecutorRef, InlineExecutor, Job, TokioExecutor};
pub use queue::QueueExecutor;
