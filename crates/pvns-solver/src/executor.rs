//! Fixed-size worker pool that runs one batch of tasks at a time.
//!
//! The executor owns a rayon thread pool sized once at construction.
//! [`BatchExecutor::submit_batch_and_wait`] runs every task of a batch on
//! the pool and blocks until all of them have finished. Results come back in
//! submission order, one per task, whatever order the tasks completed in.
//!
//! A task that errors or panics does not abort the batch: the failure is
//! logged and replaced by the task's [`BatchTask::failed_output`].
//!
//! # Example
//!
//! ```
//! use pvns_solver::executor::{BatchExecutor, BatchTask};
//!
//! struct Square(u64);
//!
//! impl BatchTask for Square {
//!     type Output = u64;
//!     type Error = String;
//!
//!     fn run(&mut self) -> Result<u64, String> {
//!         Ok(self.0 * self.0)
//!     }
//!
//!     fn failed_output(&self) -> u64 {
//!         0
//!     }
//! }
//!
//! let executor = BatchExecutor::new(2, "square").unwrap();
//! let mut tasks = vec![Square(2), Square(3), Square(4)];
//! let results = executor.submit_batch_and_wait(&mut tasks).unwrap();
//!
//! let outputs: Vec<u64> = results.into_iter().map(|r| r.output).collect();
//! assert_eq!(outputs, vec![4, 9, 16]);
//!
//! executor.shutdown().unwrap();
//! assert!(executor.submit_batch_and_wait(&mut tasks).is_err());
//! ```

use std::any::Any;
use std::fmt::{self, Debug, Display};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use crate::error::{ExecutorError, TaskFailure};

/// A unit of work that can be submitted to a [`BatchExecutor`].
///
/// Tasks in the same batch run concurrently, so they must not share mutable
/// state or depend on each other's ordering.
pub trait BatchTask: Send {
    /// Value produced by a run.
    type Output: Send;

    /// Error a run can report.
    type Error: Display;

    /// Performs the task.
    fn run(&mut self) -> Result<Self::Output, Self::Error>;

    /// Output recorded in place of a failed run.
    fn failed_output(&self) -> Self::Output;

    /// Name used when logging failures.
    fn name(&self) -> &str {
        "task"
    }
}

/// Outcome of one task in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult<O> {
    /// The task output, or its failure output if it failed.
    pub output: O,
    /// Set when the task errored or panicked.
    pub failure: Option<TaskFailure>,
}

impl<O> TaskResult<O> {
    /// Returns true if the task did not complete normally.
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Bounded worker pool with a full-batch completion barrier.
pub struct BatchExecutor {
    pool: Mutex<Option<Arc<ThreadPool>>>,
    in_flight: AtomicBool,
    thread_count: usize,
    name_prefix: String,
}

impl BatchExecutor {
    /// Creates an executor with `thread_count` workers named
    /// `<name_prefix>-<index>`.
    ///
    /// A thread count of zero is raised to one.
    pub fn new(thread_count: usize, name_prefix: impl Into<String>) -> Result<Self, ExecutorError> {
        let thread_count = thread_count.max(1);
        let name_prefix = name_prefix.into();
        let thread_prefix = name_prefix.clone();

        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(move |i| format!("{}-{}", thread_prefix, i))
            .build()
            .map_err(|e| ExecutorError::PoolBuild(e.to_string()))?;

        debug!(
            event = "executor_start",
            threads = thread_count,
            name = %name_prefix,
        );

        Ok(Self {
            pool: Mutex::new(Some(Arc::new(pool))),
            in_flight: AtomicBool::new(false),
            thread_count,
            name_prefix,
        })
    }

    /// Returns the number of worker threads.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Returns the worker thread name prefix.
    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    /// Returns true once [`shutdown`](Self::shutdown) has released the pool.
    pub fn is_shutdown(&self) -> bool {
        self.lock_pool().is_none()
    }

    /// Runs every task concurrently and blocks until all have completed.
    ///
    /// Returns exactly one [`TaskResult`] per task, in the order the tasks
    /// were given.
    ///
    /// # Errors
    ///
    /// * [`ExecutorError::Shutdown`] if the pool has been released.
    /// * [`ExecutorError::BatchInFlight`] if another batch is running.
    pub fn submit_batch_and_wait<T: BatchTask>(
        &self,
        tasks: &mut [T],
    ) -> Result<Vec<TaskResult<T::Output>>, ExecutorError> {
        let pool = {
            let guard = self.lock_pool();
            let pool = guard.as_ref().ok_or(ExecutorError::Shutdown)?;
            if self
                .in_flight
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return Err(ExecutorError::BatchInFlight);
            }
            Arc::clone(pool)
        };
        let _in_flight = InFlight(&self.in_flight);

        let results = pool.install(|| {
            tasks
                .par_iter_mut()
                .with_max_len(1)
                .enumerate()
                .map(|(index, task)| run_isolated(index, task))
                .collect::<Vec<_>>()
        });

        Ok(results)
    }

    /// Releases the worker pool.
    ///
    /// Calling it again, or on an executor that never ran a batch, is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::BatchInFlight`] if a batch is still running.
    pub fn shutdown(&self) -> Result<(), ExecutorError> {
        let mut guard = self.lock_pool();
        if self.in_flight.load(Ordering::Acquire) {
            return Err(ExecutorError::BatchInFlight);
        }
        if guard.take().is_some() {
            debug!(event = "executor_shutdown", name = %self.name_prefix);
        }
        Ok(())
    }

    fn lock_pool(&self) -> MutexGuard<'_, Option<Arc<ThreadPool>>> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for BatchExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchExecutor")
            .field("thread_count", &self.thread_count)
            .field("name_prefix", &self.name_prefix)
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

// Clears the in-flight flag when the batch ends, including on unwind.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn run_isolated<T: BatchTask>(index: usize, task: &mut T) -> TaskResult<T::Output> {
    let failure = match panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
        Ok(Ok(output)) => {
            return TaskResult {
                output,
                failure: None,
            }
        }
        Ok(Err(e)) => TaskFailure::Error(e.to_string()),
        Err(payload) => TaskFailure::Panicked(panic_message(payload.as_ref())),
    };

    warn!(
        event = "task_failed",
        task = index,
        name = task.name(),
        reason = %failure,
    );

    TaskResult {
        output: task.failed_output(),
        failure: Some(failure),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
