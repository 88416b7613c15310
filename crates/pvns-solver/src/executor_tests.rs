//! Tests for the batch executor.

use super::*;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

#[derive(Debug)]
enum Behavior {
    Value(u64),
    Sleep(u64, Duration),
    Error,
    Panic,
}

struct TestTask {
    behavior: Behavior,
    runs: usize,
}

impl TestTask {
    fn new(behavior: Behavior) -> Self {
        Self { behavior, runs: 0 }
    }
}

impl BatchTask for TestTask {
    type Output = Option<u64>;
    type Error = String;

    fn run(&mut self) -> std::result::Result<Option<u64>, String> {
        self.runs += 1;
        match self.behavior {
            Behavior::Value(v) => Ok(Some(v)),
            Behavior::Sleep(v, d) => {
                thread::sleep(d);
                Ok(Some(v))
            }
            Behavior::Error => Err("boom".to_string()),
            Behavior::Panic => panic!("explorer exploded"),
        }
    }

    fn failed_output(&self) -> Option<u64> {
        None
    }

    fn name(&self) -> &str {
        "test-task"
    }
}

fn outputs(results: Vec<TaskResult<Option<u64>>>) -> Vec<Option<u64>> {
    results.into_iter().map(|r| r.output).collect()
}

#[test]
fn test_results_in_submission_order() {
    let executor = BatchExecutor::new(3, "order").unwrap();
    let mut tasks = vec![
        TestTask::new(Behavior::Sleep(1, Duration::from_millis(60))),
        TestTask::new(Behavior::Sleep(2, Duration::from_millis(30))),
        TestTask::new(Behavior::Value(3)),
    ];

    let results = executor.submit_batch_and_wait(&mut tasks).unwrap();

    assert_eq!(outputs(results), vec![Some(1), Some(2), Some(3)]);
    assert!(tasks.iter().all(|t| t.runs == 1));
}

#[test]
fn test_failures_are_isolated() {
    let executor = BatchExecutor::new(4, "isolate").unwrap();
    let mut tasks = vec![
        TestTask::new(Behavior::Value(1)),
        TestTask::new(Behavior::Error),
        TestTask::new(Behavior::Panic),
        TestTask::new(Behavior::Value(4)),
    ];

    let results = executor.submit_batch_and_wait(&mut tasks).unwrap();

    assert_eq!(results.len(), 4);
    assert!(!results[0].is_failed());
    assert_eq!(
        results[1].failure,
        Some(TaskFailure::Error("boom".to_string()))
    );
    assert_eq!(
        results[2].failure,
        Some(TaskFailure::Panicked("explorer exploded".to_string()))
    );
    assert_eq!(outputs(results), vec![Some(1), None, None, Some(4)]);

    // The pool survives a panicking task.
    let mut again = vec![TestTask::new(Behavior::Value(9))];
    let results = executor.submit_batch_and_wait(&mut again).unwrap();
    assert_eq!(outputs(results), vec![Some(9)]);
}

#[test]
fn test_empty_batch() {
    let executor = BatchExecutor::new(2, "empty").unwrap();
    let mut tasks: Vec<TestTask> = Vec::new();
    let results = executor.submit_batch_and_wait(&mut tasks).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_thread_count_never_zero() {
    let executor = BatchExecutor::new(0, "zero").unwrap();
    assert_eq!(executor.thread_count(), 1);
}

#[test]
fn test_worker_threads_are_named() {
    struct NameTask;

    impl BatchTask for NameTask {
        type Output = String;
        type Error = String;

        fn run(&mut self) -> std::result::Result<String, String> {
            Ok(thread::current().name().unwrap_or_default().to_string())
        }

        fn failed_output(&self) -> String {
            String::new()
        }
    }

    let executor = BatchExecutor::new(2, "pvns").unwrap();
    let mut tasks = vec![NameTask, NameTask];
    let results = executor.submit_batch_and_wait(&mut tasks).unwrap();

    for result in results {
        assert!(result.output.starts_with("pvns-"), "got {}", result.output);
    }
}

#[test]
fn test_all_tasks_run_concurrently() {
    // Every task waits for all the others, so the batch only completes if
    // the pool runs them at the same time.
    struct RendezvousTask<'a>(&'a Barrier);

    impl BatchTask for RendezvousTask<'_> {
        type Output = bool;
        type Error = String;

        fn run(&mut self) -> std::result::Result<bool, String> {
            self.0.wait();
            Ok(true)
        }

        fn failed_output(&self) -> bool {
            false
        }
    }

    let barrier = Barrier::new(4);
    let executor = BatchExecutor::new(4, "rendezvous").unwrap();
    let mut tasks: Vec<RendezvousTask<'_>> = (0..4).map(|_| RendezvousTask(&barrier)).collect();

    let results = executor.submit_batch_and_wait(&mut tasks).unwrap();
    assert!(results.iter().all(|r| r.output));
}

#[test]
fn test_submit_after_shutdown_fails_fast() {
    let executor = BatchExecutor::new(1, "closed").unwrap();
    executor.shutdown().unwrap();

    let mut tasks = vec![TestTask::new(Behavior::Value(1))];
    let result = executor.submit_batch_and_wait(&mut tasks);

    assert_eq!(result.unwrap_err(), ExecutorError::Shutdown);
    assert_eq!(tasks[0].runs, 0);
}

#[test]
fn test_shutdown_is_idempotent() {
    let executor = BatchExecutor::new(2, "twice").unwrap();
    assert!(!executor.is_shutdown());

    executor.shutdown().unwrap();
    executor.shutdown().unwrap();

    assert!(executor.is_shutdown());
}

#[test]
fn test_shutdown_during_batch_is_rejected() {
    struct GateTask<'a> {
        started: &'a Barrier,
        release: &'a Barrier,
    }

    impl BatchTask for GateTask<'_> {
        type Output = ();
        type Error = String;

        fn run(&mut self) -> std::result::Result<(), String> {
            self.started.wait();
            self.release.wait();
            Ok(())
        }

        fn failed_output(&self) {}
    }

    let started = Barrier::new(2);
    let release = Barrier::new(2);
    let executor = BatchExecutor::new(1, "gate").unwrap();

    thread::scope(|s| {
        let handle = s.spawn(|| {
            let mut tasks = vec![GateTask {
                started: &started,
                release: &release,
            }];
            executor.submit_batch_and_wait(&mut tasks).map(|r| r.len())
        });

        started.wait();
        assert_eq!(executor.shutdown(), Err(ExecutorError::BatchInFlight));

        let mut second = vec![TestTask::new(Behavior::Value(1))];
        assert_eq!(
            executor.submit_batch_and_wait(&mut second).unwrap_err(),
            ExecutorError::BatchInFlight
        );

        release.wait();
        assert_eq!(handle.join().unwrap(), Ok(1));
    });

    executor.shutdown().unwrap();
    assert!(executor.is_shutdown());
}

#[test]
fn test_panic_message_extraction() {
    assert_eq!(panic_message(&"static"), "static");
    assert_eq!(panic_message(&"owned".to_string()), "owned");
    assert_eq!(panic_message(&42u8), "unknown panic payload");
}
