//! Lifecycle guard unit tests
//!
//! Exercises the state machine, the error taxonomy, and the
//! first-call-wins concurrency guarantee against a recording test double.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;

use crate::error::{InitFailure, LifecycleError};
use crate::guard::{LifecycleGuard, RuntimeState};
use crate::options::{ArgvBuffer, RuntimeOptions};
use crate::runtime::EmbeddedRuntime;

/// Test double recording every entry-point call
#[derive(Default)]
struct RecordingRuntime {
    init_calls: AtomicUsize,
    shutdown_calls: AtomicUsize,
    reject_with: Option<&'static str>,
    seen_flags: Mutex<Vec<String>>,
}

impl RecordingRuntime {
    fn rejecting(reason: &'static str) -> Self {
        Self {
            reject_with: Some(reason),
            ..Self::default()
        }
    }

    fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    fn shutdown_calls(&self) -> usize {
        self.shutdown_calls.load(Ordering::SeqCst)
    }
}

impl EmbeddedRuntime for RecordingRuntime {
    fn init(
        &self,
        argv: &ArgvBuffer,
    ) -> Result<(), InitFailure> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_flags.lock() = argv.flags().to_vec();
        match self.reject_with {
            Some(reason) => Err(InitFailure::new(reason)),
            None => Ok(()),
        }
    }

    fn shutdown(&self) {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn test_initial_state_is_uninitialized() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        assert_eq!(guard.state(), RuntimeState::Uninitialized);
        assert!(!guard.is_running());
    }

    #[test]
    fn test_state_running_after_start() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        guard.start(&RuntimeOptions::new()).unwrap();
        assert_eq!(guard.state(), RuntimeState::Running);
        assert!(guard.is_running());
    }

    #[test]
    fn test_state_stopped_after_stop() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        guard.start(&RuntimeOptions::new()).unwrap();
        guard.stop().unwrap();
        assert_eq!(guard.state(), RuntimeState::Stopped);
        assert!(!guard.is_running());
    }

    #[test]
    fn test_state_stopped_after_failed_duplicate_stop() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        guard.start(&RuntimeOptions::new()).unwrap();
        guard.stop().unwrap();
        let _ = guard.stop();
        assert_eq!(guard.state(), RuntimeState::Stopped);
    }
}

#[cfg(test)]
mod start_tests {
    use super::*;

    #[test]
    fn test_start_with_no_flags() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        assert_eq!(guard.start(&RuntimeOptions::new()), Ok(()));
        assert_eq!(guard.runtime().init_calls(), 1);
    }

    #[test]
    fn test_second_start_is_rejected() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        guard.start(&RuntimeOptions::new()).unwrap();
        let second = guard.start(&RuntimeOptions::new().flag("-A64m"));
        assert_eq!(second, Err(LifecycleError::AlreadyStarted));
        // the losing call never reached the runtime
        assert_eq!(guard.runtime().init_calls(), 1);
    }

    #[test]
    fn test_start_after_stop_is_rejected() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        guard.start(&RuntimeOptions::new()).unwrap();
        guard.stop().unwrap();
        assert_eq!(
            guard.start(&RuntimeOptions::new()),
            Err(LifecycleError::AlreadyStarted)
        );
        assert_eq!(guard.runtime().init_calls(), 1);
    }

    #[test]
    fn test_flags_reach_the_runtime_in_order() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        let options = RuntimeOptions::new().flag("-A64m").flag("-N4");
        guard.start(&options).unwrap();
        assert_eq!(*guard.runtime().seen_flags.lock(), vec!["-A64m", "-N4"]);
    }

    #[test]
    fn test_empty_flag_is_rejected_before_init() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        let result = guard.start(&RuntimeOptions::new().flag(""));
        assert_eq!(
            result,
            Err(LifecycleError::InvalidFlag {
                flag: String::new()
            })
        );
        assert_eq!(guard.state(), RuntimeState::Uninitialized);
        assert_eq!(guard.runtime().init_calls(), 0);
    }

    #[test]
    fn test_nul_flag_is_rejected_before_init() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        let result = guard.start(&RuntimeOptions::new().flag("-A\0m"));
        assert!(matches!(result, Err(LifecycleError::InvalidFlag { .. })));
        assert_eq!(guard.runtime().init_calls(), 0);
    }

    #[test]
    fn test_init_failure_leaves_state_uninitialized() {
        let guard = LifecycleGuard::new(RecordingRuntime::rejecting("bad allocator flag"));
        let result = guard.start(&RuntimeOptions::new().flag("--bad-flag"));
        assert_eq!(
            result,
            Err(LifecycleError::InitializationFailed(InitFailure::new(
                "bad allocator flag"
            )))
        );
        assert_eq!(guard.state(), RuntimeState::Uninitialized);
        assert_eq!(guard.runtime().shutdown_calls(), 0);
    }

    #[test]
    fn test_init_failure_diagnostic_is_verbatim() {
        let guard = LifecycleGuard::new(RecordingRuntime::rejecting("heap exhausted: -H1t"));
        let err = guard.start(&RuntimeOptions::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "embedded runtime initialization failed: heap exhausted: -H1t"
        );
    }
}

#[cfg(test)]
mod stop_tests {
    use super::*;

    #[test]
    fn test_stop_without_start_is_rejected() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        assert_eq!(guard.stop(), Err(LifecycleError::NotRunning));
        assert_eq!(guard.runtime().shutdown_calls(), 0);
    }

    #[test]
    fn test_stop_after_start_succeeds_once() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        guard.start(&RuntimeOptions::new()).unwrap();
        assert_eq!(guard.stop(), Ok(()));
        assert_eq!(guard.stop(), Err(LifecycleError::NotRunning));
        assert_eq!(guard.runtime().shutdown_calls(), 1);
    }

    #[test]
    fn test_stop_after_failed_start_is_rejected() {
        let guard = LifecycleGuard::new(RecordingRuntime::rejecting("no memory"));
        let _ = guard.start(&RuntimeOptions::new());
        assert_eq!(guard.stop(), Err(LifecycleError::NotRunning));
        assert_eq!(guard.runtime().shutdown_calls(), 0);
    }
}

#[cfg(test)]
mod concurrency_tests {
    use super::*;

    #[test]
    fn test_concurrent_starts_one_winner() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        let results: Vec<Result<(), LifecycleError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| guard.start(&RuntimeOptions::new())))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results
            .iter()
            .filter(|r| **r == Err(LifecycleError::AlreadyStarted))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(rejected, 7);
        assert_eq!(guard.runtime().init_calls(), 1);
        assert_eq!(guard.state(), RuntimeState::Running);
    }

    #[test]
    fn test_concurrent_stops_one_winner() {
        let guard = LifecycleGuard::new(RecordingRuntime::default());
        guard.start(&RuntimeOptions::new()).unwrap();

        let results: Vec<Result<(), LifecycleError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| guard.stop())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert_eq!(guard.runtime().shutdown_calls(), 1);
        assert_eq!(guard.state(), RuntimeState::Stopped);
    }
}
