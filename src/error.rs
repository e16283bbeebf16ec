//! Lifecycle error taxonomy
//!
//! Every error is returned to the immediate caller; the guard performs no
//! recovery and no automatic retry of its own.

use thiserror::Error;

/// Diagnostic reported by an embedded runtime's init entry point.
///
/// Carried verbatim: the guard does not interpret the runtime's own
/// message (e.g. an invalid allocator flag).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InitFailure {
    /// The runtime's diagnostic
    pub reason: String,
}

impl InitFailure {
    /// Wrap a runtime diagnostic
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the lifecycle guard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// A second `start()` in the same process, or a `start()` after
    /// `stop()`. The embedded runtime is not restartable; callers must
    /// not retry.
    #[error("embedded runtime already started; restart is not supported")]
    AlreadyStarted,

    /// A `stop()` without a preceding successful `start()`, or a
    /// duplicate `stop()`. Reported rather than silently ignored so
    /// callers can detect lifecycle bugs.
    #[error("embedded runtime is not running")]
    NotRunning,

    /// A flag that cannot be handed across the C boundary (empty, or
    /// containing an interior NUL byte). Rejected before any state
    /// transition.
    #[error("invalid runtime flag {flag:?}")]
    InvalidFlag {
        /// The offending flag
        flag: String,
    },

    /// The embedded runtime rejected its configuration or failed to
    /// allocate its resources. Treat as fatal to any code path that
    /// depends on the runtime.
    #[error("embedded runtime initialization failed: {0}")]
    InitializationFailed(#[from] InitFailure),
}
