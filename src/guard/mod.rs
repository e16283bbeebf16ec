//! Runtime lifecycle guard
//!
//! The embedded runtime is live (safe to call into) if and only if the
//! guard's state is [`RuntimeState::Running`]. Transitions are monotonic:
//! `Uninitialized -> Running` via [`start`], `Running -> Stopped` via
//! [`stop`], and nothing else. Every other (state, operation) pair is
//! rejected, never silently accepted.
//!
//! [`start`]: LifecycleGuard::start
//! [`stop`]: LifecycleGuard::stop

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::LifecycleError;
use crate::options::{ArgvBuffer, RuntimeOptions};
use crate::runtime::EmbeddedRuntime;

/// Lifecycle state of an embedded runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    /// No successful init yet
    Uninitialized,
    /// Init succeeded; calls into the runtime are safe
    Running,
    /// Shutdown ran; terminal, calls into the runtime are forbidden
    Stopped,
}

/// Enforces at-most-once start/stop ordering around an embedded runtime.
///
/// All state access is serialized through a mutex, and the lock is held
/// across the foreign init/shutdown calls: of N racing `start()` callers
/// exactly one performs real initialization, and the rest observe
/// `Running` (or `Stopped`) once they acquire the lock. Both operations
/// block for the duration of the foreign call.
///
/// For the process-wide singleton around a real runtime, see the
/// crate-root `start`/`stop` functions (feature `ghc`). Individual
/// guard instances exist so embedders can wrap other runtimes and so
/// tests can run many lifecycles in one process.
pub struct LifecycleGuard<R> {
    /// Current state, also the serialization point for both operations
    state: Mutex<RuntimeState>,
    /// The foreign runtime's entry points
    runtime: R,
}

impl<R: EmbeddedRuntime> LifecycleGuard<R> {
    /// Create a guard in the `Uninitialized` state
    pub fn new(runtime: R) -> Self {
        Self {
            state: Mutex::new(RuntimeState::Uninitialized),
            runtime,
        }
    }

    /// Start the embedded runtime.
    ///
    /// Marshals `options` into a `main`-style argument vector, invokes
    /// the runtime's init entry point, and on success transitions to
    /// `Running`. Handing control to the runtime gives it out-of-band
    /// access to process resources (threads, signal handlers, memory)
    /// until [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::AlreadyStarted`] if the state is `Running` or
    ///   `Stopped`; there is no re-init and no restart.
    /// - [`LifecycleError::InvalidFlag`] for flags that cannot cross the
    ///   C boundary; the state is left `Uninitialized`.
    /// - [`LifecycleError::InitializationFailed`] if the runtime's init
    ///   entry point reports failure; the state is left `Uninitialized`.
    pub fn start(
        &self,
        options: &RuntimeOptions,
    ) -> Result<(), LifecycleError> {
        let mut state = self.state.lock();
        let current = *state;
        match current {
            RuntimeState::Running | RuntimeState::Stopped => {
                warn!(state = ?current, "start() rejected: runtime already started");
                Err(LifecycleError::AlreadyStarted)
            }
            RuntimeState::Uninitialized => {
                let argv = ArgvBuffer::build(options)?;
                debug!(flags = ?argv.flags(), "initializing embedded runtime");
                self.runtime.init(&argv)?;
                *state = RuntimeState::Running;
                debug!("embedded runtime running");
                Ok(())
            }
        }
    }

    /// Stop the embedded runtime.
    ///
    /// Invokes the runtime's shutdown entry point and transitions to
    /// `Stopped`. Teardown is best-effort: the transition happens
    /// regardless of what shutdown does. After this returns, calling
    /// into embedded-runtime code is forbidden.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotRunning`] if the state is `Uninitialized` or
    /// already `Stopped`. Callers should treat this as advisory during
    /// process shutdown (log and continue).
    pub fn stop(&self) -> Result<(), LifecycleError> {
        let mut state = self.state.lock();
        let current = *state;
        match current {
            RuntimeState::Running => {
                debug!("shutting down embedded runtime");
                self.runtime.shutdown();
                *state = RuntimeState::Stopped;
                Ok(())
            }
            RuntimeState::Uninitialized | RuntimeState::Stopped => {
                warn!(state = ?current, "stop() rejected: runtime not running");
                Err(LifecycleError::NotRunning)
            }
        }
    }

    /// Current lifecycle state, for diagnostics and logging
    pub fn state(&self) -> RuntimeState {
        *self.state.lock()
    }

    /// Whether the runtime is currently safe to call into
    pub fn is_running(&self) -> bool {
        self.state() == RuntimeState::Running
    }

    /// The wrapped runtime's entry points
    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}

#[cfg(test)]
mod tests;
