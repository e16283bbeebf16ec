//! ignition
//!
//! A process-wide lifecycle guard for an embedded managed-language runtime:
//! a garbage-collected execution environment (GC, scheduler, standard
//! library) started and stopped *inside* a host native process rather than
//! run as its own process.
//!
//! Most such runtimes expose a `main`-style init entry point and a one-shot
//! shutdown entry point, and double-initializing or restarting them is
//! undefined behavior. This crate enforces the contract around those two
//! calls: at most one successful [`LifecycleGuard::start`], at most one
//! successful [`LifecycleGuard::stop`], strict ordering, and serialization
//! of concurrent callers.
//!
//! # Example
//!
//! ```rust
//! use ignition::options::ArgvBuffer;
//! use ignition::{EmbeddedRuntime, InitFailure, LifecycleGuard, RuntimeOptions, RuntimeState};
//!
//! struct NullRuntime;
//!
//! impl EmbeddedRuntime for NullRuntime {
//!     fn init(
//!         &self,
//!         _argv: &ArgvBuffer,
//!     ) -> Result<(), InitFailure> {
//!         Ok(())
//!     }
//!
//!     fn shutdown(&self) {}
//! }
//!
//! let guard = LifecycleGuard::new(NullRuntime);
//! guard.start(&RuntimeOptions::new().flag("-A64m"))?;
//! assert_eq!(guard.state(), RuntimeState::Running);
//! guard.stop()?;
//! assert_eq!(guard.state(), RuntimeState::Stopped);
//! # Ok::<(), ignition::LifecycleError>(())
//! ```
//!
//! # Crate Features
//!
//! - `ghc`: bind the global guard to the GHC RTS (`hs_init`/`hs_exit`)

#![doc(html_root_url = "https://docs.rs/ignition")]
#![warn(rust_2018_idioms)]

// Public modules
pub mod error;
pub mod guard;
pub mod options;
pub mod runtime;

// Utility modules
pub mod util;

// Re-exports
pub use error::{InitFailure, LifecycleError};
pub use guard::{LifecycleGuard, RuntimeState};
pub use options::RuntimeOptions;
pub use runtime::EmbeddedRuntime;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "ghc")]
mod global {
    use once_cell::sync::Lazy;

    use crate::guard::LifecycleGuard;
    use crate::runtime::GhcRuntime;

    /// The process-wide guard around the linked GHC runtime.
    ///
    /// Never resettable: the GHC RTS cannot be restarted after `hs_exit`,
    /// so the singleton's state is monotonic for the process lifetime.
    pub(crate) static GUARD: Lazy<LifecycleGuard<GhcRuntime>> =
        Lazy::new(|| LifecycleGuard::new(GhcRuntime));
}

/// Start the process-wide embedded runtime.
///
/// Must be called before any call into embedded-runtime code. Fails with
/// [`LifecycleError::AlreadyStarted`] on every call after the first
/// successful one, including after [`stop`].
#[cfg(feature = "ghc")]
pub fn start(options: &RuntimeOptions) -> Result<(), LifecycleError> {
    global::GUARD.start(options)
}

/// Stop the process-wide embedded runtime.
///
/// After this returns (even with an error), calling into embedded-runtime
/// code is forbidden. Failing to call `stop` before process exit is
/// acceptable; process teardown reclaims the runtime's resources.
#[cfg(feature = "ghc")]
pub fn stop() -> Result<(), LifecycleError> {
    global::GUARD.stop()
}

/// Current state of the process-wide guard, for diagnostics.
#[cfg(feature = "ghc")]
pub fn state() -> RuntimeState {
    global::GUARD.state()
}
