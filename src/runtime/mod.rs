//! Embedded-runtime boundary
//!
//! The guard drives exactly two foreign entry points: an init routine
//! taking a `main`-style argc/argv pair, and a shutdown routine taking
//! nothing. [`EmbeddedRuntime`] is the seam between the guard and those
//! entry points, so the guard's ordering logic is testable without a
//! foreign runtime linked in.

use crate::error::InitFailure;
use crate::options::ArgvBuffer;

/// The two entry points of an embedded managed-language runtime.
///
/// The guard upholds the calling contract: `init` is invoked at most
/// once per guard, `shutdown` at most once and only after a successful
/// `init`. Implementations wrap the actual foreign calls.
pub trait EmbeddedRuntime {
    /// Invoke the runtime's initialization entry point.
    ///
    /// `argv` carries the program-name placeholder, the configured flags,
    /// and the null sentinel, already marshalled into C form. Blocks until
    /// the runtime is up; init is assumed non-interruptible, and no timeout
    /// is imposed. On failure, returns the runtime's diagnostic verbatim.
    fn init(
        &self,
        argv: &ArgvBuffer,
    ) -> Result<(), InitFailure>;

    /// Invoke the runtime's shutdown entry point.
    ///
    /// Teardown is best-effort: the guard marks the runtime stopped no
    /// matter what this does. After it returns, any call into the foreign
    /// runtime is undefined behavior; the guard documents that as
    /// forbidden but cannot prevent it.
    fn shutdown(&self);
}

#[cfg(feature = "ghc")]
pub mod ghc;
#[cfg(feature = "ghc")]
pub use ghc::GhcRuntime;
