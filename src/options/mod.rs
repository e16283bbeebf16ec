//! Runtime startup options and argv marshalling
//!
//! The embedded runtime's init entry point expects a `main`-style
//! argument vector: a program-name placeholder, then the configured
//! flags, then a null sentinel. [`RuntimeOptions`] holds the flags as
//! opaque strings; [`ArgvBuffer`] owns their C representation for the
//! duration of the init call.

use std::env;
use std::ffi::CString;

use libc::{c_char, c_int};
use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;

/// Placeholder used as `argv[0]` when handing the flag vector to the
/// embedded runtime. The runtime only uses it for its own diagnostics.
pub const PROGRAM_PLACEHOLDER: &str = "ignition";

/// Ordered flag sequence configuring embedded-runtime startup.
///
/// Flags are opaque to the guard; recognized effects (allocator arena
/// size, scheduler threads, ...) are entirely defined by the embedded
/// runtime. Constructed once and consumed by `start()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeOptions {
    /// Flags handed verbatim to the embedded runtime (e.g. `-A64m`)
    flags: Vec<String>,
}

impl RuntimeOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single flag (builder style)
    pub fn flag(
        mut self,
        flag: impl Into<String>,
    ) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// The configured flags, in order
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Whether no flags are configured
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Read a whitespace-separated flag list from an environment variable.
    ///
    /// An unset or empty variable yields an empty option set.
    pub fn from_env(var: &str) -> Self {
        let flags = env::var(var)
            .map(|raw| raw.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();
        Self { flags }
    }
}

impl FromIterator<String> for RuntimeOptions {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

/// A `main`-style argument vector in C shape.
///
/// Owns the `CString` storage; every pointer handed out by [`argv`]
/// points into that storage and is valid only while the buffer is alive.
/// The buffer lives on the caller's stack for the duration of the init
/// call and is dropped afterwards, so runtimes must not retain the
/// pointers past init (the GHC RTS copies what it keeps).
///
/// [`argv`]: ArgvBuffer::argv
#[derive(Debug)]
pub struct ArgvBuffer {
    storage: Vec<CString>,
    flags: Vec<String>,
}

impl ArgvBuffer {
    /// Marshal an option set into C form.
    ///
    /// Fails with [`LifecycleError::InvalidFlag`] on empty flags or flags
    /// with interior NUL bytes; nothing else is validated here since
    /// flag semantics belong to the embedded runtime.
    pub fn build(options: &RuntimeOptions) -> Result<Self, LifecycleError> {
        let mut storage = Vec::with_capacity(options.flags().len() + 1);
        storage.push(marshal_arg(PROGRAM_PLACEHOLDER)?);
        for flag in options.flags() {
            if flag.is_empty() {
                return Err(LifecycleError::InvalidFlag { flag: flag.clone() });
            }
            storage.push(marshal_arg(flag)?);
        }
        Ok(Self {
            storage,
            flags: options.flags().to_vec(),
        })
    }

    /// Argument count, placeholder included, sentinel excluded
    pub fn argc(&self) -> c_int {
        self.storage.len() as c_int
    }

    /// Null-terminated pointer vector.
    ///
    /// A fresh copy per call: init routines are allowed to rewrite the
    /// vector in place (the GHC RTS strips the flags it consumes), and
    /// that must not corrupt the buffer's own bookkeeping.
    pub fn argv(&self) -> Vec<*mut c_char> {
        let mut ptrs: Vec<*mut c_char> = self
            .storage
            .iter()
            .map(|arg| arg.as_ptr() as *mut c_char)
            .collect();
        ptrs.push(std::ptr::null_mut());
        ptrs
    }

    /// The original flags, for diagnostics
    pub fn flags(&self) -> &[String] {
        &self.flags
    }
}

fn marshal_arg(arg: &str) -> Result<CString, LifecycleError> {
    CString::new(arg).map_err(|_| LifecycleError::InvalidFlag {
        flag: arg.to_owned(),
    })
}
