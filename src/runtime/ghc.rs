//! GHC RTS binding
//!
//! Binds [`EmbeddedRuntime`] to the `hs_init`/`hs_exit` symbols of a GHC
//! runtime linked into the host binary (the host's build links the
//! Haskell library and `libHSrts`; this module only declares the
//! symbols).

use libc::{c_char, c_int};

use super::EmbeddedRuntime;
use crate::error::InitFailure;
use crate::options::ArgvBuffer;

extern "C" {
    fn hs_init(
        argc: *mut c_int,
        argv: *mut *mut *mut c_char,
    );
    fn hs_exit();
}

/// The GHC runtime system linked into this process.
///
/// `hs_init` returns no status: on an unrecognized RTS flag it prints a
/// diagnostic and aborts the process instead of returning. A return from
/// `init` is therefore the only available success signal. Restarting the
/// RTS after `hs_exit` is not supported by GHC, which is why the global
/// guard's `Stopped` state is terminal.
#[derive(Debug, Default)]
pub struct GhcRuntime;

impl EmbeddedRuntime for GhcRuntime {
    fn init(
        &self,
        argv: &ArgvBuffer,
    ) -> Result<(), InitFailure> {
        let mut argc = argv.argc();
        let mut ptrs = argv.argv();
        let mut argv_ptr = ptrs.as_mut_ptr();
        // hs_init rewrites argc/argv in place to strip the RTS flags it
        // consumed; the copies are discarded afterwards, as the RTS keeps
        // its own.
        unsafe { hs_init(&mut argc, &mut argv_ptr) };
        Ok(())
    }

    fn shutdown(&self) {
        unsafe { hs_exit() };
    }
}
