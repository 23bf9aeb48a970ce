//! SIGCHLD notification for the prompt loop
//!
//! The handler only sets a flag; reaping happens on the main thread so the
//! directory history and undo log are never touched from signal context.

use std::sync::atomic::{AtomicBool, Ordering};

/// Flag indicating SIGCHLD was received (set by the signal handler)
static SIGCHLD_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Register the SIGCHLD handler
#[cfg(unix)]
pub fn install() {
    use signal_hook::low_level;

    unsafe {
        let _ = low_level::register(signal_hook::consts::SIGCHLD, || {
            SIGCHLD_RECEIVED.store(true, Ordering::SeqCst);
        });
    }
}

/// Register signal handlers (no-op on non-Unix)
#[cfg(not(unix))]
pub fn install() {}

/// Check whether SIGCHLD arrived since the last call, clearing the flag
pub fn take_sigchld() -> bool {
    SIGCHLD_RECEIVED.swap(false, Ordering::SeqCst)
}
