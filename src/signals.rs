use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use nix::libc::{c_int, STDOUT_FILENO};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd;

pub const ENTERING_FOREGROUND_ONLY: &str = "\nEntering foreground-only mode (& is now ignored)\n";
pub const EXITING_FOREGROUND_ONLY: &str = "\nExiting foreground-only mode\n";

// Written only by the SIGTSTP handler, read by the launch path.  The
// unsynchronized read against an asynchronous write is a benign race:
// a toggle delivered mid-launch takes effect on the next command.
static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

pub fn foreground_only() -> bool {
    FOREGROUND_ONLY.load(Ordering::SeqCst)
}

// Flips the mode and returns the banner announcing the new mode.
// Kept separate from the handler so the toggle itself is testable.
fn toggle_foreground_only() -> &'static str {
    let was_foreground_only = FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst);

    if was_foreground_only {
        EXITING_FOREGROUND_ONLY
    } else {
        ENTERING_FOREGROUND_ONLY
    }
}

// The shell must survive SIGINT; a foreground child still receives the
// signal and reacts under its own (default) disposition.
extern "C" fn handle_sigint(_: c_int) {}

// Only async-signal-safe operations here: an atomic flip and a single
// unbuffered write(2) of fixed text.  Everything derived from the mode
// (demoting background requests) happens in the launch path.
extern "C" fn handle_sigtstp(_: c_int) {
    let banner = toggle_foreground_only();

    let _ = unistd::write(STDOUT_FILENO, banner.as_bytes());
}

/// Installs the shell's own dispositions: SIGINT caught and discarded,
/// SIGTSTP caught to toggle foreground-only mode.  SA_RESTART keeps a
/// blocked read on the tty from failing with EINTR when either arrives.
pub fn install_interpreter_profile() -> Result<()> {
    let interrupt = SigAction::new(
        SigHandler::Handler(handle_sigint),
        SaFlags::SA_RESTART,
        SigSet::all(),
    );
    let terminal_stop = SigAction::new(
        SigHandler::Handler(handle_sigtstp),
        SaFlags::SA_RESTART,
        SigSet::all(),
    );

    unsafe {
        sigaction(Signal::SIGINT, &interrupt)?;
        sigaction(Signal::SIGTSTP, &terminal_stop)?;
    }

    Ok(())
}

/// Applied in a forked child before exec.  Foreground children take the
/// default (terminating) SIGINT disposition back; background children
/// ignore SIGINT.  Neither kind responds to SIGTSTP.
pub fn apply_child_profile(background: bool) -> Result<()> {
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());

    unsafe {
        if background {
            sigaction(Signal::SIGINT, &ignore)?;
        } else {
            sigaction(Signal::SIGINT, &default)?;
        }

        sigaction(Signal::SIGTSTP, &ignore)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    // Single test: toggles share the process-wide flag, and parallel
    // tests would interleave on it.
    #[test]
    fn toggle_is_pairwise_idempotent_and_reports_the_new_mode() {
        let before = foreground_only();

        let first = toggle_foreground_only();
        let second = toggle_foreground_only();

        assert_eq!(foreground_only(), before);

        if before {
            assert_eq!(first, EXITING_FOREGROUND_ONLY);
            assert_eq!(second, ENTERING_FOREGROUND_ONLY);
        } else {
            assert_eq!(first, ENTERING_FOREGROUND_ONLY);
            assert_eq!(second, EXITING_FOREGROUND_ONLY);
        }
    }
}
