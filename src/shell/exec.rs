use std::ffi::CString;
use std::os::unix::io::RawFd;

use anyhow::{anyhow, Result};
use nix::fcntl::{open, OFlag};
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::signal::{kill, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{close, dup2, execvp, fork, ForkResult, Pid};

use crate::line::invocation::{Invocation, Redirections};
use crate::signals;

use super::state::CommandStatus;
use super::Shell;

impl Shell {
    /// Launches an external program.  The foreground/background
    /// classification is settled here: a `&` request is demoted to
    /// foreground while foreground-only mode is active.
    pub fn execute_external_command(&mut self, invocation: &Invocation) -> Result<()> {
        let background = invocation.background() && !signals::foreground_only();

        match unsafe { fork() }.map_err(|e| anyhow!("fork: {}", e))? {
            ForkResult::Child => {
                // The child never returns from exec_child; any error
                // short of a successful exec ends it with status 1.
                if let Err(e) = exec_child(invocation, background) {
                    eprintln!("minsh: {}", e);
                }
                std::process::exit(1);
            }
            ForkResult::Parent { child, .. } => {
                if background {
                    println!("Background pid is {}", child);
                    self.state_mut().register_background_job(child);
                } else {
                    let status = wait_foreground(child)?;
                    self.state_mut().set_last_status(status);
                }

                Ok(())
            }
        }
    }

    /// Non-blocking sweep for finished background children, run once
    /// per interactive cycle before the prompt appears.  Completions
    /// reported here never touch the last foreground status.
    pub fn reap_background_jobs(&mut self) {
        loop {
            match waitpid(None, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(pid, code)) => {
                    println!("Background pid {} is done: exit value {}", pid, code);
                    self.state_mut().forget_background_job(pid);
                }
                Ok(WaitStatus::Signaled(pid, signal, _)) => {
                    println!(
                        "Background pid {} is done: terminated by signal {}",
                        pid, signal as i32
                    );
                    self.state_mut().forget_background_job(pid);
                }
                // StillAlive, ECHILD: nothing ready to collect
                _ => break,
            }
        }
    }

    /// Terminates and collects any still-running background jobs.
    /// Called by the `exit` built-in and on end of input, so no child
    /// is left running unattended when the shell goes away.
    pub fn shutdown_background_jobs(&mut self) {
        for pid in self.state_mut().take_background_jobs() {
            // The job may already have died on its own
            if kill(pid, Signal::SIGTERM).is_ok() {
                let _ = waitpid(pid, None);
            }
        }
    }
}

// Runs in the forked child: signal profile, redirections, then program
// image replacement.  Returning at all means the launch failed.
fn exec_child(invocation: &Invocation, background: bool) -> Result<()> {
    signals::apply_child_profile(background)?;

    apply_redirections(invocation.redirections(), background)?;

    let argv = invocation
        .argv()
        .iter()
        .map(|arg| CString::new(*arg))
        .collect::<Result<Vec<CString>, _>>()
        .map_err(|_| anyhow!("Argument contains an interior NUL byte"))?;

    execvp(&argv[0], &argv).map_err(|e| anyhow!("{}: {}", invocation.argv()[0], e))?;

    unreachable!()
}

// Explicit redirections first; a background command then has any stream
// still bound to the terminal rebound to /dev/null, so it can neither
// steal input from the prompt nor write across it.  Foreground commands
// get no implicit redirection.
fn apply_redirections(redirections: &Redirections, background: bool) -> Result<()> {
    if let Some(path) = redirections.input() {
        bind_stream(path, OFlag::O_RDONLY, STDIN_FILENO)?;
    } else if background {
        bind_stream("/dev/null", OFlag::O_RDONLY, STDIN_FILENO)?;
    }

    if let Some(path) = redirections.output() {
        let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
        bind_stream(path, flags, STDOUT_FILENO)?;
    } else if background {
        bind_stream("/dev/null", OFlag::O_WRONLY, STDOUT_FILENO)?;
    }

    Ok(())
}

// Opens `path` and duplicates it onto a standard stream.  The opened
// descriptor is closed whether or not the duplication succeeded, so no
// descriptor outlives the exec that follows.
fn bind_stream(path: &str, flags: OFlag, target: RawFd) -> Result<()> {
    let fd = open(path, flags, Mode::from_bits_truncate(0o644))
        .map_err(|e| anyhow!("{}: {}", path, e))?;

    let bound = dup2(fd, target);
    let closed = close(fd);

    bound.map_err(|e| anyhow!("{}: {}", path, e))?;
    closed?;

    Ok(())
}

// Blocks until the foreground child exits or is killed by a signal.
// WUNTRACED also reports a stopped child; that report does not end the
// wait, so a suspended foreground job keeps the shell blocked until it
// actually terminates.
fn wait_foreground(child: Pid) -> Result<CommandStatus> {
    loop {
        match waitpid(child, Some(WaitPidFlag::WUNTRACED))? {
            WaitStatus::Exited(_, code) => return Ok(CommandStatus::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => return Ok(CommandStatus::Signaled(signal)),
            _ => continue,
        }
    }
}
