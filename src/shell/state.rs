use std::fmt;

use nix::sys::signal::Signal;
use nix::unistd::Pid;

/// How the most recent foreground command ended.  Read back by the
/// `status` built-in and used as the shell's own exit code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CommandStatus {
    Exited(i32),
    Signaled(Signal),
}

impl CommandStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandStatus::Exited(code) => *code,
            CommandStatus::Signaled(signal) => 128 + *signal as i32,
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Exited(code) => write!(f, "exit value {}", code),
            CommandStatus::Signaled(signal) => {
                write!(f, "terminated by signal {}", *signal as i32)
            }
        }
    }
}

pub struct State {
    // Set by the foreground wait only; background completions never
    // touch it.
    last_status: CommandStatus,
    background_jobs: Vec<Pid>,
}

impl State {
    pub fn new() -> Self {
        State {
            last_status: CommandStatus::Exited(0),
            background_jobs: Vec::new(),
        }
    }

    pub fn last_status(&self) -> CommandStatus {
        self.last_status
    }

    pub fn set_last_status(&mut self, status: CommandStatus) {
        self.last_status = status;
    }

    pub fn exit_code(&self) -> i32 {
        self.last_status.exit_code()
    }

    pub fn register_background_job(&mut self, pid: Pid) {
        self.background_jobs.push(pid);
    }

    pub fn forget_background_job(&mut self, pid: Pid) {
        self.background_jobs.retain(|job| *job != pid);
    }

    pub fn take_background_jobs(&mut self) -> Vec<Pid> {
        std::mem::take(&mut self.background_jobs)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn initial_status_is_exit_value_zero() {
        let state = State::new();

        assert_eq!(state.last_status(), CommandStatus::Exited(0));
        assert_eq!(state.last_status().to_string(), "exit value 0");
    }

    #[test]
    fn exited_status_displays_its_code() {
        assert_eq!(CommandStatus::Exited(1).to_string(), "exit value 1");
    }

    #[test]
    fn signaled_status_displays_the_signal_number() {
        let status = CommandStatus::Signaled(Signal::SIGKILL);

        assert_eq!(status.to_string(), "terminated by signal 9");
        assert_eq!(status.exit_code(), 137);
    }

    #[test]
    fn background_registry_tracks_and_forgets_jobs() {
        let mut state = State::new();
        let first = Pid::from_raw(100);
        let second = Pid::from_raw(200);

        state.register_background_job(first);
        state.register_background_job(second);
        state.forget_background_job(first);

        assert_eq!(state.take_background_jobs(), vec![second]);
        assert!(state.take_background_jobs().is_empty());
    }
}
