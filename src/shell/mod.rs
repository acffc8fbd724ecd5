use anyhow::Result;

use crate::line::Line;
use crate::sources::Source;

use std::collections::HashMap;

mod exec;
mod init;
use init::init;
pub mod modules;
use modules::Builtin;
pub mod state;
use state::State;

pub struct Shell {
    sources: Vec<Box<dyn Source>>,
    builtins: HashMap<&'static str, Builtin>,
    state: State,
}

impl Shell {
    pub fn new() -> Result<Shell> {
        init()
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            // Finished background jobs are collected before each prompt
            if self.is_interactive() {
                self.reap_background_jobs();
            }

            match self.get_line()? {
                Some(mut line) => line.execute(self)?,
                None => break,
            }
        }

        Ok(())
    }

    fn get_line(&mut self) -> Result<Option<Line>> {
        if let Some(mut source) = self.sources.pop() {
            match source.get_line() {
                Ok(Some(line)) => {
                    self.sources.push(source);
                    Ok(Some(line))
                }
                Ok(None) => self.get_line(),
                Err(e) => {
                    self.sources.push(source);
                    Err(e)
                }
            }
        } else {
            Ok(None)
        }
    }

    pub fn get_builtin(&self, command: &str) -> Option<Builtin> {
        self.builtins.get(command).copied()
    }

    pub fn push_source(&mut self, source: Box<dyn Source>) {
        self.sources.push(source)
    }

    pub fn is_interactive(&self) -> bool {
        self.sources.last().map(|s| s.is_tty()).unwrap_or(false)
    }

    // Unwinds to the interactive source after an error, reporting the
    // offending line of each source on the way
    pub fn backtrace(&mut self) {
        while let Some(mut source) = self.sources.pop() {
            if source.is_tty() {
                self.sources.push(source);
                break;
            } else {
                let _ = source.print_error();
            }
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}
