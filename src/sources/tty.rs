// Plain cooked-mode reader.  A raw-mode line editor would swallow
// Ctrl-Z before the kernel could turn it into SIGTSTP, and the
// foreground-only toggle depends on that signal reaching the shell.

use anyhow::Result;
use nix::unistd::getuid;

use std::io::{self, Stdin, Write};

use super::{Source, SourceKind};
use crate::line::Line;

pub struct Tty {
    stdin: Stdin,
    line_num: usize,
    last_line: Option<Line>,
}

impl Tty {
    pub fn build_source() -> Box<dyn Source> {
        let stdin = io::stdin();

        Box::new(Tty {
            stdin,
            line_num: 0,
            last_line: None,
        })
    }

    fn simple_prompt() -> String {
        if getuid().is_root() {
            "# ".to_string()
        } else {
            "$ ".to_string()
        }
    }
}

impl Source for Tty {
    fn get_line(&mut self) -> Result<Option<Line>> {
        let mut buffer = String::new();

        print!("{}", Tty::simple_prompt());
        io::stdout().flush()?;

        let num_bytes_read = self.stdin.read_line(&mut buffer)?;

        if num_bytes_read == 0 {
            Ok(None) // EOF was found
        } else {
            self.line_num += 1;

            let line = Line::new(buffer, self.line_num, SourceKind::Tty);

            self.last_line = Some(line.clone());

            Ok(Some(line))
        }
    }

    fn is_tty(&self) -> bool {
        true
    }

    fn print_error(&mut self) -> Result<()> {
        if let Some(line) = &self.last_line {
            eprintln!("{}", line);
        }

        Ok(())
    }
}
