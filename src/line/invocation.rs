use anyhow::{anyhow, Result};

use crate::shell::Shell;

/// Redirection targets parsed out of a token sequence.  Opening and
/// binding the files happens in the forked child, not here.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Redirections {
    input: Option<String>,
    output: Option<String>,
}

impl Redirections {
    // Scans left to right; `<` and `>` each consume the following token
    // as a file path.  Operator and path never reach the argument
    // vector.  A repeated operator rebinds the same stream, so the last
    // occurrence wins.
    fn extract(tokens: Vec<String>) -> Result<(Vec<String>, Redirections)> {
        let mut argv = Vec::<String>::new();
        let mut input = None;
        let mut output = None;

        let mut tokens = tokens.into_iter();

        while let Some(token) = tokens.next() {
            match token.as_str() {
                "<" => match tokens.next() {
                    Some(path) => input = Some(path),
                    None => return Err(anyhow!("Missing file name after `<`")),
                },
                ">" => match tokens.next() {
                    Some(path) => output = Some(path),
                    None => return Err(anyhow!("Missing file name after `>`")),
                },
                _ => argv.push(token),
            }
        }

        Ok((argv, Redirections { input, output }))
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

/// A single command ready for dispatch: program and arguments, the
/// background marker, and any redirections.  Built once per line and
/// consumed immediately.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Invocation {
    argv: Vec<String>,
    background: bool,
    redirections: Redirections,
}

impl Invocation {
    /// Returns `None` for token sequences with nothing to run, such as
    /// a lone `&` or a bare redirection.
    pub fn new(mut tokens: Vec<String>) -> Result<Option<Invocation>> {
        if tokens.is_empty() {
            return Ok(None);
        }

        // Only a trailing standalone `&` marks a background command
        let background = tokens.last().map(|t| t == "&").unwrap_or(false);
        if background {
            tokens.pop();
        }

        let (argv, redirections) = Redirections::extract(tokens)?;

        if argv.is_empty() {
            return Ok(None);
        }

        Ok(Some(Invocation {
            argv,
            background,
            redirections,
        }))
    }

    pub fn argv(&self) -> Vec<&str> {
        self.argv.iter().map(|arg| arg.as_str()).collect()
    }

    pub fn background(&self) -> bool {
        self.background
    }

    pub fn redirections(&self) -> &Redirections {
        &self.redirections
    }

    /// Built-ins short-circuit external execution.
    pub fn execute(&self, minsh: &mut Shell) -> Result<()> {
        let argv = self.argv();

        if let Some(f) = minsh.get_builtin(argv[0]) {
            f(minsh, argv)
        } else {
            minsh.execute_external_command(self)
        }
    }
}
