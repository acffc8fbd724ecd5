use anyhow::Result;

use crate::line::Line;

pub mod script;
pub mod tty;

// Used in Line struct to identify where a line came from
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum SourceKind {
    Tty,
    Script(String), // String contains script pathname
}

pub trait Source {
    fn get_line(&mut self) -> Result<Option<Line>>;
    fn is_tty(&self) -> bool;
    fn print_error(&mut self) -> Result<()>;
}
