use anyhow::{Context, Result};

use super::{Source, SourceKind};
use crate::line::Line;

use std::fs::read_to_string;
use std::path::PathBuf;

#[derive(Clone)]
pub struct Script {
    path: PathBuf,
    body: Vec<String>,
    line_num: usize,
    last_line: Option<Line>,
}

impl Script {
    pub fn build_source(path: PathBuf) -> Result<Box<dyn Source>> {
        let body = read_to_string(&path)
            .with_context(|| format!("{}", path.to_string_lossy()))?
            .lines()
            .map(|x| x.to_string())
            .collect();

        let script = Script {
            path,
            body,
            line_num: 0,
            last_line: None,
        };

        Ok(Box::new(script))
    }

    pub fn file_name(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

impl Source for Script {
    fn get_line(&mut self) -> Result<Option<Line>> {
        if self.line_num == self.body.len() {
            Ok(None)
        } else {
            let text = self.body[self.line_num].clone();
            self.line_num += 1;

            let line = Line::new(text, self.line_num, SourceKind::Script(self.file_name()));

            self.last_line = Some(line.clone());

            Ok(Some(line))
        }
    }

    fn is_tty(&self) -> bool {
        false
    }

    fn print_error(&mut self) -> Result<()> {
        if let Some(line) = &self.last_line {
            eprintln!("{}", line);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::line::LineKind;

    use super::*;

    use std::io::Write;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("minsh-test-{}-{}", std::process::id(), name));

        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();

        path
    }

    #[test]
    fn serves_lines_in_order_then_eof() {
        let path = scratch_file("serves", "# setup\necho one\n\necho two\n");
        let mut script = Script::build_source(path.clone()).unwrap();

        let first = script.get_line().unwrap().unwrap();
        assert_eq!(*first.kind(), LineKind::Comment);

        let second = script.get_line().unwrap().unwrap();
        assert_eq!(second.rawline(), "echo one");
        assert_eq!(*second.source(), SourceKind::Script(path.to_string_lossy().to_string()));

        let third = script.get_line().unwrap().unwrap();
        assert_eq!(*third.kind(), LineKind::Blank);

        let fourth = script.get_line().unwrap().unwrap();
        assert_eq!(fourth.rawline(), "echo two");

        assert!(script.get_line().unwrap().is_none());

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_script_is_an_error() {
        assert!(Script::build_source(PathBuf::from("/no/such/minsh/script")).is_err());
    }
}
