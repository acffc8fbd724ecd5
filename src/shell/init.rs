use anyhow::Result;
use xdg::BaseDirectories;

use crate::signals;
use crate::sources::{script::Script, tty::Tty};

use super::modules::{load_module, Module};
use super::state::State;
use super::Shell;

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

pub fn init() -> Result<Shell> {
    signals::install_interpreter_profile()?;

    // `minsh script` runs the named file instead of the terminal
    let sources = match env::args().nth(1) {
        Some(path) => vec![Script::build_source(PathBuf::from(path))?],
        None => vec![Tty::build_source()],
    };

    let mut minsh = Shell {
        sources,
        builtins: HashMap::new(),
        state: State::new(),
    };

    load_module(&mut minsh, Module::Core);

    push_init_script(&mut minsh)?;

    Ok(minsh)
}

// Commands in $XDG_CONFIG_HOME/minsh/init run before the first prompt.
// A missing file is not an error.
fn push_init_script(minsh: &mut Shell) -> Result<()> {
    if let Ok(base_dirs) = BaseDirectories::new() {
        if let Some(path) = base_dirs.find_config_file(PathBuf::from("minsh/init")) {
            minsh.push_source(Script::build_source(path)?);
        }
    }

    Ok(())
}
