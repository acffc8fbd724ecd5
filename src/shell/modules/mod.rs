use anyhow::Result;

use super::Shell;

mod core;

pub type Builtin = fn(&mut Shell, Vec<&str>) -> Result<()>;

pub enum Module {
    Core,
}

pub fn load_module(minsh: &mut Shell, module: Module) {
    match module {
        Module::Core => {
            minsh.builtins.insert("cd", core::chdir);
            minsh.builtins.insert("exit", core::exit);
            minsh.builtins.insert("status", core::status);
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use crate::shell::state::State;

    use super::*;

    fn bare_shell() -> Shell {
        Shell {
            sources: vec![],
            builtins: HashMap::new(),
            state: State::new(),
        }
    }

    #[test]
    fn core_module_registers_the_three_builtins() {
        let mut minsh = bare_shell();

        load_module(&mut minsh, Module::Core);

        assert!(minsh.get_builtin("cd").is_some());
        assert!(minsh.get_builtin("exit").is_some());
        assert!(minsh.get_builtin("status").is_some());
        assert!(minsh.get_builtin("ls").is_none());
    }
}
