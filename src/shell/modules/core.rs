use std::env;

use anyhow::{anyhow, Result};

use crate::shell::Shell;

// `cd` with no argument (or `~`) goes to $HOME; an explicit path that
// cannot be entered is reported without terminating the shell.
pub fn chdir(_minsh: &mut Shell, argv: Vec<&str>) -> Result<()> {
    match argv.len() {
        1 => go_home(),
        2 if argv[1] == "~" => go_home(),
        2 => env::set_current_dir(argv[1]).map_err(|e| anyhow!("cd: {}: {}", argv[1], e)),
        _ => Err(anyhow!("cd: Too many arguments")),
    }
}

fn go_home() -> Result<()> {
    if let Some(dir) = env::var_os("HOME") {
        env::set_current_dir(&dir).map_err(|e| anyhow!("cd: {:?}: {}", dir, e))?;
    }

    Ok(())
}

// Outstanding background jobs are terminated and collected first, so
// none of them outlives the shell unattended.
pub fn exit(minsh: &mut Shell, _argv: Vec<&str>) -> Result<()> {
    minsh.shutdown_background_jobs();

    std::process::exit(0);
}

pub fn status(minsh: &mut Shell, _argv: Vec<&str>) -> Result<()> {
    println!("{}", minsh.state().last_status());

    Ok(())
}
