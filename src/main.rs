mod line;
mod shell;
mod signals;
mod sources;

use shell::Shell;

fn main() {
    let mut minsh = match Shell::new() {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("minsh: {}", e);
            std::process::exit(1);
        }
    };

    while let Err(e) = minsh.run() {
        eprintln!("minsh: {}", e);

        minsh.backtrace();
    }

    minsh.shutdown_background_jobs();

    std::process::exit(minsh.state().exit_code());
}
