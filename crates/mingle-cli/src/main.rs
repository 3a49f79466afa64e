use std::process::ExitCode;

mod cli;
mod modes;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // {:#} prints the whole anyhow context chain on one line
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
