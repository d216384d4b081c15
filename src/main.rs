use std::process::ExitCode;

fn main() -> ExitCode {
    match epoch_buddy::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
