use std::process::ExitCode;

use modpub::ui::output;

fn main() -> ExitCode {
    match modpub::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
