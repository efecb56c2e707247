use std::process::ExitCode;

fn main() -> ExitCode {
    gm_cli::run()
}
