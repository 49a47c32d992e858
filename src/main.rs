use std::process::ExitCode;

fn main() -> ExitCode {
    groupmate_lib::run()
}
