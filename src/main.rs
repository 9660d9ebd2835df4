use static_container_registry::cli::{Args, Runner};
use static_container_registry::logging::Logger;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse_args().from_env();

    let runner = match Runner::new(args) {
        Ok(runner) => runner,
        Err(e) => {
            Logger::default().error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    match runner.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            runner.logger().error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
