//! dupseq - duplicate removal and renumbering
//!
//! Entry point for the dupseq CLI application.

use clap::Parser;
use dupseq::{
    cli::{Cli, OutputFormat},
    error::{ExitCode, StructuredError},
    pipeline::PipelineError,
};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();
    dupseq::logging::init_logging(cli.verbose, cli.quiet);
    let json_errors = cli.command.common().output == Some(OutputFormat::Json)
        || std::env::var("DUPSEQ_OUTPUT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    match dupseq::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = if err
                .downcast_ref::<PipelineError>()
                .is_some_and(PipelineError::is_directory_error)
            {
                ExitCode::DirectoryNotFound
            } else {
                ExitCode::GeneralError
            };

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{}", json);
                } else {
                    eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
