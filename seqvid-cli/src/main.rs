// seqvid-cli/src/main.rs
//
// Entry point for the `seqvid` binary: parses arguments, sets up logging,
// dispatches to the subcommand and turns its status into the exit code.
//
// Exit codes: 0 done, 1 no files found, 2 location not found, 3 any other
// error (printed to stderr as "Error: ...").

use clap::Parser;
use seqvid_cli::error::{CliResult, ERROR_EXIT_CODE};
use seqvid_cli::{Cli, Commands, logging, output, run_convert, run_doctor, run_inspect};

use std::process;

fn run(cli: Cli) -> CliResult<i32> {
    let log_dir = match &cli.command {
        Commands::Convert(args) => args.log_dir.clone(),
        _ => None,
    };
    let log_path = logging::init_logging(cli.verbose, cli.command.name(), log_dir.as_deref())?;

    match cli.command {
        Commands::Convert(args) => run_convert(args, log_path),
        Commands::Inspect(args) => run_inspect(args),
        Commands::Doctor => run_doctor(),
    }
}

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            output::print_error(&e.to_string());
            ERROR_EXIT_CODE
        }
    };
    process::exit(code);
}
