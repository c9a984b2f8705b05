//! Implementation of the 'inspect' subcommand.
//!
//! Lists the canonical frame order of a directory without encoding. Missing
//! and empty directories report the same status codes as `convert`.

use crate::cli::InspectArgs;
use crate::error::{CliErrorContext, CliResult, exit_code_for};
use crate::output;

use seqvid_core::config::EncodingConfig;
use seqvid_core::{ConversionOutcome, CoreError, plan_sequence};

/// Prints the sequence found at the requested directory. Returns the status code.
pub fn run_inspect(args: InspectArgs) -> CliResult<i32> {
    let mut config = EncodingConfig::new(args.source_dir.clone());
    config.project_root = match args.project_root {
        Some(root) => root,
        None => std::env::current_dir().cli_context("Failed to read the current directory")?,
    };

    let sequence = match plan_sequence(&config) {
        Ok(sequence) => sequence,
        Err(e @ (CoreError::DirectoryNotFound(_) | CoreError::EmptySequence(_))) => {
            let outcome = match &e {
                CoreError::DirectoryNotFound(_) => ConversionOutcome::LocationNotFound,
                _ => ConversionOutcome::NoFilesFound,
            };
            log::debug!("{}", e);
            if args.json {
                println!("{}", output::outcome_json(&outcome));
            } else {
                output::print_warning(outcome.message());
            }
            return Ok(exit_code_for(&e));
        }
        Err(e) => return Err(e),
    };

    if args.json {
        let text = serde_json::to_string_pretty(&output::sequence_json(&sequence))
            .map_err(|e| CoreError::Config(format!("Failed to encode JSON: {e}")))?;
        println!("{text}");
    } else {
        output::print_sequence(&sequence);
    }
    Ok(0)
}
