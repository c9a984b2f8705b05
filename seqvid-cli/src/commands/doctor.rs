//! Implementation of the 'doctor' subcommand.

use crate::error::{CliResult, ERROR_EXIT_CODE};
use crate::output;

use seqvid_core::external::check_dependency;

/// External tools a conversion needs.
pub const REQUIRED_TOOLS: [&str; 2] = ["ffmpeg", "ffprobe"];

/// Checks each required tool. Returns 0 when all are present.
pub fn run_doctor() -> CliResult<i32> {
    output::print_section("Dependencies");
    let mut missing = 0;
    for tool in REQUIRED_TOOLS {
        match check_dependency(tool) {
            Ok(()) => output::print_status(tool, "found", false),
            Err(e) => {
                missing += 1;
                output::print_status(tool, &e.to_string(), true);
            }
        }
    }

    if missing == 0 {
        output::print_success("External dependency check passed.");
        Ok(0)
    } else {
        output::print_warning(&format!("{missing} required tool(s) missing"));
        Ok(ERROR_EXIT_CODE)
    }
}
