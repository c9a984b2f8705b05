// seqvid-cli/src/lib.rs
//
// Library portion of the Seqvid CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConvertArgs, InspectArgs};
pub use commands::{run_convert, run_doctor, run_inspect};
