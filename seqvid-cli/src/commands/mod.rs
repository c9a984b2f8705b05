// seqvid-cli/src/commands/mod.rs
//
// One module per subcommand. Each `run_*` returns the process exit code.

pub mod convert;
pub mod doctor;
pub mod inspect;

pub use convert::run_convert;
pub use doctor::run_doctor;
pub use inspect::run_inspect;
