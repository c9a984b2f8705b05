// ============================================================================
// seqvid-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and File Output via fern
//
// Console output goes to stderr so `--json` output on stdout stays clean:
// plain messages at Info, prefixed and colored levels for warnings, errors
// and debug lines. When a log directory is given, every record down to Debug
// is also written to `seqvid_<command>_<timestamp>.log` with ANSI codes
// stripped.

use crate::error::{CliErrorContext, CliResult};

use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use seqvid_core::CoreError;

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let name = format!("seqvid_convert_{}.log", seqvid_cli::logging::get_timestamp());
/// assert_eq!(name.len(), "seqvid_convert_20240601_123045.log".len());
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the log file for `command` inside `log_dir`.
#[must_use]
pub fn log_file_path(log_dir: &Path, command: &str) -> PathBuf {
    log_dir.join(format!("seqvid_{}_{}.log", command, get_timestamp()))
}

/// Console log level for the verbosity flag.
#[must_use]
pub fn console_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Debug } else { LevelFilter::Info }
}

/// Whether console log lines are colored: stderr is a terminal and NO_COLOR is unset.
fn stderr_color(no_color: bool, stderr_is_terminal: bool) -> bool {
    !no_color && stderr_is_terminal
}

fn level_label(level: Level, color: bool) -> String {
    let label = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    if !color {
        return label.to_string();
    }
    match level {
        Level::Error => label.bright_red().bold().to_string(),
        Level::Warn => label.yellow().to_string(),
        Level::Info => label.green().to_string(),
        Level::Debug => label.blue().to_string(),
        Level::Trace => label.magenta().to_string(),
    }
}

/// Installs the global logger.
///
/// Returns the log file path when `log_dir` is set.
pub fn init_logging(
    verbose: bool,
    command: &str,
    log_dir: Option<&Path>,
) -> CliResult<Option<PathBuf>> {
    let color = stderr_color(
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stderr().is_terminal(),
    );
    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            if record.level() == Level::Info {
                out.finish(format_args!("{message}"))
            } else {
                out.finish(format_args!("{} {}", level_label(record.level(), color), message))
            }
        })
        .level(console_level(verbose))
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new()
        .level(LevelFilter::Debug)
        .chain(console);

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .cli_with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let path = log_file_path(dir, command);
            let file = fern::log_file(&path)
                .cli_with_context(|| format!("Failed to open log file {}", path.display()))?;
            root = root.chain(
                fern::Dispatch::new()
                    .format(|out, message, record| {
                        let text = strip_ansi_escapes::strip_str(message.to_string());
                        out.finish(format_args!(
                            "{} [{:<5}] {}: {}",
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                            record.level(),
                            record.target(),
                            text
                        ))
                    })
                    .level(LevelFilter::Debug)
                    .chain(file),
            );
            Some(path)
        }
        None => None,
    };

    root.apply()
        .map_err(|e| CoreError::Config(format!("Failed to initialize logging: {e}")))?;
    log::debug!("Logger initialized (console level {})", console_level(verbose));
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path() {
        let path = log_file_path(Path::new("/logs"), "convert");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("seqvid_convert_"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "seqvid_convert_20240601_123045.log".len());
        assert_eq!(path.parent(), Some(Path::new("/logs")));
    }

    #[test]
    fn test_console_level() {
        assert_eq!(console_level(false), LevelFilter::Info);
        assert_eq!(console_level(true), LevelFilter::Debug);
    }

    #[test]
    fn test_stderr_color() {
        assert!(stderr_color(false, true));
        assert!(!stderr_color(false, false));
        assert!(!stderr_color(true, true));
    }

    #[test]
    fn test_level_label_without_color() {
        assert_eq!(level_label(Level::Warn, false), "WARN");
        assert!(level_label(Level::Error, true).contains("ERROR"));
    }
}
