// seqvid-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use seqvid_core::config::{Container, EncodingSpeed, QualityTier};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Seqvid: Image sequence to video converter",
    long_about = "Turns a directory of numbered frames (shot_1.png, shot_2.png, ...) into a \
                  single video file using ffmpeg via the seqvid-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output on the console
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encodes the image sequence in a directory into one video
    Convert(ConvertArgs),
    /// Shows the canonical frame order of a directory without encoding
    Inspect(InspectArgs),
    /// Checks that ffmpeg and ffprobe are installed
    Doctor,
}

impl Commands {
    /// Short name used for log file names.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Convert(_) => "convert",
            Commands::Inspect(_) => "inspect",
            Commands::Doctor => "doctor",
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory holding the frames; `//name` is relative to the project root
    #[arg(required = true, value_name = "DIR")]
    pub source_dir: PathBuf,

    /// Output container: mpeg4, matroska, avi, flash or webm [default: mpeg4]
    #[arg(short, long, value_name = "CONTAINER", env = "SEQVID_CONTAINER")]
    pub container: Option<Container>,

    /// Quality tier: none, lossless, perc-lossless, high, medium, low, verylow or lowest
    /// [default: perc-lossless]
    #[arg(short, long, value_name = "QUALITY", env = "SEQVID_QUALITY")]
    pub quality: Option<QualityTier>,

    /// Encoding speed: best, good or realtime [default: best]
    #[arg(short, long, value_name = "SPEED", env = "SEQVID_SPEED")]
    pub speed: Option<EncodingSpeed>,

    /// Frames per second of the video [default: 24]
    #[arg(long, value_name = "FPS", env = "SEQVID_FRAME_RATE",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub frame_rate: Option<u32>,

    /// Bitrate in kbit/s, used by the "none" quality tier [default: 6000]
    #[arg(long, value_name = "KBPS", env = "SEQVID_BITRATE",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub bitrate: Option<u32>,

    /// Directory for temporary render contexts (defaults to the system temp dir)
    #[arg(long, value_name = "WORK_DIR", env = "SEQVID_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Root for `//`-prefixed and relative directories (defaults to the current dir)
    #[arg(long, value_name = "PROJECT_ROOT", env = "SEQVID_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Optional: Directory for a debug log file of this run
    #[arg(short, long, value_name = "LOG_DIR", env = "SEQVID_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print the result as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Disable the encoding progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Directory holding the frames; `//name` is relative to the project root
    #[arg(required = true, value_name = "DIR")]
    pub source_dir: PathBuf,

    /// Root for `//`-prefixed and relative directories (defaults to the current dir)
    #[arg(long, value_name = "PROJECT_ROOT", env = "SEQVID_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Print the sequence as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_basic_args() {
        let cli = Cli::parse_from(["seqvid", "convert", "renders/shot_010"]);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.source_dir, PathBuf::from("renders/shot_010"));
                assert!(!args.json);
                assert!(!args.no_progress);
                assert!(args.log_dir.is_none());
            }
            other => panic!("Expected Convert command, got {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_convert_with_encoding_args() {
        let cli = Cli::parse_from([
            "seqvid",
            "-v",
            "convert",
            "//frames",
            "--container",
            "webm",
            "--quality",
            "high",
            "--speed",
            "realtime",
            "--frame-rate",
            "30",
            "--bitrate",
            "8000",
            "--no-progress",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.container, Some(Container::WebM));
                assert_eq!(args.quality, Some(QualityTier::High));
                assert_eq!(args.speed, Some(EncodingSpeed::Realtime));
                assert_eq!(args.frame_rate, Some(30));
                assert_eq!(args.bitrate, Some(8000));
                assert!(args.no_progress);
            }
            other => panic!("Expected Convert command, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_frame_rate_is_rejected() {
        let result =
            Cli::try_parse_from(["seqvid", "convert", "frames", "--frame-rate", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_container_is_rejected() {
        let result = Cli::try_parse_from(["seqvid", "convert", "frames", "--container", "mov"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_inspect_and_doctor() {
        let cli = Cli::parse_from(["seqvid", "inspect", "frames", "--json"]);
        assert!(matches!(cli.command, Commands::Inspect(ref a) if a.json));
        assert_eq!(cli.command.name(), "inspect");

        let cli = Cli::parse_from(["seqvid", "doctor"]);
        assert!(matches!(cli.command, Commands::Doctor));
    }
}
