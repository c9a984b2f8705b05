//! Implementation of the 'convert' subcommand.
//!
//! Builds the encoding configuration from arguments and environment, then runs
//! the conversion against an ffmpeg host.

use crate::cli::ConvertArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

use seqvid_core::EncodingConfigBuilder;
use seqvid_core::config::EncodingConfig;
use seqvid_core::host::FfmpegHost;

use log::{debug, info};

use std::path::PathBuf;

/// Builds the encoding configuration from parsed arguments.
///
/// Unset options keep the library defaults. The project root falls back to
/// the current directory.
pub fn build_config(args: &ConvertArgs) -> CliResult<EncodingConfig> {
    let project_root = match &args.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().cli_context("Failed to read the current directory")?,
    };

    let mut builder = EncodingConfigBuilder::new()
        .source_dir(args.source_dir.clone())
        .project_root(project_root);
    if let Some(container) = args.container {
        builder = builder.container(container);
    }
    if let Some(quality) = args.quality {
        builder = builder.quality(quality);
    }
    if let Some(speed) = args.speed {
        builder = builder.speed(speed);
    }
    if let Some(frame_rate) = args.frame_rate {
        builder = builder.frame_rate(frame_rate);
    }
    if let Some(bitrate) = args.bitrate {
        builder = builder.bitrate_kbps(bitrate);
    }
    if let Some(work_dir) = &args.work_dir {
        builder = builder.work_root(work_dir.clone());
    }

    let config = builder.build();
    config.validate()?;
    Ok(config)
}

/// Runs the conversion and prints its outcome. Returns the status code.
pub fn run_convert(args: ConvertArgs, log_path: Option<PathBuf>) -> CliResult<i32> {
    let config = build_config(&args)?;
    let source_dir = config.resolved_source_dir();

    if !args.json {
        output::print_section("Seqvid Convert");
        output::print_status("Source", &source_dir.display().to_string(), true);
        output::print_status("Container", &config.container.to_string(), false);
        output::print_status("Quality", &config.quality.to_string(), false);
        output::print_status("Speed", &config.speed.to_string(), false);
        output::print_status("Frame rate", &config.frame_rate.to_string(), false);
        if let Some(path) = &log_path {
            output::print_status("Log file", &path.display().to_string(), false);
        }
    }
    debug!("Encoding configuration: {:?}", config);
    info!("Converting {}", source_dir.display());

    let mut host =
        FfmpegHost::new(config.work_root.clone()).show_progress(!args.no_progress && !args.json);
    let outcome = seqvid_core::convert_sequence(&mut host, &config)?;

    if args.json {
        let text = serde_json::to_string_pretty(&output::outcome_json(&outcome))
            .map_err(|e| seqvid_core::CoreError::Config(format!("Failed to encode JSON: {e}")))?;
        println!("{text}");
    } else {
        output::print_outcome(&outcome);
    }
    Ok(outcome.status_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use seqvid_core::config::{Container, EncodingSpeed, QualityTier};

    fn convert_args(extra: &[&str]) -> ConvertArgs {
        let mut argv = vec!["seqvid", "convert", "//shots/sh010", "--project-root", "/proj"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Convert(args) => args,
            other => panic!("Expected Convert command, got {other:?}"),
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&convert_args(&[])).unwrap();
        assert_eq!(config.container, Container::Mpeg4);
        assert_eq!(config.quality, QualityTier::PerceptuallyLossless);
        assert_eq!(config.speed, EncodingSpeed::Best);
        assert_eq!(config.frame_rate, 24);
        assert_eq!(config.bitrate_kbps, 6000);
        assert_eq!(config.resolved_source_dir(), PathBuf::from("/proj/shots/sh010"));
    }

    #[test]
    fn test_build_config_overrides() {
        let config = build_config(&convert_args(&[
            "--container",
            "mkv",
            "--quality",
            "none",
            "--bitrate",
            "2500",
            "--work-dir",
            "/scratch",
        ]))
        .unwrap();
        assert_eq!(config.container, Container::Matroska);
        assert_eq!(config.quality, QualityTier::ConstantBitrate);
        assert_eq!(config.bitrate_kbps, 2500);
        assert_eq!(config.work_root, PathBuf::from("/scratch"));
    }
}
