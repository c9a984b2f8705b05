//! Terminal output for command results.
//!
//! Human-readable summaries go to stdout with a section/status layout;
//! `--json` replaces them with one JSON document.

use owo_colors::OwoColorize;
use seqvid_core::{ConversionOutcome, ConversionReport, ImageSequence, format_bytes, format_duration};
use serde_json::json;

use std::io::IsTerminal;

/// Width of the label column in status lines.
const LABEL_WIDTH: usize = 15;

/// Check if color should be used (respects NO_COLOR and non-terminal output)
pub fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Print a section header
pub fn print_section(title: &str) {
    println!();
    if should_use_color() {
        println!("===== {} =====", title.to_uppercase().cyan().bold());
    } else {
        println!("===== {} =====", title.to_uppercase());
    }
    println!();
}

/// Print a status line with the label padded to a fixed column
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let padding = LABEL_WIDTH.saturating_sub(label.len()).max(1);
    if should_use_color() && highlight {
        println!("  {}:{} {}", label, " ".repeat(padding), value.bold());
    } else {
        println!("  {}:{} {}", label, " ".repeat(padding), value);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        println!("  {} {}", "✓".green().bold(), message.green());
    } else {
        println!("  ✓ {message}");
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        println!("  {} {}", "!".yellow().bold(), message.yellow());
    } else {
        println!("  ! {message}");
    }
}

/// Print an error line to stderr
pub fn print_error(message: &str) {
    if std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal() {
        eprintln!("{} {}", "Error:".bright_red().bold(), message);
    } else {
        eprintln!("Error: {message}");
    }
}

/// Print the status message of a conversion
pub fn print_outcome(outcome: &ConversionOutcome) {
    match outcome {
        ConversionOutcome::Done(report) => {
            print_report(report);
            print_success(outcome.message());
        }
        _ => print_warning(outcome.message()),
    }
}

/// Print the summary of a finished conversion
pub fn print_report(report: &ConversionReport) {
    print_section("Encoding Summary");
    print_status("Output", &report.output_path.display().to_string(), true);
    print_status("Frames", &report.frame_count.to_string(), false);
    print_status(
        "Frame range",
        &format!("{}-{}", report.frame_range.0, report.frame_range.1),
        false,
    );
    print_status("Resolution", &report.resolution.to_string(), false);
    print_status("Container", &report.container.to_string(), false);
    print_status("Quality", &report.quality.to_string(), false);
    print_status("Speed", &report.speed.to_string(), false);
    print_status(
        "Video length",
        &format!("{} at {} fps", format_duration(report.video_length_secs()), report.frame_rate),
        false,
    );
    if let Ok(size) = seqvid_core::utils::get_file_size(&report.output_path) {
        print_status("Output size", &format_bytes(size), false);
    }
    print_status("Encode time", &format_duration(report.elapsed.as_secs_f64()), false);
}

/// Print the canonical order of a sequence
pub fn print_sequence(sequence: &ImageSequence) {
    print_section("Image Sequence");
    print_status("Directory", &sequence.directory.display().to_string(), true);
    print_status("Frames", &sequence.len().to_string(), false);
    let (start, end) = sequence.frame_range();
    print_status("Frame range", &format!("{start}-{end}"), false);
    print_status("Output stem", &sequence.output_stem(), false);
    println!();
    for frame in &sequence.frames {
        let source = frame
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  {}  <-  {}", frame.canonical_name, source);
    }
}

/// JSON document for a conversion outcome.
#[must_use]
pub fn outcome_json(outcome: &ConversionOutcome) -> serde_json::Value {
    json!({
        "status": outcome.status_code(),
        "message": outcome.message(),
        "report": outcome.report(),
    })
}

/// JSON document for an inspected sequence.
#[must_use]
pub fn sequence_json(sequence: &ImageSequence) -> serde_json::Value {
    let (start, end) = sequence.frame_range();
    json!({
        "status": 0,
        "directory": sequence.directory,
        "prefix": sequence.prefix,
        "extension": sequence.extension,
        "frame_range": [start, end],
        "output_stem": sequence.output_stem(),
        "frames": sequence.frames,
    })
}
