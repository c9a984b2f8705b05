//! Utility functions for formatting and file operations.
//!
//! Duration and byte formatting for user-facing output, plus small path helpers.

use std::path::Path;

use crate::error::CoreResult;

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Length of a frame sequence in seconds at `frame_rate`.
#[must_use]
pub fn sequence_duration(frame_count: usize, frame_rate: u32) -> f64 {
    if frame_rate == 0 {
        return 0.0;
    }
    frame_count as f64 / f64::from(frame_rate)
}

/// Size of the file at `path` in bytes.
pub fn get_file_size(path: &Path) -> CoreResult<u64> {
    Ok(std::fs::metadata(path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(90061.0), "25:01:01");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MiB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GiB");
    }

    #[test]
    fn test_sequence_duration() {
        assert_eq!(sequence_duration(48, 24), 2.0);
        assert_eq!(sequence_duration(1, 25), 0.04);
        assert_eq!(sequence_duration(10, 0), 0.0);
    }

    #[test]
    fn test_get_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.mp4");
        std::fs::write(&file, [0u8; 10]).unwrap();
        assert_eq!(get_file_size(&file).unwrap(), 10);
        assert!(get_file_size(&dir.path().join("missing")).is_err());
    }
}
