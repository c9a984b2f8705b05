//! File discovery module for finding the images of a sequence.
//!
//! This module lists the top level of a directory and keeps the files whose
//! extension (case-insensitive) is one of the supported still image formats.
//! Subdirectories are not searched.

use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Image extensions accepted as sequence members, lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "exr", "tiff"];

/// Returns true if the path has a supported image extension (any case).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Finds the image files in `input_dir`.
///
/// Entries are returned ordered by file name so the first element is stable
/// across platforms; numeric ordering is the job of
/// [`ImageSequence`](crate::sequence::ImageSequence).
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The matching files
/// * `Err(CoreError::DirectoryNotFound)` - If `input_dir` is not a directory
/// * `Err(CoreError::EmptySequence)` - If no supported images are present
///
/// # Examples
///
/// ```rust,no_run
/// use seqvid_core::find_image_files;
/// use std::path::Path;
///
/// match find_image_files(Path::new("/renders/shot_010")) {
///     Ok(files) => println!("Found {} images", files.len()),
///     Err(e) => println!("Error finding images: {}", e),
/// }
/// ```
pub fn find_image_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        log::debug!("Source directory does not exist: {}", input_dir.display());
        return Err(CoreError::DirectoryNotFound(input_dir.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            if !path.is_file() {
                return None;
            }

            is_supported_image(&path).then_some(path)
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::EmptySequence(input_dir.to_path_buf()));
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!("Found {} image(s) in {}", files.len(), input_dir.display());
    Ok(files)
}
