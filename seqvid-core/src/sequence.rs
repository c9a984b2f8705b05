//! Image sequence ordering.
//!
//! Frame numbers are taken from the last `_`-separated token of the file stem
//! (`shot_12.png` is frame 12 of prefix `shot`). The prefix and extension of
//! the whole sequence come from the first file; members are ordered by their
//! numeric index and addressed by a canonical name with a 4-digit index
//! (`shot_0012.png`).
//!
//! Gaps and duplicate indices are kept as-is: a duplicate index simply shows
//! up twice in the ordered sequence.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// Width of the zero-padded index in canonical names.
pub const CANONICAL_INDEX_WIDTH: usize = 4;

/// One member of an image sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceFrame {
    /// Frame number parsed from the file name
    pub index: u64,
    /// Zero-padded, prefix-normalized name (`<prefix>_<index:04>.<ext>`)
    pub canonical_name: String,
    /// File the frame was read from
    pub source: PathBuf,
}

/// An ordered image sequence sharing one prefix and extension.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSequence {
    pub directory: PathBuf,
    pub prefix: String,
    pub extension: String,
    pub frames: Vec<SequenceFrame>,
}

impl ImageSequence {
    /// Builds the ordered sequence from the files of one directory.
    ///
    /// The first file of `files` decides the prefix and extension. Every
    /// file must end in a numeric `_` token, otherwise
    /// [`CoreError::NonNumericFrameToken`] is returned.
    pub fn from_files(directory: &Path, files: &[PathBuf]) -> CoreResult<Self> {
        let first = files
            .first()
            .ok_or_else(|| CoreError::EmptySequence(directory.to_path_buf()))?;

        let (first_stem, extension) = stem_and_extension(first)?;
        let (prefix, _) = split_frame_token(&first_stem);
        let prefix = prefix.to_string();

        let mut indexed = Vec::with_capacity(files.len());
        for file in files {
            let (stem, _) = stem_and_extension(file)?;
            let (_, token) = split_frame_token(&stem);
            let index = parse_frame_token(file, token)?;
            indexed.push((index, file.clone()));
        }

        // Stable, so duplicate indices keep their listing order.
        indexed.sort_by_key(|(index, _)| *index);

        let frames = indexed
            .into_iter()
            .map(|(index, source)| SequenceFrame {
                index,
                canonical_name: canonical_name(&prefix, index, &extension),
                source,
            })
            .collect();

        Ok(Self {
            directory: directory.to_path_buf(),
            prefix,
            extension,
            frames,
        })
    }

    /// Number of frames, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The first frame in canonical order.
    #[must_use]
    pub fn first(&self) -> Option<&SequenceFrame> {
        self.frames.first()
    }

    /// Render frame range, always starting at 1.
    #[must_use]
    pub fn frame_range(&self) -> (u32, u32) {
        (1, u32::try_from(self.frames.len()).unwrap_or(u32::MAX))
    }

    /// Canonical names in order.
    #[must_use]
    pub fn canonical_names(&self) -> Vec<String> {
        self.frames.iter().map(|f| f.canonical_name.clone()).collect()
    }

    /// Source files in order.
    #[must_use]
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.frames.iter().map(|f| f.source.clone()).collect()
    }

    /// File stem of the encoded output.
    ///
    /// This is the sequence prefix. An empty prefix falls back to the frame
    /// range (`0001-0120`) so the output never becomes a hidden dotfile.
    #[must_use]
    pub fn output_stem(&self) -> String {
        if self.prefix.is_empty() {
            let (start, end) = self.frame_range();
            format!(
                "{start:0width$}-{end:0width$}",
                width = CANONICAL_INDEX_WIDTH
            )
        } else {
            self.prefix.clone()
        }
    }
}

/// Splits a file stem into `(prefix, frame token)` at the last `_`.
///
/// A stem without `_` has an empty prefix and is entirely the token.
#[must_use]
pub fn split_frame_token(stem: &str) -> (&str, &str) {
    match stem.rsplit_once('_') {
        Some((prefix, token)) => (prefix, token),
        None => ("", stem),
    }
}

/// Formats the canonical name of frame `index`.
#[must_use]
pub fn canonical_name(prefix: &str, index: u64, extension: &str) -> String {
    if prefix.is_empty() {
        format!("{index:0width$}.{extension}", width = CANONICAL_INDEX_WIDTH)
    } else {
        format!(
            "{prefix}_{index:0width$}.{extension}",
            width = CANONICAL_INDEX_WIDTH
        )
    }
}

fn parse_frame_token(file: &Path, token: &str) -> CoreResult<u64> {
    // Only plain ASCII digits; `u64::from_str` would also accept a leading '+'.
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(non_numeric(file, token));
    }
    token.parse::<u64>().map_err(|_| non_numeric(file, token))
}

fn non_numeric(file: &Path, token: &str) -> CoreError {
    CoreError::NonNumericFrameToken {
        file: file_name_lossy(file),
        token: token.to_string(),
    }
}

fn stem_and_extension(path: &Path) -> CoreResult<(String, String)> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| CoreError::PathError(format!("No file name in {}", path.display())))?;
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((stem, extension))
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
