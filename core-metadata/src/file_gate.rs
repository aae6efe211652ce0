//! Audio File Eligibility
//!
//! Decides from a dropped file's name whether it is worth extracting. Only the
//! lowercase suffix after the final `.` is inspected; the buffer is never
//! touched here.

use serde::Serialize;
use std::fmt;

/// Audio container formats the enrichment pipeline accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Flac,
}

impl AudioFormat {
    /// Every accepted format, in allow-list order
    pub const ALL: [AudioFormat; 3] = [AudioFormat::Mp3, AudioFormat::Wav, AudioFormat::Flac];

    /// Canonical lowercase extension
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
        }
    }

    /// Match an extension, ignoring ASCII case
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Resolve the format declared by a filename's suffix
    pub fn from_filename(filename: &str) -> Option<Self> {
        file_extension(filename).and_then(|ext| Self::from_extension(&ext))
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Lowercase suffix after the final `.`, if there is one
///
/// A trailing dot yields `None`, as does a name without any dot.
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, suffix) = filename.rsplit_once('.')?;
    if suffix.is_empty() {
        return None;
    }
    Some(suffix.to_lowercase())
}

/// Returns true iff `filename` carries an `mp3`, `wav` or `flac` suffix.
///
/// Never fails; names without a suffix are simply not eligible.
pub fn is_eligible(filename: &str) -> bool {
    AudioFormat::from_filename(filename).is_some()
}
