//! Audio Tag Extraction and Metadata Processing
//!
//! This module decodes an in-memory audio buffer into [`SongMetadata`] using
//! the `lofty` crate. It never touches the network or the disk; the host hands
//! over the dropped file's bytes and declared name.
//!
//! ## Overview
//!
//! - One [`TagDecoder`] per [`AudioFormat`], replaceable per format
//! - Extracts title, artist, album, numbering, genre and audio properties
//! - Normalizes text (collapse whitespace, drop control characters)
//! - Text that normalizes to nothing is reported as unknown (`None`)
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::extractor::{AudioFile, MetadataExtractor};
//!
//! let extractor = MetadataExtractor::new();
//! let file = AudioFile::new("song.flac", bytes);
//! let metadata = extractor.extract(&file)?;
//!
//! println!("Artist: {}", metadata.artist.unwrap_or_default());
//! ```

use bytes::Bytes;
use lofty::config::ParseOptions;
use lofty::file::{AudioFile as _, TaggedFile, TaggedFileExt};
use lofty::flac::FlacFile;
use lofty::iff::wav::WavFile;
use lofty::mpeg::MpegFile;
use lofty::tag::{Accessor, ItemKey, Tag};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{MetadataError, Result};
use crate::file_gate::AudioFormat;

/// A dropped or selected audio file, held in memory for one invocation
#[derive(Clone)]
pub struct AudioFile {
    /// Name the host reported for the file
    pub filename: String,
    /// Raw file contents
    pub bytes: Bytes,
}

impl AudioFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Format declared by the filename suffix
    pub fn format(&self) -> Option<AudioFormat> {
        AudioFormat::from_filename(&self.filename)
    }
}

impl fmt::Debug for AudioFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioFile")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Tag metadata decoded from an audio file
///
/// Every field is optional: `None` means the file did not carry the value.
/// Serialized with camelCase keys, omitting unknown fields; this is the JSON
/// payload each provider receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Album artist (for compilations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disc_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disc_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Bitrate in kbps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    /// Sample rate in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    /// Container format, filled in by [`MetadataExtractor`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<AudioFormat>,
}

impl SongMetadata {
    /// Serialize into the JSON payload embedded in provider requests
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// True when no tag text was found at all
    pub fn has_no_tags(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.album_artist.is_none()
            && self.genre.is_none()
            && self.composer.is_none()
            && self.comment.is_none()
    }
}

/// Format-specific decoder turning a raw buffer into [`SongMetadata`]
///
/// Implementations must be pure: no network, no disk.
pub trait TagDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<SongMetadata>;
}

/// [`TagDecoder`] backed by `lofty`, pinned to a single container format
///
/// The format is forced instead of sniffed so a buffer that does not match
/// its declared suffix fails as a decode error.
pub struct LoftyDecoder {
    format: AudioFormat,
    parse_options: ParseOptions,
}

impl LoftyDecoder {
    pub fn new(format: AudioFormat) -> Self {
        Self::with_options(format, ParseOptions::new())
    }

    /// Create decoder with custom parse options
    pub fn with_options(format: AudioFormat, parse_options: ParseOptions) -> Self {
        Self {
            format,
            parse_options,
        }
    }

    /// Read the buffer as the declared container, never sniffing another one
    fn read_tagged(&self, bytes: &[u8]) -> lofty::error::Result<TaggedFile> {
        let mut reader = Cursor::new(bytes);
        let options = self.parse_options;
        Ok(match self.format {
            AudioFormat::Mp3 => MpegFile::read_from(&mut reader, options)?.into(),
            AudioFormat::Wav => WavFile::read_from(&mut reader, options)?.into(),
            AudioFormat::Flac => FlacFile::read_from(&mut reader, options)?.into(),
        })
    }

    fn read_tag(metadata: &mut SongMetadata, tag: &Tag) {
        metadata.title = tag.title().and_then(|s| normalize_text(&s));
        metadata.artist = tag.artist().and_then(|s| normalize_text(&s));
        metadata.album = tag.album().and_then(|s| normalize_text(&s));
        metadata.album_artist = tag
            .get_string(&ItemKey::AlbumArtist)
            .and_then(normalize_text);
        metadata.year = tag.year().filter(|y| *y > 0);
        metadata.track_number = tag.track();
        metadata.track_total = tag.track_total();
        metadata.disc_number = tag.disk();
        metadata.disc_total = tag.disk_total();
        metadata.genre = tag.genre().and_then(|s| normalize_text(&s));
        metadata.composer = tag.get_string(&ItemKey::Composer).and_then(normalize_text);
        metadata.comment = tag.comment().and_then(|s| normalize_text(&s));
    }
}

impl TagDecoder for LoftyDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SongMetadata> {
        let tagged_file = self.read_tagged(bytes).map_err(|e| MetadataError::Decode {
            format: self.format.to_string(),
            message: e.to_string(),
        })?;

        let properties = tagged_file.properties();
        let duration = properties.duration();

        let mut metadata = SongMetadata {
            duration_ms: (!duration.is_zero()).then_some(duration.as_millis() as u64),
            bitrate: properties.audio_bitrate().filter(|b| *b > 0),
            sample_rate: properties.sample_rate().filter(|r| *r > 0),
            channels: properties.channels().filter(|c| *c > 0),
            ..SongMetadata::default()
        };

        // Primary tag first, then whatever else the container carries
        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());
        match tag {
            Some(tag) => Self::read_tag(&mut metadata, tag),
            None => debug!(format = %self.format, "No tags present in buffer"),
        }

        Ok(metadata)
    }
}

/// Collapse whitespace and drop control characters
///
/// Returns `None` when nothing printable is left, so empty tags stay unknown.
pub fn normalize_text(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let normalized = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    (!normalized.is_empty()).then_some(normalized)
}

/// Audio metadata extractor
///
/// Routes each [`AudioFile`] to the decoder registered for its declared
/// format. Defaults to [`LoftyDecoder`] for every format in
/// [`AudioFormat::ALL`].
pub struct MetadataExtractor {
    decoders: HashMap<AudioFormat, Arc<dyn TagDecoder>>,
}

impl MetadataExtractor {
    /// Create a new metadata extractor with lofty decoders
    pub fn new() -> Self {
        let decoders = AudioFormat::ALL
            .into_iter()
            .map(|format| {
                let decoder: Arc<dyn TagDecoder> = Arc::new(LoftyDecoder::new(format));
                (format, decoder)
            })
            .collect();

        Self { decoders }
    }

    /// Replace the decoder used for `format`
    pub fn with_decoder(mut self, format: AudioFormat, decoder: Arc<dyn TagDecoder>) -> Self {
        self.decoders.insert(format, decoder);
        self
    }

    /// Extract metadata from an in-memory audio file
    ///
    /// # Errors
    ///
    /// - [`MetadataError::UnsupportedFormat`] if the filename suffix is not an
    ///   accepted format
    /// - [`MetadataError::Decode`] if the buffer is not a well-formed instance
    ///   of its declared format; no partial metadata is returned
    pub fn extract(&self, file: &AudioFile) -> Result<SongMetadata> {
        let format = file
            .format()
            .ok_or_else(|| MetadataError::UnsupportedFormat(file.filename.clone()))?;

        let decoder = self.decoders.get(&format).ok_or_else(|| {
            MetadataError::UnsupportedFormat(format!("no decoder registered for {}", format))
        })?;

        debug!(%format, len = file.bytes.len(), "Decoding audio buffer");

        let mut metadata = decoder.decode(&file.bytes).map_err(|e| {
            warn!(%format, error = %e, "Audio buffer could not be decoded");
            e
        })?;
        metadata.format = Some(format);

        Ok(metadata)
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MetadataExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<_> = self.decoders.keys().map(|f| f.extension()).collect();
        formats.sort_unstable();
        f.debug_struct("MetadataExtractor")
            .field("formats", &formats)
            .finish()
    }
}
