use std::path::Path;

use regex::Regex;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, StandardTagKey, Tag};
use symphonia::core::probe::Hint;

use crate::catalog::model::{AlbumInfo, TrackMetadata};
use crate::{CatalogError, Result};

/// Decoded, unformatted fields of one audio file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<u32>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub duration_secs: Option<f64>,
    /// Bits per second
    pub bitrate: Option<u32>,
    pub sample_rate: Option<u32>,
}

/// Reads tags from an audio file on disk.
pub trait TagSource {
    fn read_tags(&self, path: &Path) -> Result<RawTags>;

    fn track_metadata(&self, path: &Path) -> Result<TrackMetadata> {
        self.read_tags(path).map(TrackMetadata::from)
    }
}

impl<T: TagSource + ?Sized> TagSource for &T {
    fn read_tags(&self, path: &Path) -> Result<RawTags> {
        (**self).read_tags(path)
    }
}

/// [`TagSource`] backed by symphonia's probe.
pub struct MetadataExtractor {
    leading_number: Regex,
    year: Regex,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self {
            leading_number: Regex::new(r"^\s*(\d+)").expect("valid track regex"),
            year: Regex::new(r"\b(\d{4})\b").expect("valid year regex"),
        }
    }

    pub fn extract_metadata(&self, path: impl AsRef<Path>) -> Result<RawTags> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| CatalogError::io(path, e))?;
        let size_bytes = file.metadata().map_err(|e| CatalogError::io(path, e))?.len();

        // The stream owns the file; it is closed when `probed` drops.
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let mut probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| CatalogError::Metadata {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut tags = RawTags::default();

        if let Some(track) = probed.format.default_track() {
            let params = &track.codec_params;
            tags.sample_rate = params.sample_rate;

            if let Some(n_frames) = params.n_frames {
                if let Some(time_base) = params.time_base {
                    let time = time_base.calc_time(n_frames);
                    tags.duration_secs = Some(time.seconds as f64 + time.frac);
                } else if let Some(rate) = params.sample_rate.filter(|r| *r > 0) {
                    tags.duration_secs = Some(n_frames as f64 / rate as f64);
                }
            }

            // Average bitrate from file size and duration
            if let Some(duration) = tags.duration_secs.filter(|d| *d > 0.0) {
                tags.bitrate = Some(((size_bytes * 8) as f64 / duration) as u32);
            }
        }

        // Tags found ahead of the container (e.g. ID3v2), then the container's own.
        if let Some(metadata) = probed.metadata.get() {
            if let Some(revision) = metadata.current() {
                self.apply_tags(revision.tags(), &mut tags);
            }
        }
        if let Some(revision) = probed.format.metadata().current() {
            self.apply_tags(revision.tags(), &mut tags);
        }

        Ok(tags)
    }

    fn apply_tags(&self, source: &[Tag], tags: &mut RawTags) {
        for tag in source {
            let value = tag.value.to_string();
            match tag.std_key {
                Some(StandardTagKey::TrackTitle) => tags.title = non_empty(value),
                Some(StandardTagKey::Artist) => tags.artist = non_empty(value),
                Some(StandardTagKey::Album) => tags.album = non_empty(value),
                Some(StandardTagKey::Genre) => tags.genre = non_empty(value),
                Some(StandardTagKey::TrackNumber) => {
                    tags.track = self.parse_leading_number(&value);
                }
                Some(StandardTagKey::Date) | Some(StandardTagKey::OriginalDate) => {
                    if tags.year.is_none() {
                        tags.year = self.parse_year(&value);
                    }
                }
                _ => {}
            }
        }
    }

    /// `"3/12"` -> 3
    fn parse_leading_number(&self, value: &str) -> Option<u32> {
        self.leading_number
            .captures(value)
            .and_then(|c| c[1].parse().ok())
    }

    /// `"1999-04-01"` -> 1999
    fn parse_year(&self, value: &str) -> Option<u32> {
        self.year.captures(value).and_then(|c| c[1].parse().ok())
    }
}

impl TagSource for MetadataExtractor {
    fn read_tags(&self, path: &Path) -> Result<RawTags> {
        self.extract_metadata(path)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `187.4` -> `"3:07"`
pub fn format_duration(seconds: f64) -> String {
    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

impl From<RawTags> for TrackMetadata {
    fn from(raw: RawTags) -> Self {
        TrackMetadata {
            title: raw.title.and_then(non_empty),
            artist: raw.artist.and_then(non_empty),
            album: AlbumInfo {
                name: raw.album.and_then(non_empty),
                track: raw.track.filter(|t| *t > 0),
            },
            genre: raw.genre.and_then(non_empty),
            year: raw.year.filter(|y| *y > 0),
            duration: raw
                .duration_secs
                .filter(|d| *d >= 1.0)
                .map(format_duration),
            bitrate: raw
                .bitrate
                .map(|bps| bps / 1000)
                .filter(|kbps| *kbps > 0)
                .map(|kbps| format!("{} kbps", kbps)),
            sample_rate: raw
                .sample_rate
                .filter(|hz| *hz > 0)
                .map(|hz| format!("{} Hz", hz)),
        }
    }
}
