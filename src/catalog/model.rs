use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Key under which a folder's own tracks are serialized.
pub const MUSIC_KEY: &str = "music";

/// Top-level output container: root folder name to its node.
pub type FolderMap = BTreeMap<String, FolderNode>;

/// One scanned directory, holding the tracks found in it and its child directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderNode {
    pub music: BTreeMap<String, TrackMetadata>,
    pub children: FolderMap,
}

impl FolderNode {
    pub fn child(&self, name: &str) -> Option<&FolderNode> {
        self.children.get(name)
    }

    pub fn track(&self, file_name: &str) -> Option<&TrackMetadata> {
        self.music.get(file_name)
    }

    pub fn is_empty(&self) -> bool {
        self.music.is_empty() && self.children.is_empty()
    }

    /// Tracks in this node and every descendant.
    pub fn total_tracks(&self) -> usize {
        self.music.len()
            + self
                .children
                .values()
                .map(FolderNode::total_tracks)
                .sum::<usize>()
    }
}

// Folders serialize as `{"music": {...}, "<child>": {...}, ...}`. A child
// folder literally named `music` takes that key over from the track map.
impl Serialize for FolderNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shadowed = self.children.contains_key(MUSIC_KEY);
        let len = self.children.len() + usize::from(!shadowed);
        let mut map = serializer.serialize_map(Some(len))?;
        if !shadowed {
            map.serialize_entry(MUSIC_KEY, &self.music)?;
        }
        for (name, child) in &self.children {
            map.serialize_entry(name, child)?;
        }
        map.end()
    }
}

/// Formatted tags of a single audio file. Absent fields are left out of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "AlbumInfo::is_empty")]
    pub album: AlbumInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// `minutes:seconds`, e.g. `3:07`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// e.g. `320 kbps`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
    /// e.g. `44100 Hz`
    #[serde(rename = "samplerate", skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlbumInfo {
    #[serde(rename = "album", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<u32>,
}

impl AlbumInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.track.is_none()
    }
}
