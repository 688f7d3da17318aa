use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::Writer;
use log::info;

use crate::catalog::model::{FolderMap, TrackMetadata};
use crate::utils::file_ops::ensure_parent_dir;
use crate::{CatalogError, Result};

pub struct Reporter {
    pretty: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.pretty = !compact;
        self
    }

    pub fn write_json_to<W: Write>(&self, tree: &FolderMap, writer: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, tree)?;
        } else {
            serde_json::to_writer(writer, tree)?;
        }
        Ok(())
    }

    pub fn generate_json_report(&self, tree: &FolderMap, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        ensure_parent_dir(output_path)?;
        let file = File::create(output_path).map_err(|e| CatalogError::io(output_path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_json_to(tree, &mut writer)?;
        writer.flush().map_err(|e| CatalogError::io(output_path, e))?;
        info!("Catalog written: {}", output_path.display());
        Ok(())
    }

    /// One row per track, with the `/`-joined folder path in the first column.
    pub fn write_csv_to<W: Write>(&self, tree: &FolderMap, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record([
            "Folder",
            "File",
            "Title",
            "Artist",
            "Album",
            "Track",
            "Genre",
            "Year",
            "Duration",
            "Bitrate",
            "Sample Rate",
        ])?;
        write_csv_rows(&mut writer, tree, "")?;
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn generate_csv_report(&self, tree: &FolderMap, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        ensure_parent_dir(output_path)?;
        let file = File::create(output_path).map_err(|e| CatalogError::io(output_path, e))?;
        self.write_csv_to(tree, file)?;
        info!("Track listing written: {}", output_path.display());
        Ok(())
    }
}

fn write_csv_rows<W: Write>(writer: &mut Writer<W>, folders: &FolderMap, prefix: &str) -> Result<()> {
    for (name, node) in folders {
        let folder = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };
        for (file_name, track) in &node.music {
            writer.write_record(track_record(&folder, file_name, track))?;
        }
        write_csv_rows(writer, &node.children, &folder)?;
    }
    Ok(())
}

fn track_record(folder: &str, file_name: &str, track: &TrackMetadata) -> [String; 11] {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let number = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
    [
        folder.to_string(),
        file_name.to_string(),
        text(&track.title),
        text(&track.artist),
        text(&track.album.name),
        number(track.album.track),
        text(&track.genre),
        number(track.year),
        text(&track.duration),
        text(&track.bitrate),
        text(&track.sample_rate),
    ]
}
