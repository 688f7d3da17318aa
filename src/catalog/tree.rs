use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::audio::metadata::TagSource;
use crate::catalog::model::{FolderMap, TrackMetadata};
use crate::utils::file_ops::{base_name, is_hidden, is_music_file, resolve_root};

/// Which files count as a folder's own tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackScope {
    /// Only files directly inside the folder.
    #[default]
    DirectChildren,
    /// Every file reachable below the folder, so nested tracks repeat at each ancestor level.
    Subtree,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub folders: usize,
    pub tracks: usize,
    pub failures: usize,
}

/// Sorts root paths byte-wise, the order in which they are processed.
pub fn sort_roots(roots: &mut [PathBuf]) {
    roots.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}

pub struct TreeBuilder<S> {
    source: S,
    scope: TrackScope,
    follow_links: bool,
}

impl<S: TagSource> TreeBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            scope: TrackScope::default(),
            follow_links: false,
        }
    }

    pub fn with_scope(mut self, scope: TrackScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Scans each root in the given order and adds one node per root to `output`.
    ///
    /// Failures are logged and counted, never propagated: an inaccessible
    /// path is left out of the tree, an unreadable file is left out of its
    /// folder's tracks, and a folder whose listing fails keeps its tracks but
    /// gets no children.
    ///
    /// A root naming the working directory, by `.` or by its resolved path,
    /// is scanned even when the directory's own name starts with `.`.
    pub fn build_tree(&self, output: &mut FolderMap, roots: &[PathBuf]) -> ScanStats {
        let mut stats = ScanStats::default();
        let cwd = std::env::current_dir().ok();
        for root in roots {
            let root = match resolve_root(root.clone()) {
                Ok(root) => root,
                Err(e) => {
                    warn!("Error resolving folder {}: {}", root.display(), e);
                    stats.failures += 1;
                    continue;
                }
            };
            let is_cwd = cwd.as_deref() == Some(root.as_path());
            self.process_folder(output, &root, is_cwd, &mut stats);
        }
        stats
    }

    fn process_folder(&self, parent: &mut FolderMap, folder: &Path, show_hidden: bool, stats: &mut ScanStats) {
        let info = match fs::metadata(folder) {
            Ok(info) => info,
            Err(e) => {
                warn!("Error accessing folder {}: {}", folder.display(), e);
                stats.failures += 1;
                return;
            }
        };

        let name = base_name(folder);
        if !info.is_dir() || (is_hidden(&name) && !show_hidden) {
            debug!("Skipping {}", folder.display());
            return;
        }

        let music = self.collect_tracks(folder, stats);
        stats.tracks += music.len();
        stats.folders += 1;

        let node = parent.entry(name).or_default();
        node.music.extend(music);

        for subfolder in self.list_subfolders(folder, stats) {
            self.process_folder(&mut node.children, &subfolder, false, stats);
        }
    }

    fn collect_tracks(&self, dir: &Path, stats: &mut ScanStats) -> BTreeMap<String, TrackMetadata> {
        let mut walker = WalkDir::new(dir).follow_links(self.follow_links);
        if self.scope == TrackScope::DirectChildren {
            walker = walker.max_depth(1);
        }

        let mut music = BTreeMap::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error walking folder {}: {}", dir.display(), e);
                    stats.failures += 1;
                    continue;
                }
            };

            let file_name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().is_dir() || is_hidden(&file_name) || !is_music_file(entry.path()) {
                continue;
            }

            match self.source.track_metadata(entry.path()) {
                Ok(track) => {
                    debug!("Read tags from {}", entry.path().display());
                    music.insert(file_name, track);
                }
                Err(e) => {
                    warn!("Error reading tag from file {}: {}", entry.path().display(), e);
                    stats.failures += 1;
                }
            }
        }
        music
    }

    fn list_subfolders(&self, dir: &Path, stats: &mut ScanStats) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error reading subfolders of folder {}: {}", dir.display(), e);
                stats.failures += 1;
                return Vec::new();
            }
        };

        let mut subfolders: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error reading entry in folder {}: {}", dir.display(), e);
                    stats.failures += 1;
                    None
                }
            })
            .filter(|entry| {
                let is_dir = if self.follow_links {
                    entry.path().is_dir()
                } else {
                    entry.file_type().map(|t| t.is_dir()).unwrap_or(false)
                };
                is_dir && !is_hidden(&entry.file_name().to_string_lossy())
            })
            .map(|entry| entry.path())
            .collect();

        sort_roots(&mut subfolders);
        subfolders
    }
}
