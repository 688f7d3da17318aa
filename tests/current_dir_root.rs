//! Roots naming the working directory. These tests change the process cwd,
//! so they live in their own binary and take a lock.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use music_catalog::utils::file_ops::resolve_root;
use music_catalog::{FolderMap, RawTags, Result, ScanStats, TagSource, TreeBuilder};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

static CWD_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn cwd_lock() -> MutexGuard<'static, ()> {
    CWD_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct CwdGuard {
    old: PathBuf,
}

impl CwdGuard {
    fn enter(dir: &Path) -> Self {
        let old = env::current_dir().unwrap();
        env::set_current_dir(dir).unwrap();
        Self { old }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.old);
    }
}

struct TitleFromName;

impl TagSource for TitleFromName {
    fn read_tags(&self, path: &Path) -> Result<RawTags> {
        Ok(RawTags {
            title: path.file_stem().map(|s| s.to_string_lossy().into_owned()),
            ..RawTags::default()
        })
    }
}

fn scan(roots: &[PathBuf]) -> (FolderMap, ScanStats) {
    let mut output = FolderMap::new();
    let stats = TreeBuilder::new(TitleFromName).build_tree(&mut output, roots);
    (output, stats)
}

fn make_library(parent: &Path, name: &str) -> PathBuf {
    let library = parent.join(name);
    fs::create_dir_all(library.join("Disc1")).unwrap();
    fs::write(library.join("a.mp3"), b"x").unwrap();
    fs::write(library.join("Disc1/b.mp3"), b"x").unwrap();
    library
}

fn assert_library(output: &FolderMap, stats: ScanStats, name: &str) {
    assert_eq!(output.keys().collect::<Vec<_>>(), vec![name]);
    let node = &output[name];
    assert!(node.track("a.mp3").is_some());
    assert!(node.child("Disc1").unwrap().track("b.mp3").is_some());
    assert_eq!(stats, ScanStats { folders: 2, tracks: 2, failures: 0 });
}

#[test]
fn every_spelling_of_the_current_dir_is_scanned() {
    let _lock = cwd_lock();
    let dir = tempdir().unwrap();
    let library = make_library(dir.path(), "Library");
    let _cwd = CwdGuard::enter(&library);

    for spelling in [".", "./", "./."] {
        let (output, stats) = scan(&[PathBuf::from(spelling)]);
        assert_library(&output, stats, "Library");

        let resolved = resolve_root(spelling).unwrap();
        let (output, stats) = scan(&[resolved]);
        assert_library(&output, stats, "Library");
    }
}

#[test]
fn hidden_named_current_dir_is_still_scanned() {
    let _lock = cwd_lock();
    let dir = tempdir().unwrap();
    let library = make_library(dir.path(), ".library");
    let other = make_library(dir.path(), ".other");
    let _cwd = CwdGuard::enter(&library);

    let (output, stats) = scan(&[PathBuf::from(".")]);
    assert_library(&output, stats, ".library");

    let (output, stats) = scan(&[resolve_root("./").unwrap()]);
    assert_library(&output, stats, ".library");

    // Only the working directory is exempt.
    let (output, stats) = scan(&[other]);
    assert!(output.is_empty());
    assert_eq!(stats, ScanStats::default());
}
