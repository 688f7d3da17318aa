use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::{CatalogError, Result};

/// Extensions (lowercase, no dot) treated as audio files.
pub const MUSIC_EXTENSIONS: [&str; 8] = ["mp3", "flac", "ogg", "wav", "m4a", "wma", "aac", "aiff"];

/// Last path component as a string. Paths without one (`.`, `..`, `/`) fall back to the whole path.
pub fn base_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// A name starting with `.`, except `.` itself.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "."
}

pub fn is_music_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            MUSIC_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// `.`, `./`, `./.` and other spellings made only of `.` components.
pub fn is_current_dir(path: &Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some() && components.all(|c| c == Component::CurDir)
}

/// Resolves a root argument naming the current directory to the working directory itself.
pub fn resolve_root(path: impl Into<PathBuf>) -> Result<PathBuf> {
    let path = path.into();
    if is_current_dir(&path) {
        return std::env::current_dir().map_err(|e| CatalogError::io(&path, e));
    }
    Ok(path)
}

pub fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn music_extensions_match_case_insensitive() {
        assert!(is_music_file(Path::new("/tmp/a.mp3")));
        assert!(is_music_file(Path::new("/tmp/a.MP3")));
        assert!(is_music_file(Path::new("a.Flac")));
        assert!(is_music_file(Path::new("a.aiff")));
        assert!(is_music_file(Path::new("a.wma")));
        assert!(!is_music_file(Path::new("a.txt")));
        assert!(!is_music_file(Path::new("mp3")));
        assert!(!is_music_file(Path::new("a.mp3.bak")));
    }

    #[test]
    fn dot_is_not_hidden() {
        assert!(!is_hidden("."));
        assert!(is_hidden(".."));
        assert!(is_hidden(".DS_Store"));
        assert!(is_hidden(".git"));
        assert!(!is_hidden("Music"));
        assert!(!is_hidden("a.mp3"));
    }

    #[test]
    fn base_name_falls_back_to_whole_path() {
        assert_eq!(base_name(Path::new("/srv/Music")), "Music");
        assert_eq!(base_name(Path::new("Music/Disc1/")), "Disc1");
        assert_eq!(base_name(Path::new(".")), ".");
        assert_eq!(base_name(Path::new("..")), "..");
    }

    #[test]
    fn current_dir_spellings() {
        assert!(is_current_dir(Path::new(".")));
        assert!(is_current_dir(Path::new("./")));
        assert!(is_current_dir(Path::new("./.")));
        assert!(is_current_dir(Path::new(".//./")));
        assert!(!is_current_dir(Path::new("")));
        assert!(!is_current_dir(Path::new("..")));
        assert!(!is_current_dir(Path::new("./Music")));
        assert!(!is_current_dir(Path::new("/")));
    }

    #[test]
    fn resolve_root_expands_current_dir_spellings() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_root(".").unwrap(), cwd);
        assert_eq!(resolve_root("./").unwrap(), cwd);
        assert_eq!(resolve_root("./.").unwrap(), cwd);
        assert_eq!(resolve_root("./Music").unwrap(), PathBuf::from("./Music"));
        assert_eq!(resolve_root("/a/b").unwrap(), PathBuf::from("/a/b"));
    }

    #[test]
    fn ensure_parent_dir_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/deeper/music.json");
        ensure_parent_dir(&out).unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
        ensure_parent_dir("music.json").unwrap();
    }
}
