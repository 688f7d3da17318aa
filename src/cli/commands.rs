use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::catalog::tree::TrackScope;

#[derive(Parser, Debug)]
#[command(name = "music-catalog")]
#[command(version)]
#[command(about = "Builds a nested catalog of the music files under one or more folders", long_about = None)]
pub struct Cli {
    /// Root folders to scan (`.` is the current directory)
    #[arg(required = true)]
    pub folders: Vec<PathBuf>,

    /// Output file path
    #[arg(short = 'o', long = "output", default_value = "music.json")]
    pub output: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Also list tracks of nested folders under every ancestor folder
    #[arg(long)]
    pub nested_tracks: bool,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub follow_links: bool,

    /// Write JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl Cli {
    pub fn track_scope(&self) -> TrackScope {
        if self.nested_tracks {
            TrackScope::Subtree
        } else {
            TrackScope::DirectChildren
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["music-catalog", "B", "A"]).unwrap();
        assert_eq!(cli.folders, vec![PathBuf::from("B"), PathBuf::from("A")]);
        assert_eq!(cli.output, PathBuf::from("music.json"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.track_scope(), TrackScope::DirectChildren);
        assert!(!cli.compact);
    }

    #[test]
    fn output_and_options() {
        let cli = Cli::try_parse_from([
            "music-catalog",
            ".",
            "-o",
            "out/lib.csv",
            "--format",
            "csv",
            "--nested-tracks",
            "--follow-links",
        ])
        .unwrap();
        assert_eq!(cli.folders, vec![PathBuf::from(".")]);
        assert_eq!(cli.output, PathBuf::from("out/lib.csv"));
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.track_scope(), TrackScope::Subtree);
        assert!(cli.follow_links);
    }

    #[test]
    fn folders_are_required() {
        assert!(Cli::try_parse_from(["music-catalog", "-o", "x.json"]).is_err());
    }
}
