use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use music_catalog::{
    cli::commands::{Cli, OutputFormat},
    sort_roots,
    utils::{file_ops::resolve_root, reporting::Reporter},
    FolderMap, MetadataExtractor, Result, TreeBuilder,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut roots = cli
        .folders
        .iter()
        .map(|folder| resolve_root(folder.clone()))
        .collect::<Result<Vec<_>>>()?;
    sort_roots(&mut roots);

    for root in &roots {
        info!("Scanning folder: {}", root.display());
    }

    let builder = TreeBuilder::new(MetadataExtractor::new())
        .with_scope(cli.track_scope())
        .with_follow_links(cli.follow_links);

    let mut output = FolderMap::new();
    let stats = builder.build_tree(&mut output, &roots);
    info!(
        "Scanned {} folders, {} tracks, {} errors",
        stats.folders, stats.tracks, stats.failures
    );

    let reporter = Reporter::new().compact(cli.compact);
    match cli.format {
        OutputFormat::Json => reporter.generate_json_report(&output, &cli.output),
        OutputFormat::Csv => reporter.generate_csv_report(&output, &cli.output),
    }
}
