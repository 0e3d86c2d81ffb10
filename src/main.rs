use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use chronoscan::cli::Cli;
use chronoscan::config::ChronoscanConfig;
use chronoscan::core::{Timeline, TimelineStats};
use chronoscan::export::TimelineExporter;
use chronoscan::render::{self, RenderOptions};
use chronoscan::scan::{DirectoryScanner, ScanOptions};
use chronoscan::shell::Shell;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = cli.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    cli.setup_logging();

    let config = ChronoscanConfig::from_env();
    if let Err(err) = config.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;

    match cli.directory {
        Some(_) => run_batch(&cli, &config, &cancel),
        None => run_shell(&cli, config, cancel),
    }
}

fn run_batch(cli: &Cli, config: &ChronoscanConfig, cancel: &AtomicBool) -> Result<()> {
    let directory = cli.directory.as_ref().expect("directory checked by caller");
    let spec = cli.filter_spec().map_err(anyhow::Error::msg)?;
    spec.validate()?;

    let options = ScanOptions {
        recursive: cli.recursive,
        progress_interval: config.scan.progress_interval,
    };
    let scanner = DirectoryScanner::new(directory, options)?;

    let mut timeline = Timeline::new();
    let report = scanner.scan(&mut timeline, cancel);

    let events = spec.apply(&timeline)?;
    let stats = TimelineStats::summarize(&events);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let render_options = RenderOptions {
        color: !cli.no_color,
        limit: cli.limit,
    };
    render::render_timeline(&mut out, &events, render_options)?;
    writeln!(out)?;
    render::render_stats(&mut out, &stats, render_options)?;

    if !report.warnings.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "Warning: {} files could not be read",
            report.warnings.len()
        )?;
        for warning in &report.warnings {
            tracing::debug!("unreadable: {}: {}", warning.path.display(), warning.message);
        }
    }

    if let Some(format) = cli.export {
        let format = format.into();
        let path = cli.export_output_path(format);
        TimelineExporter::new(format).export_to_path(&events, &stats, &path)?;
        writeln!(out, "Exported {} events to {}", events.len(), path.display())?;
    }

    Ok(())
}

fn run_shell(cli: &Cli, config: ChronoscanConfig, cancel: Arc<AtomicBool>) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(config, !cli.no_color, cancel);
    shell.run(stdin.lock(), &mut stdout.lock())?;
    Ok(())
}
