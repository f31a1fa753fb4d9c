use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use imgusage::controls::{Command, OutputFormat};
use imgusage::report::{render_json, render_table};
use imgusage::{Cli, ImageUsage, ProjectSnapshot, UsageScanner};
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    rt.block_on(run(cli))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("imgusage=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let path = cli.project.project.clone();
    let controls = cli.project.build_controls();
    let snapshot = Arc::new(
        ProjectSnapshot::load(&path)
            .with_context(|| format!("failed to load project {:?}", path))?,
    );
    let mut scanner = UsageScanner::new(snapshot.clone(), &controls)
        .context("failed to build HTTP client")?;

    scanner.scan().await;

    match cli.command {
        Command::Scan => {
            print_records(scanner.state().records(), cli.project.format)?;
        }
        Command::Replace {
            selected,
            replacement,
            dry_run,
        } => {
            let state = scanner.state_mut();
            for url in &selected {
                state.set_selected(url, true);
            }
            state.set_replacement(replacement.as_str());
            if !state.can_replace() {
                bail!(
                    "nothing to replace: none of {} selected URLs appear in {:?}, or the replacement is empty",
                    selected.len(),
                    path
                );
            }

            let outcome = scanner
                .replace_selected()
                .await
                .context("replacement aborted; earlier updates stay applied in memory")?
                .context("replacement preconditions not met")?;
            eprintln!(
                "rewrote {} nodes and {} items ({} fields), skipped {}",
                outcome.nodes_updated,
                outcome.items_updated,
                outcome.fields_rewritten,
                outcome.updates_skipped
            );

            if dry_run {
                eprintln!("dry run enabled; leaving {:?} untouched", path);
            } else {
                snapshot
                    .save(&path)
                    .with_context(|| format!("failed to write project {:?}", path))?;
            }
            print_records(scanner.state().records(), cli.project.format)?;
        }
    }
    Ok(())
}

fn print_records(records: &[ImageUsage], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_table(records)),
        OutputFormat::Json => println!("{}", render_json(records)?),
    }
    Ok(())
}
