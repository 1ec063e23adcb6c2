// src/cli.rs
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

use crate::config::consts::{DATA_DIR, MAX_ATTEMPTS, WORKERS};
use crate::config::options::ScrapeOptions;
use crate::core::HttpClient;
use crate::progress::{ConsoleProgress, Progress};
use crate::runner::{self, RunSummary};
use crate::store::JsonStore;

/// One incremental scrape of ufcstats.com: new events, their fights, and the fighter roster.
#[derive(Parser, Debug)]
#[command(name = "ufc_scrape", version, about)]
pub struct Args {
    /// Directory holding the JSON collections and debug.log
    #[arg(long, env = "UFC_SCRAPE_DATA_DIR", default_value = DATA_DIR)]
    pub data_dir: PathBuf,

    /// Concurrent requests per round (0 = one thread per item)
    #[arg(long, default_value_t = WORKERS)]
    pub workers: usize,

    /// Rounds per batch before giving up on busy or broken pages
    #[arg(long, default_value_t = MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Rebuild the fighter roster even when no new events were found
    #[arg(long)]
    pub force_fighters: bool,

    /// No progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn options(&self) -> ScrapeOptions {
        let mut opts = ScrapeOptions { data_dir: self.data_dir.clone(), workers: self.workers, ..Default::default() };
        opts.retry.max_attempts = self.max_attempts;
        opts
    }
}

pub fn run(args: Args) -> Result<()> {
    let opts = args.options();
    crate::log::init(&opts.data_dir, args.verbose);

    let client = HttpClient::new(&opts)?;
    let store = JsonStore::new(&opts.data_dir);

    let mut bar = ConsoleProgress::new();
    let progress: Option<&mut dyn Progress> = if args.quiet { None } else { Some(&mut bar) };

    let summary = runner::run(&client, &store, &opts, args.force_fighters, progress)?;
    for line in summary_lines(&summary) {
        println!("{line}");
    }
    Ok(())
}

/// One line per resource kind, plus a warning line when something was left behind.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let ev = &summary.events;
    let fi = &summary.fights;
    let mut lines = vec![
        format!("events:   {} stored, {} new ({} held back)", ev.total, ev.new_ids.len(), ev.held_back.len()),
        format!(
            "fights:   {} fetched, {} stored, {} resumed ({} skipped events, {} busy events, {} failed events, {} exhausted, {} failed)",
            fi.fetched,
            fi.stored,
            fi.resumed,
            fi.skipped.len(),
            fi.unlisted.len(),
            fi.list_failed.len(),
            fi.exhausted.len(),
            fi.failed.len()
        ),
    ];
    lines.push(match &summary.fighters {
        Some(f) => format!(
            "fighters: {} stored, {} carried over ({} exhausted, {} failed)",
            f.fighters,
            f.carried_over,
            f.exhausted.len(),
            f.failed.len()
        ),
        None => s!("fighters: unchanged"),
    });
    if !summary.is_complete() {
        lines.push(s!("warning: some pages never came back; see debug.log"));
    }
    lines
}
