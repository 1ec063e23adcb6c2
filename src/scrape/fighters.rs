// src/scrape/fighters.rs
use std::collections::HashSet;

use tracing::{info, warn};

use crate::config::options::ScrapeOptions;
use crate::core::DocumentClient;
use crate::error::{Result, ScrapeError};
use crate::model::{FighterRecord, FighterStub};
use crate::progress::Progress;
use crate::reconcile;
use crate::specs::{fetch_one, fighters::{FighterIndex, FighterInfo}};
use crate::store::{JsonStore, ResourceKind};

use super::engine::fetch_all;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FightersReport {
    /// Fighters in the rebuilt roster.
    pub fighters: usize,
    /// Listed fighters whose detail page never came back.
    pub exhausted: Vec<FighterStub>,
    pub failed: Vec<(FighterStub, String)>,
    /// Exhausted fighters kept in the roster with their previously stored record.
    pub carried_over: usize,
}

/// Rebuild the fighter roster: every letter page, then every fighter's detail page.
///
/// A letter page that cannot be fetched would silently shrink the roster, so it
/// aborts the rebuild and the stored roster stays as it was. A fighter whose
/// detail page stays busy keeps the record from the previous roster, if any.
pub fn load_fighters(
    client: &dyn DocumentClient,
    store: &JsonStore,
    opts: &ScrapeOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<FightersReport> {
    let previous: Vec<FighterRecord> = store.load(ResourceKind::Fighters)?;

    let index = fetch_all(
        "fighter index",
        ('a'..='z').collect::<Vec<char>>(),
        opts.workers,
        &opts.retry,
        |letter| fetch_one(client, &FighterIndex, letter),
        None,
    );
    if !index.is_complete() {
        let letters: String = index
            .exhausted
            .iter()
            .map(|(c, _)| *c)
            .chain(index.failed.iter().map(|(c, _)| *c))
            .collect();
        return Err(ScrapeError::IndexUnavailable {
            kind: ResourceKind::Fighters,
            reason: format!("letter pages [{letters}] unavailable"),
        });
    }

    let stubs = reconcile::unique_stubs(index.records.into_iter().flatten().collect());
    let total = stubs.len();
    info!(fighters = total, "fetching fighter details");

    // Batches only pace the progress bar; each is a full engine run of its own.
    let mut records = Vec::with_capacity(total);
    let mut report = FightersReport::default();
    if let Some(p) = progress.as_deref_mut() {
        p.begin("fighters", total);
    }
    let mut done = 0;
    for batch in stubs.chunks(opts.fighter_batch.max(1)) {
        let out = fetch_all(
            "fighter details",
            batch.to_vec(),
            opts.workers,
            &opts.retry,
            |stub| fetch_one(client, &FighterInfo, stub),
            None,
        );
        records.extend(out.records);
        report.exhausted.extend(out.exhausted.into_iter().map(|(stub, _)| stub));
        report.failed.extend(out.failed);

        done += batch.len();
        if let Some(p) = progress.as_deref_mut() {
            p.advance(done, total);
        }
    }
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    let busy: HashSet<&str> = report.exhausted.iter().map(|s| s.fighter_id.as_str()).collect();
    let carried: Vec<FighterRecord> = previous
        .into_iter()
        .filter(|f| busy.contains(f.fighter_id.as_str()))
        .collect();
    let (roster, carried_over) = reconcile::rebuild_fighters(&stubs, records, carried);
    report.fighters = roster.len();
    report.carried_over = carried_over;
    if report.exhausted.len() > carried_over {
        warn!(
            left_out = report.exhausted.len() - carried_over,
            "fighters without a stored record left out of roster"
        );
    }
    for stub in &report.exhausted {
        warn!(id = %stub.fighter_id, name = %stub.fighter_name, "fighter details unavailable");
    }

    let path = store.save(ResourceKind::Fighters, &roster)?;
    info!(fighters = report.fighters, path = %path.display(), "fighters stored");

    Ok(report)
}
