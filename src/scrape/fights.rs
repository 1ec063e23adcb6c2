// src/scrape/fights.rs
use tracing::{info, warn};

use crate::config::options::ScrapeOptions;
use crate::core::DocumentClient;
use crate::error::Result;
use crate::model::{FightJob, FightRecord};
use crate::progress::Progress;
use crate::reconcile;
use crate::specs::{fetch_one, fights::{EventFightList, FightDetails}};
use crate::store::{JsonStore, ResourceKind};

use super::engine::fetch_all;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FightsReport {
    /// Event ids handed in.
    pub events: usize,
    /// Event ids whose fights were already stored; not fetched again.
    pub skipped: Vec<String>,
    /// Event ids whose fight list was still busy at the end. The runner keeps
    /// them out of the stored events so the next run sees them as new again.
    pub unlisted: Vec<String>,
    /// Event pages that failed for good.
    pub list_failed: Vec<(String, String)>,
    /// Leftover fights from earlier runs queued again.
    pub resumed: usize,
    /// Fight records added or refreshed this run.
    pub fetched: usize,
    /// Still busy at the end; kept in the pending store for the next run.
    pub exhausted: Vec<FightJob>,
    pub failed: Vec<(FightJob, String)>,
    /// Fight records in the store after the merge.
    pub stored: usize,
}

/// Fetch every fight of `event_ids` and merge them into the stored fights.
///
/// Only ids reported new by the events pipeline belong here; ids already
/// referenced by a stored fight are skipped rather than fetched twice.
/// Fights left busy by an earlier run are fetched again first, and the ones
/// still busy now replace them in the pending store.
pub fn load_fights(
    client: &dyn DocumentClient,
    store: &JsonStore,
    event_ids: &[String],
    opts: &ScrapeOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<FightsReport> {
    let stored: Vec<FightRecord> = store.load(ResourceKind::Fights)?;
    let pending: Vec<FightJob> = store.load(ResourceKind::PendingFights)?;
    let (todo, skipped) = reconcile::unprocessed_events(event_ids, &stored);
    for id in &skipped {
        warn!(event = %id, "fights for event already stored; skipping");
    }

    let mut report = FightsReport { events: event_ids.len(), skipped, ..Default::default() };
    if todo.is_empty() && pending.is_empty() {
        report.stored = stored.len();
        return Ok(report);
    }

    // Phase 1: fight ids per event
    let lists = fetch_all(
        "event fight lists",
        todo,
        opts.workers,
        &opts.retry,
        |id| fetch_one(client, &EventFightList, id),
        None,
    );
    report.unlisted = lists.exhausted.into_iter().map(|(id, _)| id).collect();
    report.list_failed = lists.failed;
    for id in &report.unlisted {
        warn!(event = %id, "event still busy; held back for the next run");
    }
    for (id, msg) in &report.list_failed {
        warn!(event = %id, error = %msg, "could not list fights for event");
    }

    let listed: Vec<FightJob> = lists
        .records
        .into_iter()
        .flat_map(|ev| {
            let event_id = ev.event_id;
            ev.fight_ids
                .into_iter()
                .map(move |fight_id| FightJob { fight_id, event_id: event_id.clone() })
        })
        .collect();
    let pending = reconcile::queue_fights(pending, Vec::new(), &stored);
    report.resumed = pending.len();
    let jobs = reconcile::queue_fights(pending, listed, &stored);
    info!(events = report.events, resumed = report.resumed, fights = jobs.len(), "fetching fight details");

    // Phase 2: one record per fight
    let fights = fetch_all(
        "fights",
        jobs,
        opts.workers,
        &opts.retry,
        |job| fetch_one(client, &FightDetails, job),
        progress,
    );

    report.fetched = fights.records.len();
    report.exhausted = fights.exhausted.into_iter().map(|(job, _)| job).collect();
    report.failed = fights.failed;

    let merged = reconcile::merge_fights(fights.records, stored);
    report.stored = merged.len();
    let path = store.save(ResourceKind::Fights, &merged)?;
    // After the fights, so a failed write never drops a pending job.
    store.save(ResourceKind::PendingFights, &report.exhausted)?;
    info!(fetched = report.fetched, stored = report.stored, path = %path.display(), "fights stored");

    Ok(report)
}
