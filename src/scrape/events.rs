// src/scrape/events.rs
use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::config::{consts::EVENTS_URL, options::ScrapeOptions};
use crate::core::DocumentClient;
use crate::error::{Result, ScrapeError};
use crate::model::EventRecord;
use crate::reconcile;
use crate::specs::{events::EventList, fetch_one};
use crate::store::{JsonStore, ResourceKind};

use super::engine::fetch_all;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventsReport {
    /// Events now in the store.
    pub total: usize,
    /// Ids absent from the previous run, sorted.
    pub new_ids: Vec<String>,
    /// New ids kept out of the store so the next run sees them as new again.
    pub held_back: Vec<String>,
}

/// A scraped listing and its new ids, not yet written to the store.
#[derive(Clone, Debug)]
pub struct EventsScrape {
    pub scraped: Vec<EventRecord>,
    pub new_ids: Vec<String>,
}

/// Scrape the completed-events listing as of `now`.
///
/// The listing is a single page, so failing to get it leaves nothing to report
/// partially: the run stops with [`ScrapeError::IndexUnavailable`] and the store
/// is left untouched.
pub fn collect_events(
    client: &dyn DocumentClient,
    opts: &ScrapeOptions,
    now: NaiveDateTime,
) -> Result<Vec<EventRecord>> {
    let ext = EventList { now };
    let mut report = fetch_all(
        "events",
        vec![s!(EVENTS_URL)],
        1,
        &opts.retry,
        |url| fetch_one(client, &ext, url),
        None,
    );

    if let Some((_, reason)) = report.exhausted.pop() {
        return Err(ScrapeError::IndexUnavailable { kind: ResourceKind::Events, reason: reason.to_string() });
    }
    if let Some((_, msg)) = report.failed.pop() {
        return Err(ScrapeError::IndexUnavailable { kind: ResourceKind::Events, reason: msg });
    }
    Ok(report.records.into_iter().flatten().collect())
}

/// Replace the stored events with a fresh scrape and report which ids are new.
pub fn load_events(client: &dyn DocumentClient, store: &JsonStore, opts: &ScrapeOptions) -> Result<EventsReport> {
    let scrape = scrape_events(client, store, opts)?;
    store_events(store, scrape, &[])
}

/// Scrape the listing and diff it against the stored events, without writing.
pub fn scrape_events(client: &dyn DocumentClient, store: &JsonStore, opts: &ScrapeOptions) -> Result<EventsScrape> {
    let previous: Vec<EventRecord> = store.load(ResourceKind::Events)?;
    let scraped = collect_events(client, opts, Local::now().naive_local())?;
    let new_ids = reconcile::new_event_ids(&previous, &scraped);
    Ok(EventsScrape { scraped, new_ids })
}

/// Write a scraped listing, leaving out the new ids in `hold_back`.
///
/// Only new ids can be held back; an event already in the store stays there.
pub fn store_events(store: &JsonStore, scrape: EventsScrape, hold_back: &[String]) -> Result<EventsReport> {
    let EventsScrape { scraped, new_ids } = scrape;
    let held_back: Vec<String> = new_ids.iter().filter(|id| hold_back.contains(id)).cloned().collect();
    let kept: Vec<EventRecord> = scraped.into_iter().filter(|e| !held_back.contains(&e.id)).collect();

    let path = store.save(ResourceKind::Events, &kept)?;
    info!(total = kept.len(), new = new_ids.len(), held_back = held_back.len(), path = %path.display(), "events stored");

    Ok(EventsReport { total: kept.len(), new_ids, held_back })
}
