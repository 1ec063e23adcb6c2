// src/runner.rs
use tracing::info;

use crate::config::options::ScrapeOptions;
use crate::core::DocumentClient;
use crate::error::Result;
use crate::progress::{Progress, reborrow};
use crate::scrape::{self, EventsReport, FightersReport, FightsReport};
use crate::store::{JsonStore, ResourceKind};

/// What one full run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub events: EventsReport,
    pub fights: FightsReport,
    /// `None` when the roster was left alone (no new events, roster present, not forced).
    pub fighters: Option<FightersReport>,
}

impl RunSummary {
    /// Nothing was left behind by exhausted retries or hard failures.
    pub fn is_complete(&self) -> bool {
        let fights = &self.fights;
        let fights_ok = fights.unlisted.is_empty()
            && fights.list_failed.is_empty()
            && fights.exhausted.is_empty()
            && fights.failed.is_empty();
        let fighters_ok = self
            .fighters
            .as_ref()
            .is_none_or(|f| f.exhausted.is_empty() && f.failed.is_empty());
        fights_ok && fighters_ok
    }
}

/// Events first; fights for exactly the new event ids; then the roster when
/// anything new turned up (or it was never built, or `force_fighters`).
///
/// The events file is written after the fights pass, without the events whose
/// fight list stayed busy, so those count as new on the next run.
pub fn run(
    client: &dyn DocumentClient,
    store: &JsonStore,
    opts: &ScrapeOptions,
    force_fighters: bool,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let listing = scrape::scrape_events(client, store, opts)?;
    info!(new = listing.new_ids.len(), "events scraped");

    let fights = scrape::load_fights(client, store, &listing.new_ids, opts, reborrow(&mut progress))?;
    let events = scrape::store_events(store, listing, &fights.unlisted)?;

    let rebuild = force_fighters || !events.new_ids.is_empty() || !store.exists(ResourceKind::Fighters);
    let fighters = if rebuild {
        Some(scrape::load_fighters(client, store, opts, reborrow(&mut progress))?)
    } else {
        info!("no new events; fighter roster unchanged");
        None
    };

    Ok(RunSummary { events, fights, fighters })
}
