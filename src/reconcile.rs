// src/reconcile.rs
//
// Pure merge policies, one per resource kind. Drivers load the persisted
// collection, call one of these, and write the result back.

use std::collections::{HashMap, HashSet};

use crate::model::{EventRecord, FightJob, FightRecord, FighterRecord, FighterStub};

/// Ids scraped now but absent from the previous run, sorted.
/// The events collection itself is simply replaced by the scraped set.
pub fn new_event_ids(previous: &[EventRecord], scraped: &[EventRecord]) -> Vec<String> {
    let known: HashSet<&str> = previous.iter().map(|e| e.id.as_str()).collect();
    let mut fresh: Vec<String> = scraped
        .iter()
        .map(|e| e.id.as_str())
        .filter(|id| !known.contains(id))
        .map(String::from)
        .collect();
    fresh.sort();
    fresh.dedup();
    fresh
}

/// Listing pages occasionally repeat a row; keep the first sighting of each id.
pub fn unique_stubs(stubs: Vec<FighterStub>) -> Vec<FighterStub> {
    let mut seen = HashSet::new();
    stubs
        .into_iter()
        .filter(|s| seen.insert(s.fighter_id.clone()))
        .collect()
}

/// The roster follows the listing: one record per stub, in listing order, taken
/// from `fresh` or else from `carried` (the previous roster). Stubs found in
/// neither are left out. Returns the roster and how many records were carried.
pub fn rebuild_fighters(
    stubs: &[FighterStub],
    fresh: Vec<FighterRecord>,
    carried: Vec<FighterRecord>,
) -> (Vec<FighterRecord>, usize) {
    let mut fresh: HashMap<String, FighterRecord> =
        fresh.into_iter().rev().map(|f| (f.fighter_id.clone(), f)).collect();
    let mut carried: HashMap<String, FighterRecord> =
        carried.into_iter().rev().map(|f| (f.fighter_id.clone(), f)).collect();

    let mut roster = Vec::with_capacity(stubs.len());
    let mut kept = 0;
    for stub in stubs {
        if let Some(f) = fresh.remove(&stub.fighter_id) {
            roster.push(f);
        } else if let Some(f) = carried.remove(&stub.fighter_id) {
            roster.push(f);
            kept += 1;
        }
    }
    (roster, kept)
}

/// Split `event_ids` into (to fetch, already present as some fight's `event_id`).
pub fn unprocessed_events(event_ids: &[String], stored: &[FightRecord]) -> (Vec<String>, Vec<String>) {
    let done: HashSet<&str> = stored
        .iter()
        .map(|f| f.event_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();
    event_ids
        .iter()
        .cloned()
        .partition(|id| !done.contains(id.as_str()))
}

/// Fresh fights first, then the stored ones; a `fight_id` seen twice keeps the fresh record.
pub fn merge_fights(fresh: Vec<FightRecord>, stored: Vec<FightRecord>) -> Vec<FightRecord> {
    let mut seen = HashSet::new();
    fresh
        .into_iter()
        .chain(stored)
        .filter(|f| seen.insert(f.fight_id.clone()))
        .collect()
}

/// Work queue for the fights pass: leftovers from earlier runs first, then the
/// newly listed fights. Fights already stored and repeated fight ids are dropped.
pub fn queue_fights(pending: Vec<FightJob>, listed: Vec<FightJob>, stored: &[FightRecord]) -> Vec<FightJob> {
    let mut seen: HashSet<String> = stored.iter().map(|f| f.fight_id.clone()).collect();
    pending
        .into_iter()
        .chain(listed)
        .filter(|job| seen.insert(job.fight_id.clone()))
        .collect()
}
