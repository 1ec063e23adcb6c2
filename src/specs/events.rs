// src/specs/events.rs
//
// Completed-events listing (`/statistics/events/completed?page=all`).
// Cells come in pairs: [name + link + date] [location].

use chrono::{NaiveDate, NaiveDateTime};
use scraper::ElementRef;
use tracing::debug;

use crate::core::Document;
use crate::core::html::text_of;
use crate::core::sanitize::last_segment;
use crate::model::EventRecord;
use super::{Extractor, Outcome};

pub struct EventList {
    /// Events dated strictly after this are dropped (announced, not yet held).
    pub now: NaiveDateTime,
}

impl Extractor for EventList {
    /// The listing URL.
    type Item = String;
    type Output = Vec<EventRecord>;

    fn url(&self, item: &String) -> String {
        item.clone()
    }

    fn extract(&self, _url: &String, doc: &Document) -> Outcome<Vec<EventRecord>> {
        let cells: Vec<ElementRef> = doc.select(sel!("td.b-statistics__table-col")).collect();
        if cells.is_empty() {
            return Outcome::malformed(format!("no event cells ({})", doc.diagnostic()));
        }

        let mut events = Vec::with_capacity(cells.len() / 2);
        for pair in cells.chunks_exact(2) {
            match parse_row(pair[0], pair[1]) {
                Some(ev) if ev.date > self.now => {
                    debug!(id = %ev.id, date = %ev.date, "skipping future event");
                }
                Some(ev) => events.push(ev),
                None => debug!(row = %text_of(pair[0]), "skipping event row without link or date"),
            }
        }
        Outcome::Success(events)
    }
}

fn parse_row(info: ElementRef<'_>, location: ElementRef<'_>) -> Option<EventRecord> {
    let date = info
        .select(sel!("span"))
        .next()
        .map(text_of)
        .and_then(|s| parse_event_date(&s))?;
    let link = info.select(sel!("a[href]")).next()?;
    let id = link.value().attr("href").and_then(last_segment)?;

    Some(EventRecord {
        id,
        name: text_of(link),
        date,
        location: text_of(location),
    })
}

/// "April 13, 2024" (also the abbreviated month form) at midnight.
pub fn parse_event_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%B %d, %Y", "%b %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
