// src/scrape/mod.rs
pub mod engine;
mod events;
mod fighters;
mod fights;

pub use engine::{BatchReport, fetch_all};
pub use events::{EventsReport, EventsScrape, collect_events, load_events, scrape_events, store_events};
pub use fighters::{FightersReport, load_fighters};
pub use fights::{FightsReport, load_fights};
