// src/config/consts.rs

// Site
pub const EVENTS_URL: &str = "http://ufcstats.com/statistics/events/completed?page=all";
pub const EVENT_URL: &str = "http://ufcstats.com/event-details/{id}";
pub const FIGHT_URL: &str = "http://ufcstats.com/fight-details/{id}";
pub const FIGHTERS_PAGE_URL: &str = "http://ufcstats.com/statistics/fighters?char={letter}&page=all";
pub const FIGHTER_URL: &str = "http://ufcstats.com/fighter-details/{id}";

/// Heading text of the page the origin serves instead of content when overloaded.
pub const BUSY_MARKER: &str = "Server Too Busy";

pub const USER_AGENT: &str = concat!("ufc_scrape/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Local store
pub const DATA_DIR: &str = "data";
pub const LOG_FILE: &str = "debug.log";

// Concurrency
pub const WORKERS: usize = 16;
pub const FIGHTER_BATCH: usize = 20;

// Retry
pub const MAX_ATTEMPTS: u32 = 8;
pub const BACKOFF_BASE_MS: u64 = 500;
pub const BACKOFF_MAX_MS: u64 = 30_000;
