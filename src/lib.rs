// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod model;
pub mod progress;
pub mod reconcile;
pub mod runner;
pub mod scrape;
pub mod specs;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Result, ScrapeError};
pub use runner::{RunSummary, run};
