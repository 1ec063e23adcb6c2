// src/specs/mod.rs
//! # Page extractors
//!
//! Each extractor knows **where the data lives in one kind of ufcstats.com page** and
//! how to reduce that page to a record. Extractors are pure: they receive an already
//! parsed [`Document`] and never touch the network or the store.
//!
//! ## Shape
//! Every extractor follows the same recipe: locate nodes by a fixed structural
//! signature (tag + class set), take their text, strip known label prefixes, and
//! zip the values against a fixed field order. A layout change on the site
//! shifts fields silently; the golden-document tests are the guard.
//!
//! ## Classification
//! Extractors answer with an [`Outcome`]:
//! - `Success(record)` – page had the expected structure.
//! - `Retryable(Busy)` – the origin's overload page (see [`Document::is_busy`]).
//! - `Retryable(Malformed)` – expected structure missing; treated as transient.
//! - `Fatal` – the page will never yield a record (e.g. HTTP 404). Not retried.
//!
//! ## Current extractors
//! - `events` – completed-events listing → `Vec<EventRecord>`.
//! - `fighters` – per-letter listing → `Vec<FighterStub>`; fighter page → `FighterRecord`.
//! - `fights` – event page → fight ids; fight page → `FightRecord`.

pub mod events;
pub mod fighters;
pub mod fights;

use std::fmt;

use crate::core::{Document, DocumentClient};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryReason {
    Busy,
    Malformed(String),
    Network(String),
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::Busy => f.write_str("server busy"),
            RetryReason::Malformed(why) => write!(f, "malformed page: {why}"),
            RetryReason::Network(why) => write!(f, "network: {why}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Retryable(RetryReason),
    Fatal(String),
}

impl<T> Outcome<T> {
    pub fn malformed(why: impl Into<String>) -> Self {
        Outcome::Retryable(RetryReason::Malformed(why.into()))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Reduce one kind of page to a record.
pub trait Extractor: Sync {
    /// What identifies one page of this kind (an id, a letter, a URL).
    type Item;
    type Output;

    fn url(&self, item: &Self::Item) -> String;

    /// Read a page already known not to be the overload page.
    fn extract(&self, item: &Self::Item, doc: &Document) -> Outcome<Self::Output>;

    /// Overload check first, then [`Extractor::extract`].
    fn classify(&self, item: &Self::Item, doc: &Document) -> Outcome<Self::Output> {
        if doc.is_busy() {
            return Outcome::Retryable(RetryReason::Busy);
        }
        self.extract(item, doc)
    }
}

/// Fetch the page for `item` and classify it.
pub fn fetch_one<E: Extractor>(client: &dyn DocumentClient, ext: &E, item: &E::Item) -> Outcome<E::Output> {
    let url = ext.url(item);
    match client.fetch(&url) {
        Ok(doc) => ext.classify(item, &doc),
        Err(e) if e.is_retryable() => Outcome::Retryable(RetryReason::Network(e.to_string())),
        Err(e) => Outcome::Fatal(e.to_string()),
    }
}
