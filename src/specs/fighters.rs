// src/specs/fighters.rs
//
// Two page kinds:
// - per-letter listing (`/statistics/fighters?char=a&page=all`): three black
//   links per fighter row (first name, last name, nickname), all pointing at the
//   fighter's detail page.
// - fighter detail page: the first five "block" list items are the bio box.

use scraper::ElementRef;

use crate::config::consts::{FIGHTERS_PAGE_URL, FIGHTER_URL};
use crate::core::Document;
use crate::core::html::text_of;
use crate::core::sanitize::{last_segment, strip_labels};
use crate::model::{FighterRecord, FighterStub};
use super::{Extractor, Outcome};

/// Labels in bio-box order: height, weight, reach, stance, date of birth.
const INFO_LABELS: [&str; 5] = ["Height:", "Weight:", "Reach:", "STANCE:", "DOB:"];

pub struct FighterIndex;

impl Extractor for FighterIndex {
    /// Listing pages are keyed by the first letter of the last name.
    type Item = char;
    type Output = Vec<FighterStub>;

    fn url(&self, letter: &char) -> String {
        FIGHTERS_PAGE_URL.replace("{letter}", &letter.to_string())
    }

    fn extract(&self, _letter: &char, doc: &Document) -> Outcome<Vec<FighterStub>> {
        let Some(table) = doc.select(sel!("tbody")).next() else {
            return Outcome::malformed(format!("no fighter table ({})", doc.diagnostic()));
        };
        let links: Vec<ElementRef> = table.select(sel!("a.b-link.b-link_style_black[href]")).collect();
        Outcome::Success(group_fighter_links(&links))
    }
}

/// Every third link closes a fighter row and carries the id; the two before it
/// are the name parts. Empty parts (single-name fighters) are skipped.
fn group_fighter_links(links: &[ElementRef<'_>]) -> Vec<FighterStub> {
    links
        .chunks_exact(3)
        .filter_map(|row| {
            let fighter_id = row[2].value().attr("href").and_then(last_segment)?;
            let fighter_name = row[..2]
                .iter()
                .map(|a| text_of(*a))
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            Some(FighterStub { fighter_id, fighter_name })
        })
        .collect()
}

pub struct FighterInfo;

impl Extractor for FighterInfo {
    type Item = FighterStub;
    type Output = FighterRecord;

    fn url(&self, stub: &FighterStub) -> String {
        FIGHTER_URL.replace("{id}", &stub.fighter_id)
    }

    fn extract(&self, stub: &FighterStub, doc: &Document) -> Outcome<FighterRecord> {
        let info: Vec<String> = doc
            .select(sel!("li.b-list__box-list-item.b-list__box-list-item_type_block"))
            .take(INFO_LABELS.len())
            .map(|li| strip_labels(&text_of(li), &INFO_LABELS))
            .collect();

        match <[String; 5]>::try_from(info) {
            Ok(info) => Outcome::Success(FighterRecord::enrich(stub.clone(), info)),
            Err(short) => Outcome::malformed(format!(
                "{} of {} bio fields ({})",
                short.len(),
                INFO_LABELS.len(),
                doc.diagnostic()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::RetryReason;

    const INDEX: &str = include_str!("../../tests/fixtures/fighters_index.html");
    const INDEX_EMPTY: &str = include_str!("../../tests/fixtures/fighters_index_empty.html");
    const DETAILS: &str = include_str!("../../tests/fixtures/fighter_details.html");
    const BUSY: &str = include_str!("../../tests/fixtures/busy.html");

    fn abbadi() -> FighterStub {
        FighterStub { fighter_id: s!("15df64c02b6b0fde"), fighter_name: s!("Danny Abbadi") }
    }

    #[test]
    fn index_groups_links_in_threes() {
        let Outcome::Success(stubs) = FighterIndex.classify(&'a', &Document::parse(INDEX)) else {
            panic!("expected success");
        };
        assert_eq!(stubs, vec![
            FighterStub { fighter_id: s!("93fe7332d16c6ad9"), fighter_name: s!("Tom Aaron") },
            abbadi(),
            FighterStub { fighter_id: s!("b361180739bed4b0"), fighter_name: s!("David Abbott") },
        ]);
    }

    #[test]
    fn index_with_no_rows_is_empty_success() {
        let out = FighterIndex.classify(&'x', &Document::parse(INDEX_EMPTY));
        assert_eq!(out, Outcome::Success(Vec::new()));
    }

    #[test]
    fn index_busy_or_tableless_is_retryable() {
        assert_eq!(FighterIndex.classify(&'a', &Document::parse(BUSY)), Outcome::Retryable(RetryReason::Busy));
        let bare = Document::parse("<html><body><h2>Oops</h2></body></html>");
        assert!(matches!(FighterIndex.classify(&'a', &bare), Outcome::Retryable(RetryReason::Malformed(_))));
    }

    #[test]
    fn index_url_uses_letter() {
        assert_eq!(
            FighterIndex.url(&'q'),
            "http://ufcstats.com/statistics/fighters?char=q&page=all"
        );
    }

    #[test]
    fn info_strips_labels_in_order() {
        let Outcome::Success(rec) = FighterInfo.classify(&abbadi(), &Document::parse(DETAILS)) else {
            panic!("expected success");
        };
        assert_eq!(rec.fighter_id, "15df64c02b6b0fde");
        assert_eq!(rec.fighter_name, "Danny Abbadi");
        assert_eq!(rec.height, "5' 11\"");
        assert_eq!(rec.weight, "155 lbs.");
        assert_eq!(rec.reach, "--");
        assert_eq!(rec.stance, "Orthodox");
        assert_eq!(rec.dob, "Jul 03, 1983");
    }

    #[test]
    fn busy_info_page_is_not_a_silent_success() {
        let out = FighterInfo.classify(&abbadi(), &Document::parse(BUSY));
        assert_eq!(out, Outcome::Retryable(RetryReason::Busy));
    }

    #[test]
    fn short_bio_box_is_retryable() {
        let html = r#"<html><body><h2>Danny Abbadi</h2><ul>
            <li class="b-list__box-list-item b-list__box-list-item_type_block">Height: 5' 11"</li>
            <li class="b-list__box-list-item b-list__box-list-item_type_block">Weight: 155 lbs.</li>
        </ul></body></html>"#;
        let out = FighterInfo.classify(&abbadi(), &Document::parse(html));
        let Outcome::Retryable(RetryReason::Malformed(why)) = out else {
            panic!("expected malformed, got {out:?}");
        };
        assert!(why.starts_with("2 of 5"));
    }
}
