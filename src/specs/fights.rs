// src/specs/fights.rs
//
// Event page → fight ids (clickable fight rows carry the detail URL in `data-link`).
// Fight page → one positional record assembled from three regions:
//   1. stats: first row of tbody[0] (totals) + first row of tbody[2]
//      (significant strikes) minus its leading fighter/sig-str/sig-str-% cells,
//   2. details line: method, round, time, time format, referee,
//   3. result: bout title and the name under the green "W" marker ("" for draws/NC).

use scraper::ElementRef;

use crate::config::consts::{EVENT_URL, FIGHT_URL};
use crate::core::Document;
use crate::core::html::text_of;
use crate::core::sanitize::{last_segment, strip_labels};
use crate::model::{EventFights, FightJob, FightRecord, FightStats};
use super::{Extractor, Outcome};

/// The sig-strikes table repeats fighter names and the sig-str totals (3 columns x 2 corners).
const SIG_STRIKES_SKIP: usize = 6;
const DETAIL_FIELDS: usize = 5;
/// "Time format:" must go before "Time:".
const DETAIL_LABELS: [&str; 5] = ["Method:", "Round:", "Time format:", "Time:", "Referee:"];

pub struct EventFightList;

impl Extractor for EventFightList {
    /// Event id.
    type Item = String;
    type Output = EventFights;

    fn url(&self, event_id: &String) -> String {
        EVENT_URL.replace("{id}", event_id)
    }

    fn extract(&self, event_id: &String, doc: &Document) -> Outcome<EventFights> {
        let fight_ids: Vec<String> = doc
            .select(sel!("tr.b-fight-details__table-row.b-fight-details__table-row__hover.js-fight-details-click"))
            .filter_map(|tr| tr.value().attr("data-link"))
            .filter_map(last_segment)
            .collect();

        // A card whose bouts were all cancelled keeps the table with an empty body.
        let has_table = doc
            .select(sel!("table.b-fight-details__table_type_event-details tbody.b-fight-details__table-body"))
            .next()
            .is_some();
        if fight_ids.is_empty() && !has_table {
            return Outcome::malformed(format!("no fight table ({})", doc.diagnostic()));
        }
        Outcome::Success(EventFights { event_id: event_id.clone(), fight_ids })
    }
}

pub struct FightDetails;

impl Extractor for FightDetails {
    type Item = FightJob;
    type Output = FightRecord;

    fn url(&self, job: &FightJob) -> String {
        FIGHT_URL.replace("{id}", &job.fight_id)
    }

    fn extract(&self, job: &FightJob, doc: &Document) -> Outcome<FightRecord> {
        let Some(stats) = fight_stats(doc) else {
            return Outcome::malformed(doc.diagnostic());
        };
        let (fight_type, winner) = fight_result(doc);

        let values = stats
            .into_iter()
            .chain(fight_details(doc))
            .chain([fight_type, winner]);

        Outcome::Success(FightRecord {
            fight_id: job.fight_id.clone(),
            event_id: job.event_id.clone(),
            stats: FightStats::from_values(values),
        })
    }
}

/// `None` when either stats table (or its first row) is missing.
fn fight_stats(doc: &Document) -> Option<Vec<String>> {
    let bodies: Vec<ElementRef> = doc.select(sel!("tbody")).collect();
    let mut values = first_row_values(*bodies.first()?)?;
    let strikes = first_row_values(*bodies.get(2)?)?;
    values.extend(strikes.into_iter().skip(SIG_STRIKES_SKIP));
    Some(values)
}

/// Each cell holds one `<p>` per corner; cells without paragraphs count as one value.
fn first_row_values(body: ElementRef<'_>) -> Option<Vec<String>> {
    let row = body.select(sel!("tr")).next()?;
    let values = row
        .select(sel!("td"))
        .flat_map(|td| {
            let corners: Vec<String> = td.select(sel!("p")).map(text_of).collect();
            if corners.is_empty() { vec![text_of(td)] } else { corners }
        })
        .collect();
    Some(values)
}

fn fight_details(doc: &Document) -> Vec<String> {
    doc.select(sel!("div.b-fight-details__content p.b-fight-details__text"))
        .next()
        .map(|line| {
            line.select(sel!("i.b-fight-details__text-item_first, i.b-fight-details__text-item"))
                .take(DETAIL_FIELDS)
                .map(|item| strip_labels(&text_of(item), &DETAIL_LABELS))
                .collect()
        })
        .unwrap_or_default()
}

fn fight_result(doc: &Document) -> (String, String) {
    let fight_type = doc
        .select(sel!("i.b-fight-details__fight-title"))
        .next()
        .map(text_of)
        .unwrap_or_default();

    let winner = doc
        .select(sel!("div.b-fight-details__person"))
        .filter(|person| {
            person
                .select(sel!("i.b-fight-details__person-status.b-fight-details__person-status_style_green"))
                .next()
                .is_some()
        })
        .filter_map(|person| person.select(sel!("h3.b-fight-details__person-name")).next())
        .map(text_of)
        .last()
        .unwrap_or_default();

    (fight_type, winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FIGHT_HEADER;
    use crate::specs::RetryReason;

    const EVENT: &str = include_str!("../../tests/fixtures/event_details.html");
    const FIGHT: &str = include_str!("../../tests/fixtures/fight_details.html");
    const BUSY: &str = include_str!("../../tests/fixtures/busy.html");

    fn job() -> FightJob {
        FightJob { fight_id: s!("8a9a6e1f5b2bd3c1"), event_id: s!("4c12aa7ca246e7a4") }
    }

    fn success(out: Outcome<FightRecord>) -> FightRecord {
        match out {
            Outcome::Success(rec) => rec,
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn event_page_lists_fight_ids() {
        let out = EventFightList.classify(&s!("4c12aa7ca246e7a4"), &Document::parse(EVENT));
        assert_eq!(out, Outcome::Success(EventFights {
            event_id: s!("4c12aa7ca246e7a4"),
            fight_ids: vec![s!("8a9a6e1f5b2bd3c1"), s!("2f449a8d5e1c2b77")],
        }));
    }

    #[test]
    fn event_table_without_rows_is_an_empty_card() {
        let start = EVENT.find("<tr class=\"b-fight-details__table-row b-fight-details__table-row__hover").unwrap();
        let end = EVENT.rfind("</tbody>").unwrap();
        let cancelled = format!("{}{}", &EVENT[..start], &EVENT[end..]);

        let out = EventFightList.classify(&s!("e"), &Document::parse(&cancelled));
        assert_eq!(out, Outcome::Success(EventFights { event_id: s!("e"), fight_ids: Vec::new() }));
    }

    #[test]
    fn event_page_without_table_is_retryable() {
        let out = EventFightList.classify(&s!("e"), &Document::parse("<html><body><h2>UFC 1</h2></body></html>"));
        assert!(matches!(out, Outcome::Retryable(RetryReason::Malformed(_))));
        let busy = EventFightList.classify(&s!("e"), &Document::parse(BUSY));
        assert_eq!(busy, Outcome::Retryable(RetryReason::Busy));
    }

    #[test]
    fn golden_fight_page() {
        let rec = success(FightDetails.classify(&job(), &Document::parse(FIGHT)));
        assert_eq!(rec.fight_id, "8a9a6e1f5b2bd3c1");
        assert_eq!(rec.event_id, "4c12aa7ca246e7a4");

        let expected = [
            "Alex Pereira", "Jamahal Hill", "1", "0", "31 of 52", "10 of 27", "59%", "37%",
            "34 of 55", "11 of 28", "0 of 0", "0 of 1", "---", "0%", "0", "0", "0", "0",
            "0:00", "0:12", "21 of 38", "4 of 18", "6 of 8", "3 of 4", "4 of 6", "3 of 5",
            "28 of 48", "10 of 27", "0 of 0", "0 of 0", "3 of 4", "0 of 0",
            "KO/TKO", "1", "3:14", "5 Rnd (5-5-5-5-5)", "Herb Dean",
            "Light Heavyweight Title Bout", "Alex Pereira",
        ];
        assert_eq!(rec.stats.values(), expected.to_vec());
    }

    #[test]
    fn draw_has_empty_winner() {
        let html = FIGHT.replace("person-status_style_green", "person-status_style_gray");
        let rec = success(FightDetails.classify(&job(), &Document::parse(&html)));
        assert_eq!(rec.stats.winner, "");
        assert_eq!(rec.stats.fight_type, "Light Heavyweight Title Bout");
    }

    #[test]
    fn missing_stats_tables_is_retryable_with_heading() {
        let html = r#"<html><body><h2 class="b-content__title">UFC 300: Pereira vs. Hill</h2>
            <table><tbody><tr><td>only one table</td></tr></tbody></table></body></html>"#;
        let out = FightDetails.classify(&job(), &Document::parse(html));
        assert_eq!(out, Outcome::malformed("UFC 300: Pereira vs. Hill"));
    }

    /// Synthetic page carrying exactly the structural markers and 39 placeholders.
    fn placeholder_page() -> String {
        fn cells(values: &[String]) -> String {
            values
                .chunks(2)
                .map(|pair| format!("<td><p>{}</p><p>{}</p></td>", pair[0], pair[1]))
                .collect()
        }
        fn table(values: &[String]) -> String {
            format!("<table><thead><tr><th>h</th></tr></thead><tbody><tr>{}</tr></tbody></table>", cells(values))
        }
        let v = |i: usize| format!("v{i}");

        let totals: Vec<String> = (0..20).map(v).collect();
        let per_round: Vec<String> = (0..20).map(|_| s!("junk")).collect();
        let strikes: Vec<String> = (0..SIG_STRIKES_SKIP).map(|_| s!("skip")).chain((20..32).map(v)).collect();
        let labels = ["Method:", "Round:", "Time:", "Time format:", "Referee:"];
        let details: String = labels
            .iter()
            .zip(32..37)
            .map(|(label, i)| format!(r#"<i class="b-fight-details__text-item"><i>{label}</i> v{i}</i>"#))
            .collect();

        format!(
            r#"<html><body><h2>Placeholder</h2>
            <div class="b-fight-details__person">
              <i class="b-fight-details__person-status b-fight-details__person-status_style_green">W</i>
              <h3 class="b-fight-details__person-name">v38</h3>
            </div>
            <i class="b-fight-details__fight-title">v37</i>
            <div class="b-fight-details__content"><p class="b-fight-details__text">{details}</p></div>
            {}{}{}{}
            </body></html>"#,
            table(&totals),
            table(&per_round),
            table(&strikes),
            table(&per_round),
        )
    }

    #[test]
    fn value_i_maps_to_header_field_i() {
        let rec = success(FightDetails.classify(&job(), &Document::parse(&placeholder_page())));
        let json = serde_json::to_value(&rec).unwrap();
        for (i, key) in FIGHT_HEADER.iter().enumerate() {
            assert_eq!(json[*key], format!("v{i}"), "field {i} ({key})");
        }
    }
}
