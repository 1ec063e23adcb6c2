// src/model.rs
//
// Record shapes for the three resource kinds, as persisted in the store.
// Keys match the JSON files written by earlier versions of the scraper.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub name: String,
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    pub location: String,
}

/// First-phase fighter data, harvested from the per-letter listing pages.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FighterStub {
    #[serde(alias = "figher_id")]
    pub fighter_id: String,
    pub fighter_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterRecord {
    #[serde(alias = "figher_id")]
    pub fighter_id: String,
    pub fighter_name: String,
    pub height: String,
    pub weight: String,
    pub reach: String,
    pub stance: String,
    pub dob: String,
}

impl FighterRecord {
    /// `info` is `[height, weight, reach, stance, dob]`.
    pub fn enrich(stub: FighterStub, info: [String; 5]) -> Self {
        let [height, weight, reach, stance, dob] = info;
        Self {
            fighter_id: stub.fighter_id,
            fighter_name: stub.fighter_name,
            height,
            weight,
            reach,
            stance,
            dob,
        }
    }
}

/// One fight to fetch, tagged with the event it was listed under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FightJob {
    pub fight_id: String,
    pub event_id: String,
}

/// Fight ids listed on one event page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventFights {
    pub event_id: String,
    pub fight_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightRecord {
    pub fight_id: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(flatten)]
    pub stats: FightStats,
}

positional_record! {
    /// The 39 positional fight values: totals table (both corners), significant
    /// strikes by target/position, the details line, and the result block.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct FightStats;
    pub const FIGHT_HEADER = {
        r_fighter => "r_fighter",
        b_fighter => "b_fighter",
        r_kd => "r_kd",
        b_kd => "b_kd",
        r_sig_str => "r_sig_str.",
        b_sig_str => "b_sig_str.",
        r_sig_str_pct => "r_sig_str_pct",
        b_sig_str_pct => "b_sig_str_pct",
        r_total_str => "r_total_str.",
        b_total_str => "b_total_str.",
        r_td => "r_td",
        b_td => "b_td",
        r_td_pct => "r_td_pct",
        b_td_pct => "b_td_pct",
        r_sub_att => "r_sub_att",
        b_sub_att => "b_sub_att",
        r_pass => "r_pass",
        b_pass => "b_pass",
        r_rev => "r_rev",
        b_rev => "b_rev",
        r_head => "r_head",
        b_head => "b_head",
        r_body => "r_body",
        b_body => "b_body",
        r_leg => "r_leg",
        b_leg => "b_leg",
        r_distance => "r_distance",
        b_distance => "b_distance",
        r_clinch => "r_clinch",
        b_clinch => "b_clinch",
        r_ground => "r_ground",
        b_ground => "b_ground",
        win_by => "win_by",
        last_round => "last_round",
        last_round_time => "last_round_time",
        format => "format",
        referee => "referee",
        fight_type => "fight_type",
        winner => "winner",
    }
}

/// Timestamps are stored as `YYYY-MM-DD HH:MM:SS`; a bare date is accepted on read.
mod timestamp {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(de)?;
        if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, FORMAT) {
            return Ok(dt);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
