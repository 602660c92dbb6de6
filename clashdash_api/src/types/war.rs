//! War and capital-raid types returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current war returned by the `/clans/{tag}/currentwar` endpoint.
///
/// When the clan is not at war only `state` is populated; every other field
/// defaults accordingly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct War {
    /// Phase of the war.
    pub state: WarState,

    /// Number of players per side.
    #[serde(default)]
    pub team_size: i64,

    /// Start of the preparation day.
    #[serde(default, with = "game_time::option")]
    pub preparation_start_time: Option<DateTime<Utc>>,

    /// Start of the battle day.
    #[serde(default, with = "game_time::option")]
    pub start_time: Option<DateTime<Utc>>,

    /// End of the battle day.
    #[serde(default, with = "game_time::option")]
    pub end_time: Option<DateTime<Utc>>,

    /// Our side of the war.
    #[serde(default)]
    pub clan: Option<WarClan>,

    /// Opposing side of the war.
    #[serde(default)]
    pub opponent: Option<WarClan>,
}

/// Phase of a clan war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarState {
    NotInWar,
    Preparation,
    InWar,
    WarEnded,
}

/// One side of a war or war-log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarClan {
    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Total stars earned across all attacks.
    #[serde(default)]
    pub stars: i64,

    /// Average destruction across all attacks, 0.0..=100.0.
    #[serde(default)]
    pub destruction_percentage: f64,

    /// Attacks used so far.
    #[serde(default)]
    pub attacks: i64,
}

/// One completed war in the `/clans/{tag}/warlog` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarLogEntry {
    /// Outcome from our perspective; absent for CWL rounds.
    #[serde(default)]
    pub result: Option<WarResult>,

    #[serde(default, with = "game_time::option")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub team_size: i64,

    pub clan: WarClan,

    #[serde(default)]
    pub opponent: Option<WarClan>,
}

/// Outcome of a completed war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarResult {
    Win,
    Lose,
    Tie,
}

/// One season in the `/clans/{tag}/capitalraidseasons` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidSeason {
    /// "ongoing" or "ended".
    pub state: String,

    #[serde(default, with = "game_time::option")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default, with = "game_time::option")]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub capital_total_loot: i64,

    #[serde(default)]
    pub raids_completed: i64,

    #[serde(default)]
    pub total_attacks: i64,

    #[serde(default)]
    pub offensive_reward: i64,

    #[serde(default)]
    pub defensive_reward: i64,
}

/// Serde adapter for the API's compact timestamp format
/// (`20240101T000000.000Z`), which chrono's RFC 3339 support does not accept.
pub mod game_time {
    use chrono::{DateTime, NaiveDateTime, Utc};

    pub const FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(s, FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub mod option {
        use super::{DateTime, Utc, FORMAT};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, ser: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(ts) => ser.serialize_str(&ts.format(FORMAT).to_string()),
                None => ser.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(de)?;
            match raw {
                Some(s) => super::parse(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
                None => Ok(None),
            }
        }
    }
}
