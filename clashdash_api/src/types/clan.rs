//! Clan-related types returned by the API.

use serde::{Deserialize, Serialize};

/// Unique clan identifier in canonical form (e.g. "#2PP0YL9Y").
pub type ClanTag = String;

/// Full clan record returned by the `/clans/{tag}` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clan {
    /// Canonical clan tag (e.g. "#2PP0YL9Y").
    pub tag: ClanTag,

    /// Display name of the clan.
    pub name: String,

    /// Clan experience level.
    #[serde(default)]
    pub clan_level: i64,

    /// Current number of members (0..=50).
    #[serde(default)]
    pub members: i64,

    /// Lifetime war wins; absent for clans with a private war log.
    #[serde(default)]
    pub war_wins: i64,

    /// Current Clan War League placement, if the clan has ever participated.
    #[serde(default)]
    pub war_league: Option<WarLeague>,

    /// Badge image URLs in several resolutions.
    #[serde(default)]
    pub badge_urls: Option<BadgeUrls>,

    /// Current member roster. Absent from some summary payloads.
    #[serde(default)]
    pub member_list: Vec<ClanMember>,
}

/// A single member within a clan's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    /// Player tag (e.g. "#8QU8J9LP").
    pub tag: String,

    /// Player display name.
    pub name: String,

    /// Clan role: "member", "admin", "coLeader" or "leader".
    #[serde(default)]
    pub role: Option<String>,

    /// Town-hall level; 0 when the API omits it.
    #[serde(default)]
    pub town_hall_level: i64,

    /// Current trophy count.
    #[serde(default)]
    pub trophies: i64,
}

/// Clan War League the clan is currently placed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarLeague {
    pub id: i64,
    /// Human-readable league name (e.g. "Master League II").
    pub name: String,
}

/// Badge image URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeUrls {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}
