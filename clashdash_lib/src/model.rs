//! Merged view of a live clan and its roster requirement.
//!
//! All defaulting for optional roster data happens here, behind accessors,
//! so the capacity filter and the HTTP layer never chase optional fields.

use serde::{Deserialize, Serialize};

use clashdash_api::types::Clan;

use crate::roster::RosterRow;

/// League bucket for clans with neither a roster league nor a live one.
pub const UNKNOWN_LEAGUE: &str = "Unknown";

/// A live clan joined with its roster requirement for one aggregation pass.
///
/// `requirement` is `None` when no roster row exists for the clan's tag.
/// `eligible_members` is recomputed on every pass, never carried over.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedClan {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub clan_level: i64,
    #[serde(default)]
    pub members: i64,
    #[serde(default)]
    pub war_wins: i64,
    /// Live war-league name, when the clan has one.
    #[serde(default)]
    pub war_league: Option<String>,
    /// Small badge URL for list views.
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub requirement: Option<RosterRow>,
    #[serde(default)]
    pub eligible_members: i64,
}

impl MergedClan {
    /// Builds the merged record from a live clan and its matched roster row.
    pub fn from_parts(clan: &Clan, requirement: Option<RosterRow>, eligible_members: i64) -> Self {
        let badge = clan.badge_urls.as_ref().and_then(|b| {
            b.small
                .clone()
                .or_else(|| b.medium.clone())
                .or_else(|| b.large.clone())
        });
        Self {
            tag: clan.tag.clone(),
            name: clan.name.clone(),
            clan_level: clan.clan_level,
            members: clan.members,
            war_wins: clan.war_wins,
            war_league: clan.war_league.as_ref().map(|l| l.name.clone()),
            badge,
            requirement,
            eligible_members,
        }
    }

    /// League used for grouping: the roster-declared league wins over the
    /// live one; clans with neither go to [`UNKNOWN_LEAGUE`].
    pub fn league_name(&self) -> &str {
        self.requirement
            .as_ref()
            .and_then(|r| r.league.as_deref())
            .filter(|l| !l.trim().is_empty())
            .or(self.war_league.as_deref())
            .unwrap_or(UNKNOWN_LEAGUE)
    }

    /// Roster format normalized for comparison (trimmed, lowercased).
    pub fn format(&self) -> String {
        self.requirement
            .as_ref()
            .map(|r| r.format.trim().to_lowercase())
            .unwrap_or_default()
    }

    /// Ordering key within a league; clans without a roster row sort last.
    pub fn occupancy_rank(&self) -> i64 {
        self.requirement
            .as_ref()
            .map(|r| r.occupancy_rank)
            .unwrap_or_else(crate::roster::default_rank)
    }

    /// Member quota from the roster; 0 without a roster row.
    pub fn required_members(&self) -> i64 {
        self.requirement
            .as_ref()
            .map(|r| r.required_members)
            .unwrap_or(0)
    }

    /// Whether the clan can no longer accept eligible members.
    pub fn is_full(&self) -> bool {
        self.eligible_members >= self.required_members()
    }
}
