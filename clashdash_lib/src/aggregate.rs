//! The aggregation pipeline: roster rows joined with live clan data,
//! eligibility computed, visibility filtered, and the result cached.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use clashdash_api::types::Clan;

use crate::cache::MemoryCache;
use crate::capacity::filter_visible;
use crate::eligibility::{eligible_members, TownHallRule};
use crate::error::AggregationError;
use crate::model::MergedClan;
use crate::roster::{RosterClient, RosterRow};
use crate::session::ApiSession;

/// Cache key for the capacity-filtered clan list.
pub const FILTERED_CACHE_KEY: &str = "cwl:clans:filtered";
/// Cache key for the unfiltered merged clan list.
pub const ALL_CACHE_KEY: &str = "cwl:clans:all";

/// Concurrent in-flight clan fetches per batch; the upstream API rate-limits
/// aggressively.
const FETCH_POOL_SIZE: usize = 5;
/// Budget for a single clan fetch; slower lookups are treated as unavailable.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Composes the roster source, the game API session, the eligibility rules
/// and the capacity filter into one cached result.
pub struct Aggregator {
    session: ApiSession,
    roster: RosterClient,
    cache: MemoryCache,
}

/// Response body for the per-clan eligibility check.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub clan_tag: String,
    pub clan_name: String,
    pub eligible_members: i64,
    pub required_members: i64,
    pub is_full: bool,
    pub remaining_slots: i64,
}

impl Aggregator {
    pub fn new(session: ApiSession, roster: RosterClient, cache: MemoryCache) -> Self {
        Self {
            session,
            roster,
            cache,
        }
    }

    /// Returns the capacity-filtered clan list, from cache when fresh.
    pub async fn filtered_clans(&self) -> Result<Vec<MergedClan>, AggregationError> {
        self.cached_pass(FILTERED_CACHE_KEY, true).await
    }

    /// Returns the full merged clan list with the filter bypassed, cached
    /// under its own key.
    pub async fn all_clans(&self) -> Result<Vec<MergedClan>, AggregationError> {
        self.cached_pass(ALL_CACHE_KEY, false).await
    }

    async fn cached_pass(
        &self,
        cache_key: &str,
        filtered: bool,
    ) -> Result<Vec<MergedClan>, AggregationError> {
        if let Some(cached) = self.cache.get(cache_key) {
            let clans: Vec<MergedClan> = serde_json::from_str(&cached)?;
            return Ok(clans);
        }

        let merged = self.merged_clans().await?;
        let result = if filtered {
            filter_visible(&merged)
        } else {
            merged
        };
        if let Ok(json) = serde_json::to_string(&result) {
            self.cache.set(cache_key.to_string(), json);
        }
        Ok(result)
    }

    /// One full merge pass: roster rows, live data for every referenced tag,
    /// eligibility per clan.
    async fn merged_clans(&self) -> Result<Vec<MergedClan>, AggregationError> {
        let rows = self.roster.fetch_roster().await?;
        if rows.is_empty() {
            return Err(AggregationError::NoRosterData);
        }

        let mut tags: Vec<String> = Vec::new();
        for row in &rows {
            if !tags.contains(&row.tag) {
                tags.push(row.tag.clone());
            }
        }

        let live = self.fetch_many(&tags).await?;
        if live.is_empty() {
            return Err(AggregationError::NoLiveData);
        }
        tracing::info!("merging {} live clans against {} roster rows", live.len(), rows.len());

        Ok(live
            .iter()
            .map(|clan| {
                let requirement = rows.iter().find(|r| r.tag == clan.tag).cloned();
                let eligible = match &requirement {
                    Some(req) => eligible_members(
                        &TownHallRule::parse(&req.town_hall_rule),
                        &clan.member_list,
                    ),
                    None => 0,
                };
                MergedClan::from_parts(clan, requirement, eligible)
            })
            .collect())
    }

    /// Fetches live data for many tags, best-effort. Failed or timed-out
    /// lookups are logged and dropped. Results come back in roster order,
    /// never completion order.
    async fn fetch_many(&self, tags: &[String]) -> Result<Vec<Clan>, AggregationError> {
        let client = self.session.client().await?;
        let mut fetched: Vec<(usize, Clan)> = Vec::with_capacity(tags.len());
        let batches: Vec<&[String]> = tags.chunks(FETCH_POOL_SIZE).collect();
        let batch_count = batches.len();

        for (batch_no, batch) in batches.into_iter().enumerate() {
            let mut in_flight = JoinSet::new();
            for (offset, tag) in batch.iter().enumerate() {
                let client = client.clone();
                let tag = tag.clone();
                let index = batch_no * FETCH_POOL_SIZE + offset;
                in_flight.spawn(async move {
                    let outcome = tokio::time::timeout(FETCH_TIMEOUT, client.get_clan(&tag)).await;
                    (index, tag, outcome)
                });
            }
            while let Some(joined) = in_flight.join_next().await {
                match joined {
                    Ok((index, _, Ok(Ok(clan)))) => fetched.push((index, clan)),
                    Ok((_, tag, Ok(Err(err)))) => {
                        tracing::warn!("skipping clan {}: {}", tag, err);
                    }
                    Ok((_, tag, Err(_))) => {
                        tracing::warn!("skipping clan {}: fetch timed out", tag);
                    }
                    Err(err) => {
                        tracing::warn!("clan fetch task failed: {}", err);
                    }
                }
            }
            if batch_no + 1 < batch_count {
                tokio::time::sleep(batch_pause()).await;
            }
        }

        fetched.sort_by_key(|(index, _)| *index);
        Ok(fetched.into_iter().map(|(_, clan)| clan).collect())
    }

    /// Checks one clan against caller-supplied roster requirements. Not
    /// cached: the requirement comes from the request body, so there is no
    /// stable key.
    pub async fn eligibility_report(
        &self,
        tag: &str,
        requirement: &RosterRow,
    ) -> Result<EligibilityReport, AggregationError> {
        let client = self.session.client().await?;
        let clan = client.get_clan(tag).await?;

        let rule = TownHallRule::parse(&requirement.town_hall_rule);
        let eligible = eligible_members(&rule, &clan.member_list);
        let required = requirement.required_members;

        Ok(EligibilityReport {
            clan_tag: clan.tag,
            clan_name: clan.name,
            eligible_members: eligible,
            required_members: required,
            is_full: eligible >= required,
            remaining_slots: (required - eligible).max(0),
        })
    }

    /// Removes all cached results.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Jittered pause between fetch batches so bursts do not hit the upstream
/// API at a fixed cadence.
fn batch_pause() -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(200..500))
}
