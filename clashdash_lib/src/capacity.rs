//! The CWL visibility filter.
//!
//! "Serious" clans are independently viable and always advertised. "Lazy"
//! clans within a league form a waiting chain: the next one is revealed only
//! once the previous visible lazy clan can no longer accept eligible members,
//! so the site never advertises a pile of half-empty low-priority clans at
//! once. Unknown formats fail open and never gate the chain.

use std::collections::HashMap;

use crate::model::MergedClan;

/// Selects the clans to surface, ordered by occupancy rank.
///
/// Pure function: the input is never mutated and repeated calls on the same
/// input produce the same output.
pub fn filter_visible(clans: &[MergedClan]) -> Vec<MergedClan> {
    let mut league_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<MergedClan>> = HashMap::new();
    for clan in clans {
        let league = clan.league_name().to_string();
        if !groups.contains_key(&league) {
            league_order.push(league.clone());
        }
        groups.entry(league).or_default().push(clan.clone());
    }

    let mut visible: Vec<MergedClan> = Vec::new();
    for league in league_order {
        let mut group = groups.remove(&league).unwrap_or_default();
        // Stable, so equal ranks keep their input order.
        group.sort_by_key(MergedClan::occupancy_rank);
        visible.extend(visible_within_league(&group));
    }

    visible.sort_by_key(MergedClan::occupancy_rank);
    visible
}

/// Walks one rank-ordered league group, applying the lazy chain.
fn visible_within_league(group: &[MergedClan]) -> Vec<MergedClan> {
    let mut picked: Vec<&MergedClan> = Vec::new();
    let mut last_lazy: Option<&MergedClan> = None;

    for clan in group {
        match clan.format().as_str() {
            "serious" => picked.push(clan),
            "lazy" => match last_lazy {
                None => {
                    picked.push(clan);
                    last_lazy = Some(clan);
                }
                Some(previous) if previous.is_full() => {
                    picked.push(clan);
                    last_lazy = Some(clan);
                }
                Some(previous) => {
                    tracing::debug!(
                        "hiding {} behind {} ({}/{} eligible)",
                        clan.tag,
                        previous.tag,
                        previous.eligible_members,
                        previous.required_members()
                    );
                }
            },
            _ => picked.push(clan),
        }
    }

    picked.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterRow;

    fn clan(
        tag: &str,
        league: &str,
        format: &str,
        rank: i64,
        required: i64,
        eligible: i64,
    ) -> MergedClan {
        MergedClan {
            tag: tag.to_string(),
            name: tag.to_string(),
            clan_level: 10,
            members: 40,
            war_wins: 0,
            war_league: None,
            badge: None,
            requirement: Some(RosterRow {
                tag: tag.to_string(),
                format: format.to_string(),
                required_members: required,
                town_hall_rule: String::new(),
                league: Some(league.to_string()),
                occupancy_rank: rank,
            }),
            eligible_members: eligible,
        }
    }

    fn tags(clans: &[MergedClan]) -> Vec<&str> {
        clans.iter().map(|c| c.tag.as_str()).collect()
    }

    #[test]
    fn serious_clans_are_always_visible() {
        let input = vec![
            clan("#S1", "Master 2", "serious", 1, 15, 0),
            clan("#S2", "Master 2", "serious", 2, 15, 0),
        ];
        assert_eq!(tags(&filter_visible(&input)), vec!["#S1", "#S2"]);
    }

    #[test]
    fn second_lazy_clan_hidden_until_first_fills() {
        let input = vec![
            clan("#L1", "Master 2", "lazy", 1, 10, 9),
            clan("#L2", "Master 2", "lazy", 2, 10, 0),
        ];
        assert_eq!(tags(&filter_visible(&input)), vec!["#L1"]);

        let filled = vec![
            clan("#L1", "Master 2", "lazy", 1, 10, 10),
            clan("#L2", "Master 2", "lazy", 2, 10, 0),
        ];
        assert_eq!(tags(&filter_visible(&filled)), vec!["#L1", "#L2"]);
    }

    #[test]
    fn chain_gates_on_the_last_visible_lazy_clan() {
        // L1 full reveals L2; L2 not full keeps L3 hidden.
        let input = vec![
            clan("#L1", "Master 2", "lazy", 4, 10, 12),
            clan("#L2", "Master 2", "lazy", 5, 10, 3),
            clan("#L3", "Master 2", "lazy", 6, 10, 0),
        ];
        assert_eq!(tags(&filter_visible(&input)), vec!["#L1", "#L2"]);
    }

    #[test]
    fn chain_continues_while_each_link_is_full() {
        let input = vec![
            clan("#L1", "Master 2", "lazy", 4, 10, 12),
            clan("#L2", "Master 2", "lazy", 5, 10, 11),
            clan("#L3", "Master 2", "lazy", 6, 10, 0),
        ];
        assert_eq!(tags(&filter_visible(&input)), vec!["#L1", "#L2", "#L3"]);
    }

    #[test]
    fn serious_clans_do_not_advance_the_lazy_chain() {
        let input = vec![
            clan("#L1", "Master 2", "lazy", 1, 10, 5),
            clan("#S1", "Master 2", "serious", 2, 15, 20),
            clan("#L2", "Master 2", "lazy", 3, 10, 0),
        ];
        assert_eq!(tags(&filter_visible(&input)), vec!["#L1", "#S1"]);
    }

    #[test]
    fn unknown_format_is_visible_and_does_not_gate() {
        let input = vec![
            clan("#L1", "Master 2", "lazy", 1, 10, 5),
            clan("#X1", "Master 2", "casual", 2, 10, 0),
            clan("#X2", "Master 2", "", 3, 10, 0),
        ];
        assert_eq!(tags(&filter_visible(&input)), vec!["#L1", "#X1", "#X2"]);
    }

    #[test]
    fn format_comparison_ignores_case_and_whitespace() {
        let input = vec![
            clan("#L1", "Master 2", " LAZY ", 1, 10, 2),
            clan("#L2", "Master 2", "Lazy", 2, 10, 0),
        ];
        assert_eq!(tags(&filter_visible(&input)), vec!["#L1"]);
    }

    #[test]
    fn leagues_have_independent_chains() {
        let input = vec![
            clan("#M1", "Master 2", "lazy", 1, 10, 0),
            clan("#C1", "Crystal 1", "lazy", 2, 10, 0),
            clan("#M2", "Master 2", "lazy", 3, 10, 0),
            clan("#C2", "Crystal 1", "lazy", 4, 10, 0),
        ];
        // First lazy clan of each league is visible; the second of each is gated.
        assert_eq!(tags(&filter_visible(&input)), vec!["#M1", "#C1"]);
    }

    #[test]
    fn output_is_globally_ordered_by_rank() {
        let input = vec![
            clan("#B", "Crystal 1", "serious", 7, 15, 0),
            clan("#A", "Master 2", "serious", 2, 15, 0),
            clan("#C", "Master 2", "serious", 5, 15, 0),
        ];
        assert_eq!(tags(&filter_visible(&input)), vec!["#A", "#C", "#B"]);
    }

    #[test]
    fn unranked_clans_sort_last() {
        let mut unranked = clan("#U", "Master 2", "serious", 0, 15, 0);
        unranked.requirement = None;
        let input = vec![unranked, clan("#A", "Master 2", "serious", 3, 15, 0)];
        assert_eq!(tags(&filter_visible(&input)), vec!["#A", "#U"]);
    }

    #[test]
    fn filtering_is_idempotent_and_does_not_mutate_input() {
        let input = vec![
            clan("#L1", "Master 2", "lazy", 1, 10, 12),
            clan("#L2", "Master 2", "lazy", 2, 10, 3),
            clan("#L3", "Master 2", "lazy", 3, 10, 0),
        ];
        let first = filter_visible(&input);
        let second = filter_visible(&input);
        assert_eq!(tags(&first), tags(&second));
        assert_eq!(input.len(), 3);
        assert_eq!(input[0].tag, "#L1");

        // A second application over its own output keeps the same set.
        let again = filter_visible(&first);
        assert_eq!(tags(&again), tags(&first));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_visible(&[]).is_empty());
    }
}
