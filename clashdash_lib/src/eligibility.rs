//! Town-hall eligibility rules parsed from free-text roster requirements.
//!
//! A requirement cell reads like "TH17", "TH16 and TH15" or
//! "TH17, TH16 and below". Parsing extracts every `TH<number>` token and the
//! presence of the word "below"; counting is a pure function over the live
//! member list and is recomputed on every aggregation pass.

use clashdash_api::types::ClanMember;
use regex::Regex;

/// A parsed town-hall requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TownHallRule {
    /// No `TH<number>` token found; nothing is eligible.
    Empty,
    /// Exactly one level named: members at that level only.
    Exact(i64),
    /// "below" present: members at or under the highest named level.
    AtMost(i64),
    /// Several levels named without "below": the inclusive span.
    Range(i64, i64),
}

impl TownHallRule {
    /// Parses rule text. Matching is case-insensitive and tolerates
    /// arbitrary separators between tokens.
    pub fn parse(text: &str) -> Self {
        let th_re = match Regex::new(r"(?i)th\s*(\d+)") {
            Ok(re) => re,
            Err(e) => {
                tracing::error!("invalid town-hall pattern: {}", e);
                return TownHallRule::Empty;
            }
        };
        let levels: Vec<i64> = th_re
            .captures_iter(text)
            .filter_map(|cap| cap[1].parse().ok())
            .collect();

        let (Some(min), Some(max)) = (levels.iter().min(), levels.iter().max()) else {
            return TownHallRule::Empty;
        };

        if text.to_lowercase().contains("below") {
            TownHallRule::AtMost(*max)
        } else if levels.len() == 1 {
            TownHallRule::Exact(*max)
        } else {
            TownHallRule::Range(*min, *max)
        }
    }

    /// Whether a member at `level` satisfies the rule.
    pub fn matches(&self, level: i64) -> bool {
        match *self {
            TownHallRule::Empty => false,
            TownHallRule::Exact(required) => level == required,
            TownHallRule::AtMost(max) => level <= max,
            TownHallRule::Range(min, max) => (min..=max).contains(&level),
        }
    }
}

/// Counts the members of a live roster that satisfy the rule.
pub fn eligible_members(rule: &TownHallRule, members: &[ClanMember]) -> i64 {
    members
        .iter()
        .filter(|m| rule.matches(m.town_hall_level))
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(level: i64) -> ClanMember {
        ClanMember {
            tag: format!("#P{}", level),
            name: format!("th{}", level),
            role: None,
            town_hall_level: level,
            trophies: 0,
        }
    }

    fn members(levels: &[i64]) -> Vec<ClanMember> {
        levels.iter().copied().map(member).collect()
    }

    #[test]
    fn single_level_matches_exactly() {
        let rule = TownHallRule::parse("TH16");
        assert_eq!(rule, TownHallRule::Exact(16));
        let squad = members(&[17, 16, 16, 15]);
        assert_eq!(eligible_members(&rule, &squad), 2);
    }

    #[test]
    fn below_counts_at_or_under_the_max() {
        let rule = TownHallRule::parse("TH17, TH16 and below");
        assert_eq!(rule, TownHallRule::AtMost(17));
        let squad = members(&[17, 16, 15, 14]);
        assert_eq!(eligible_members(&rule, &squad), 4);
    }

    #[test]
    fn several_levels_without_below_form_an_inclusive_range() {
        let rule = TownHallRule::parse("TH15 and TH17");
        assert_eq!(rule, TownHallRule::Range(15, 17));
        let squad = members(&[17, 16, 15, 14, 12]);
        assert_eq!(eligible_members(&rule, &squad), 3);
    }

    #[test]
    fn no_levels_means_nothing_is_eligible() {
        let rule = TownHallRule::parse("max town halls only");
        assert_eq!(rule, TownHallRule::Empty);
        assert_eq!(eligible_members(&rule, &members(&[17, 16])), 0);
    }

    #[test]
    fn empty_text_means_nothing_is_eligible() {
        assert_eq!(TownHallRule::parse(""), TownHallRule::Empty);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(TownHallRule::parse("th15 And BELOW"), TownHallRule::AtMost(15));
        assert_eq!(TownHallRule::parse("Th12"), TownHallRule::Exact(12));
    }

    #[test]
    fn tolerates_space_between_th_and_number() {
        assert_eq!(TownHallRule::parse("TH 14"), TownHallRule::Exact(14));
    }

    #[test]
    fn zero_level_members_fall_under_below_rules() {
        // Members whose town-hall level was absent deserialize as 0.
        let rule = TownHallRule::parse("TH16 and below");
        assert_eq!(eligible_members(&rule, &members(&[0, 16])), 2);
    }

    #[test]
    fn counting_is_deterministic() {
        let rule = TownHallRule::parse("TH17, TH16 and below");
        let squad = members(&[17, 16, 15, 14]);
        assert_eq!(
            eligible_members(&rule, &squad),
            eligible_members(&rule, &squad)
        );
    }
}
