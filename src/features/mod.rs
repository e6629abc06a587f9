//! Feature extraction from raw match data
//!
//! Turns provider match records into the scalar features the strategies
//! consume: historical first-half goal averages and live pressure stats.

use crate::types::{MatchGoals, RecentMatch, TeamRecentForm, TeamStats};

pub const STAT_TOTAL_SHOTS: &str = "Total Shots";
pub const STAT_EXPECTED_GOALS: &str = "expected goals";

/// Estimated first-half goal count for one match.
///
/// The provider does not report first-half goals separately, so this
/// approximates from full-time totals: integer floor-division by two per
/// side, then summed.
pub fn first_half_goal_total(goals: &MatchGoals) -> u32 {
    goals.home / 2 + goals.away / 2
}

/// Mean of [`first_half_goal_total`] over the matches that carry goal data.
///
/// Matches without goal data are excluded from both numerator and
/// denominator. An empty or entirely goal-less list yields `0.0` — a defined
/// fallback, not an error.
pub fn average_first_half_goals(matches: &[RecentMatch]) -> f64 {
    let mut total = 0u32;
    let mut count = 0u32;

    for m in matches {
        if let Some(goals) = &m.goals {
            total += first_half_goal_total(goals);
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        f64::from(total) / f64::from(count)
    }
}

pub fn team_recent_form(team_id: u64, matches: &[RecentMatch]) -> TeamRecentForm {
    TeamRecentForm {
        team_id,
        avg_first_half_goals: average_first_half_goals(matches),
    }
}

/// In-play pressure figures for one team's statistics block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureStats {
    pub shots: f64,
    pub xg: f64,
}

pub fn pressure_stats(stats: &TeamStats) -> PressureStats {
    PressureStats {
        shots: stat_value(stats, STAT_TOTAL_SHOTS),
        xg: stat_value(stats, STAT_EXPECTED_GOALS),
    }
}

/// Look up a stat by name. Missing stats read as `0.0`.
///
/// The provider is inconsistent about casing and separators across
/// endpoints ("Expected Goals" vs "expected_goals"), so names are
/// normalized before comparison.
pub fn stat_value(stats: &TeamStats, name: &str) -> f64 {
    let want = normalize_stat_name(name);
    stats
        .stats
        .iter()
        .find(|s| normalize_stat_name(&s.name) == want)
        .map(|s| s.value)
        .unwrap_or(0.0)
}

fn normalize_stat_name(name: &str) -> String {
    name.trim().to_lowercase().replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatValue;

    fn m(home: u32, away: u32) -> RecentMatch {
        RecentMatch {
            fixture_id: 0,
            goals: Some(MatchGoals { home, away }),
        }
    }

    #[test]
    fn first_half_total_floors_per_side() {
        assert_eq!(first_half_goal_total(&MatchGoals { home: 2, away: 1 }), 1);
        assert_eq!(first_half_goal_total(&MatchGoals { home: 3, away: 3 }), 2);
        assert_eq!(first_half_goal_total(&MatchGoals { home: 0, away: 0 }), 0);
    }

    #[test]
    fn average_over_single_match() {
        assert_eq!(average_first_half_goals(&[m(2, 1)]), 1.0);
    }

    #[test]
    fn average_empty_list_is_zero() {
        assert_eq!(average_first_half_goals(&[]), 0.0);
    }

    #[test]
    fn average_skips_matches_without_goal_data() {
        let matches = vec![
            m(4, 2),
            RecentMatch {
                fixture_id: 1,
                goals: None,
            },
        ];
        // Only the 4-2 match counts: 2 + 1 = 3.
        assert_eq!(average_first_half_goals(&matches), 3.0);
    }

    #[test]
    fn average_all_missing_goal_data_is_zero() {
        let matches = vec![
            RecentMatch {
                fixture_id: 1,
                goals: None,
            },
            RecentMatch {
                fixture_id: 2,
                goals: None,
            },
        ];
        assert_eq!(average_first_half_goals(&matches), 0.0);
    }

    #[test]
    fn stat_lookup_normalizes_underscores() {
        let stats = TeamStats {
            team_id: 1,
            stats: vec![StatValue {
                name: "expected_goals".to_string(),
                value: 0.9,
            }],
        };
        assert_eq!(stat_value(&stats, STAT_EXPECTED_GOALS), 0.9);
    }

    #[test]
    fn stat_lookup_is_case_insensitive() {
        let stats = TeamStats {
            team_id: 1,
            stats: vec![
                StatValue {
                    name: "Total Shots".to_string(),
                    value: 7.0,
                },
                StatValue {
                    name: "Expected Goals".to_string(),
                    value: 1.2,
                },
            ],
        };
        let p = pressure_stats(&stats);
        assert_eq!(p.shots, 7.0);
        assert_eq!(p.xg, 1.2);
    }

    #[test]
    fn missing_stat_reads_as_zero() {
        let stats = TeamStats {
            team_id: 1,
            stats: vec![],
        };
        let p = pressure_stats(&stats);
        assert_eq!(p.shots, 0.0);
        assert_eq!(p.xg, 0.0);
    }
}
