//! Core domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single scheduled or in-progress match. `fixture_id` is stable across
/// fetches and is the dedup ledger key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: u64,
    pub league_id: u64,
    pub kickoff: DateTime<Utc>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub status: FixtureStatus,
    /// Current score, present once a match has started.
    pub goals: Option<MatchGoals>,
    /// Per-team in-play statistics, present only for live fixtures.
    pub statistics: Vec<TeamStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGoals {
    pub home: u32,
    pub away: u32,
}

/// Match state derived from the provider's short status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureStatus {
    Scheduled,
    Live,
    Halftime,
    Finished,
    Other(String),
}

impl FixtureStatus {
    pub fn from_short(short: &str) -> Self {
        match short {
            "NS" | "TBD" => FixtureStatus::Scheduled,
            "1H" | "2H" | "ET" | "BT" | "P" | "LIVE" => FixtureStatus::Live,
            "HT" => FixtureStatus::Halftime,
            "FT" | "AET" | "PEN" => FixtureStatus::Finished,
            other => FixtureStatus::Other(other.to_string()),
        }
    }
}

/// One team's in-play statistics block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_id: u64,
    pub stats: Vec<StatValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub value: f64,
}

/// One completed match from a team's recent history. `goals` is absent when
/// the provider omitted goal data for the match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentMatch {
    pub fixture_id: u64,
    pub goals: Option<MatchGoals>,
}

/// Derived per-team form, ephemeral.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRecentForm {
    pub team_id: u64,
    pub avg_first_half_goals: f64,
}

/// Outcome of a Monte Carlo run, ephemeral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Fraction of trials whose combined goal count fell under the line.
    pub under_threshold_probability: f64,
}

/// A strategy's alert decision, ready for delivery.
#[derive(Debug, Clone)]
pub struct Alert {
    pub strategy: &'static str,
    pub fixture_id: u64,
    pub probability: f64,
    /// HTML-formatted message body for the notification sink.
    pub text: String,
}
