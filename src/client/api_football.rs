//! API-Football (RapidAPI) client
//!
//! Fetches fixture lists and per-team match history. The provider is rate
//! limited and occasionally returns partial objects, so every field parses
//! with a safe default and failures degrade to empty lists.

use super::FixtureSource;
use crate::config::ApiFootballConfig;
use crate::error::Result;
use crate::types::{
    Fixture, FixtureStatus, MatchGoals, RecentMatch, StatValue, TeamRef, TeamStats,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

#[derive(Clone)]
pub struct ApiFootballClient {
    http: Client,
    base_url: String,
    api_host: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    response: Vec<RawFixture>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawFixture {
    fixture: Option<RawFixtureMeta>,
    league: Option<RawLeague>,
    teams: Option<RawTeams>,
    goals: Option<RawGoals>,
    #[serde(default)]
    statistics: Vec<RawTeamStats>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawFixtureMeta {
    id: Option<u64>,
    timestamp: Option<i64>,
    status: Option<RawStatus>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawStatus {
    short: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawLeague {
    id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTeams {
    home: Option<RawTeam>,
    away: Option<RawTeam>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTeam {
    id: Option<u64>,
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawGoals {
    home: Option<u32>,
    away: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTeamStats {
    team: Option<RawTeam>,
    #[serde(default)]
    statistics: Vec<RawStat>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawStat {
    #[serde(rename = "type")]
    name: String,
    value: Option<serde_json::Value>,
}

impl ApiFootballClient {
    pub fn new(cfg: &ApiFootballConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_host: cfg.api_host.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    async fn get_fixtures(&self, query: &[(&str, String)]) -> Vec<RawFixture> {
        let url = format!("{}/fixtures", self.base_url);
        let resp = self
            .http
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .query(query)
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                warn!("fixture fetch failed: {}", e);
                return Vec::new();
            }
        };

        match resp.json::<ApiResponse>().await {
            Ok(body) => body.response,
            Err(e) => {
                warn!("fixture response unparseable: {}", e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl FixtureSource for ApiFootballClient {
    async fn fetch_upcoming(&self, next: u32, timezone: &str) -> Vec<Fixture> {
        self.get_fixtures(&[
            ("next", next.to_string()),
            ("timezone", timezone.to_string()),
        ])
        .await
        .into_iter()
        .filter_map(parse_fixture)
        .collect()
    }

    async fn fetch_live(&self) -> Vec<Fixture> {
        self.get_fixtures(&[("live", "all".to_string())])
            .await
            .into_iter()
            .filter_map(parse_fixture)
            .collect()
    }

    async fn fetch_recent_matches(&self, team_id: u64, last: u32) -> Vec<RecentMatch> {
        self.get_fixtures(&[("team", team_id.to_string()), ("last", last.to_string())])
            .await
            .into_iter()
            .filter_map(|raw| {
                let fixture_id = raw.fixture.as_ref()?.id?;
                Some(RecentMatch {
                    fixture_id,
                    goals: parse_goals(raw.goals.as_ref()),
                })
            })
            .collect()
    }
}

fn parse_fixture(raw: RawFixture) -> Option<Fixture> {
    let meta = raw.fixture?;
    let fixture_id = meta.id?;

    let kickoff = meta
        .timestamp
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        .unwrap_or(DateTime::UNIX_EPOCH);

    let status = meta
        .status
        .and_then(|s| s.short)
        .map(|s| FixtureStatus::from_short(&s))
        .unwrap_or(FixtureStatus::Other(String::new()));

    let (home, away) = match raw.teams {
        Some(teams) => (parse_team(teams.home), parse_team(teams.away)),
        None => (parse_team(None), parse_team(None)),
    };

    Some(Fixture {
        fixture_id,
        league_id: raw.league.and_then(|l| l.id).unwrap_or(0),
        kickoff,
        home,
        away,
        status,
        goals: parse_goals(raw.goals.as_ref()),
        statistics: raw.statistics.into_iter().map(parse_team_stats).collect(),
    })
}

fn parse_team(raw: Option<RawTeam>) -> TeamRef {
    let raw = raw.unwrap_or(RawTeam {
        id: None,
        name: None,
    });
    TeamRef {
        id: raw.id.unwrap_or(0),
        name: raw.name.unwrap_or_default(),
    }
}

/// Goal data counts as present only when both sides report a number.
fn parse_goals(raw: Option<&RawGoals>) -> Option<MatchGoals> {
    let raw = raw?;
    Some(MatchGoals {
        home: raw.home?,
        away: raw.away?,
    })
}

fn parse_team_stats(raw: RawTeamStats) -> TeamStats {
    TeamStats {
        team_id: raw.team.and_then(|t| t.id).unwrap_or(0),
        stats: raw
            .statistics
            .into_iter()
            .map(|s| StatValue {
                value: parse_stat_value(s.value.as_ref()),
                name: s.name,
            })
            .collect(),
    }
}

/// Stat values arrive as numbers, numeric strings, percentages, or null.
fn parse_stat_value(value: Option<&serde_json::Value>) -> f64 {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => {
            s.trim().trim_end_matches('%').parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "fixture": {"id": 1001, "timestamp": 1700000000, "status": {"short": "HT"}},
        "league": {"id": 39},
        "teams": {
            "home": {"id": 33, "name": "Alpha"},
            "away": {"id": 34, "name": "Beta"}
        },
        "goals": {"home": 0, "away": 0},
        "statistics": [
            {"team": {"id": 33}, "statistics": [
                {"type": "Total Shots", "value": 6},
                {"type": "expected_goals", "value": "1.15"}
            ]},
            {"team": {"id": 34}, "statistics": [
                {"type": "Total Shots", "value": null},
                {"type": "Ball Possession", "value": "42%"}
            ]}
        ]
    }"#;

    #[test]
    fn parses_full_live_fixture() {
        let raw: RawFixture = serde_json::from_str(SAMPLE).unwrap();
        let fixture = parse_fixture(raw).unwrap();

        assert_eq!(fixture.fixture_id, 1001);
        assert_eq!(fixture.league_id, 39);
        assert_eq!(fixture.status, FixtureStatus::Halftime);
        assert_eq!(fixture.home.name, "Alpha");
        assert_eq!(fixture.goals, Some(MatchGoals { home: 0, away: 0 }));

        assert_eq!(fixture.statistics.len(), 2);
        assert_eq!(fixture.statistics[0].team_id, 33);
        assert_eq!(fixture.statistics[0].stats[0].value, 6.0);
        assert_eq!(fixture.statistics[0].stats[1].value, 1.15);
        // null and percent values read as numbers
        assert_eq!(fixture.statistics[1].stats[0].value, 0.0);
        assert_eq!(fixture.statistics[1].stats[1].value, 42.0);
    }

    #[test]
    fn fixture_without_id_is_dropped() {
        let raw: RawFixture = serde_json::from_str(r#"{"fixture": {}}"#).unwrap();
        assert!(parse_fixture(raw).is_none());
    }

    #[test]
    fn missing_fields_default_safely() {
        let raw: RawFixture = serde_json::from_str(r#"{"fixture": {"id": 5}}"#).unwrap();
        let fixture = parse_fixture(raw).unwrap();
        assert_eq!(fixture.league_id, 0);
        assert_eq!(fixture.home.id, 0);
        assert!(fixture.goals.is_none());
        assert!(fixture.statistics.is_empty());
    }

    #[test]
    fn null_sided_goals_count_as_absent() {
        let raw: RawFixture = serde_json::from_str(
            r#"{"fixture": {"id": 6}, "goals": {"home": 2, "away": null}}"#,
        )
        .unwrap();
        let fixture = parse_fixture(raw).unwrap();
        assert!(fixture.goals.is_none());
    }
}
