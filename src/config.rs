//! Configuration loading
//!
//! Layered: `config.toml` (optional) overridden by `GOALWATCH_*` environment
//! variables. A `.env` file is honored for local development.

use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_football: ApiFootballConfig,
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("GOALWATCH").separator("__"))
            .build()?;

        Ok(cfg.try_deserialize()?)
    }
}

/// Sports-data provider (API-Football via RapidAPI).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiFootballConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_host")]
    pub api_host: String,
}

fn default_base_url() -> String {
    "https://api-football-v1.p.rapidapi.com/v3".to_string()
}

fn default_api_host() -> String {
    "api-football-v1.p.rapidapi.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// League ids eligible for the pre-match strategy.
    pub leagues: Vec<u64>,
    /// Number of upcoming fixtures to pull per cycle.
    pub lookahead: u32,
    /// Timezone passed to the provider for upcoming fixtures.
    pub fetch_timezone: String,
    /// Completed matches per team for the first-half average.
    pub history_matches: u32,
    /// Monte Carlo trials per estimate.
    pub trials: u32,
    /// Combined goal line the simulation tests against.
    pub goal_line: f64,
    /// Minimum under-line probability before an alert fires.
    pub min_probability: f64,
    /// Live strategy: minimum total shots for a team to count as pressuring.
    pub min_shots: f64,
    /// Live strategy: minimum expected goals for a pressuring team.
    pub min_xg: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            leagues: vec![
                39, 140, 135, 78, 61, 88, 79, 41, 40, 2, 3, 5, 7, 9, 530, 531,
            ],
            lookahead: 10,
            fetch_timezone: "UTC".to_string(),
            history_matches: 5,
            trials: 1000,
            goal_line: 2.5,
            min_probability: 0.65,
            min_shots: 5.0,
            min_xg: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// File holding the set of already-alerted fixture ids.
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: "data/alerted.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Scheduled-run window, evaluated in the configured UTC offset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// First active hour of day, inclusive.
    pub hour_start: u32,
    /// Last active hour of day, inclusive.
    pub hour_end: u32,
    /// Minutes between scheduled cycles.
    pub interval_minutes: u32,
    /// Offset from UTC in whole hours for the active window and kickoff display.
    pub utc_offset_hours: i32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour_start: 6,
            hour_end: 16,
            interval_minutes: 20,
            utc_offset_hours: -6,
        }
    }
}

impl ScheduleConfig {
    /// Whether a local hour-of-day falls in the active window (inclusive).
    pub fn contains_hour(&self, hour: u32) -> bool {
        self.hour_start <= hour && hour <= self.hour_end
    }

    pub fn offset(&self) -> chrono::FixedOffset {
        chrono::FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| chrono::FixedOffset::east_opt(0).expect("zero offset is valid"))
    }
}
