//! Sports-data provider client

mod api_football;

pub use api_football::ApiFootballClient;

use crate::types::{Fixture, RecentMatch};
use async_trait::async_trait;

/// Read-only fixture data source.
///
/// All methods are best-effort: a provider error or malformed response
/// yields an empty list so a flaky upstream degrades a cycle instead of
/// aborting it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Next `next` upcoming fixtures, kickoff times in `timezone`.
    async fn fetch_upcoming(&self, next: u32, timezone: &str) -> Vec<Fixture>;

    /// All currently live fixtures.
    async fn fetch_live(&self) -> Vec<Fixture>;

    /// A team's last `last` completed matches.
    async fn fetch_recent_matches(&self, team_id: u64, last: u32) -> Vec<RecentMatch>;
}
