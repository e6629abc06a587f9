//! Pre-match statistical strategy
//!
//! Scans upcoming fixtures in the allowed leagues, derives each team's
//! average first-half goal count from recent history, and alerts when the
//! simulated under-2.5 probability clears the gate.

use super::Strategy;
use crate::client::FixtureSource;
use crate::config::StrategyConfig;
use crate::error::Result;
use crate::features;
use crate::ledger::AlertLedger;
use crate::sim::MonteCarlo;
use crate::types::{Alert, Fixture, TeamRecentForm};
use async_trait::async_trait;
use chrono::FixedOffset;
use std::collections::HashSet;
use tracing::{debug, warn};

pub struct PrematchStrategy {
    leagues: HashSet<u64>,
    lookahead: u32,
    fetch_timezone: String,
    history_matches: u32,
    min_probability: f64,
    display_offset: FixedOffset,
}

impl PrematchStrategy {
    pub fn new(cfg: &StrategyConfig, utc_offset_hours: i32) -> Self {
        Self {
            leagues: cfg.leagues.iter().copied().collect(),
            lookahead: cfg.lookahead,
            fetch_timezone: cfg.fetch_timezone.clone(),
            history_matches: cfg.history_matches,
            min_probability: cfg.min_probability,
            display_offset: FixedOffset::east_opt(utc_offset_hours * 3600)
                .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid")),
        }
    }

    fn render(
        &self,
        fixture: &Fixture,
        home: &TeamRecentForm,
        away: &TeamRecentForm,
        probability: f64,
    ) -> String {
        let kickoff = fixture.kickoff.with_timezone(&self.display_offset);
        format!(
            "<b>Strategy 1 (Monte Carlo):</b> Under 2.5 in the 1st half\n\
             {} vs {}\n\
             Time: {}\n\
             Averages: {:.2} / {:.2}\n\
             Under 2.5 probability: {:.1}%",
            fixture.home.name,
            fixture.away.name,
            kickoff.format("%H:%M"),
            home.avg_first_half_goals,
            away.avg_first_half_goals,
            probability * 100.0
        )
    }
}

#[async_trait]
impl Strategy for PrematchStrategy {
    fn name(&self) -> &'static str {
        "prematch"
    }

    async fn evaluate(
        &self,
        source: &dyn FixtureSource,
        ledger: &mut AlertLedger,
        sim: &mut MonteCarlo,
    ) -> Result<Vec<Alert>> {
        let fixtures = source
            .fetch_upcoming(self.lookahead, &self.fetch_timezone)
            .await;
        debug!("prematch: {} upcoming fixture(s)", fixtures.len());

        let mut alerts = Vec::new();
        for fixture in fixtures {
            if !self.leagues.contains(&fixture.league_id) {
                continue;
            }
            if ledger.contains(fixture.fixture_id) {
                continue;
            }

            // Both histories fetched concurrently; the ledger is only
            // touched after fetch and compute succeed for this fixture.
            let (home_hist, away_hist) = tokio::join!(
                source.fetch_recent_matches(fixture.home.id, self.history_matches),
                source.fetch_recent_matches(fixture.away.id, self.history_matches),
            );

            let home_form = features::team_recent_form(fixture.home.id, &home_hist);
            let away_form = features::team_recent_form(fixture.away.id, &away_hist);

            let result = match sim.estimate(
                home_form.avg_first_half_goals,
                away_form.avg_first_half_goals,
            ) {
                Ok(r) => r,
                Err(e) => {
                    warn!("skipping fixture {}: {}", fixture.fixture_id, e);
                    continue;
                }
            };

            let probability = result.under_threshold_probability;
            if probability >= self.min_probability {
                ledger.mark(fixture.fixture_id);
                alerts.push(Alert {
                    strategy: self.name(),
                    fixture_id: fixture.fixture_id,
                    probability,
                    text: self.render(&fixture, &home_form, &away_form, probability),
                });
            }
        }

        Ok(alerts)
    }
}
