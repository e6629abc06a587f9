//! Live in-play pressure strategy
//!
//! Watches halftime fixtures still at 0-0 where one side is generating real
//! pressure (shots and xG) and alerts when the simulated under-2.5
//! probability clears the gate, using both teams' xG as the Poisson rates.

use super::Strategy;
use crate::client::FixtureSource;
use crate::config::StrategyConfig;
use crate::error::Result;
use crate::features::{self, PressureStats};
use crate::ledger::AlertLedger;
use crate::sim::MonteCarlo;
use crate::types::{Alert, Fixture, FixtureStatus, TeamRef};
use async_trait::async_trait;
use tracing::{debug, warn};

pub struct LivePressureStrategy {
    min_shots: f64,
    min_xg: f64,
    min_probability: f64,
}

impl LivePressureStrategy {
    pub fn new(cfg: &StrategyConfig) -> Self {
        Self {
            min_shots: cfg.min_shots,
            min_xg: cfg.min_xg,
            min_probability: cfg.min_probability,
        }
    }

    fn render(
        &self,
        fixture: &Fixture,
        team: &TeamRef,
        pressure: PressureStats,
        probability: f64,
    ) -> String {
        format!(
            "<b>Strategy 2 (live pressure):</b> Under 2.5 goals\n\
             {} vs {}, 0-0 at halftime\n\
             Pressure: {} ({:.0} shots, {:.2} xG)\n\
             Under 2.5 probability: {:.1}%",
            fixture.home.name,
            fixture.away.name,
            team.name,
            pressure.shots,
            pressure.xg,
            probability * 100.0
        )
    }

    fn team_pressure(fixture: &Fixture, team_id: u64) -> PressureStats {
        fixture
            .statistics
            .iter()
            .find(|s| s.team_id == team_id)
            .map(features::pressure_stats)
            .unwrap_or(PressureStats {
                shots: 0.0,
                xg: 0.0,
            })
    }
}

#[async_trait]
impl Strategy for LivePressureStrategy {
    fn name(&self) -> &'static str {
        "live-pressure"
    }

    async fn evaluate(
        &self,
        source: &dyn FixtureSource,
        ledger: &mut AlertLedger,
        sim: &mut MonteCarlo,
    ) -> Result<Vec<Alert>> {
        let fixtures = source.fetch_live().await;
        debug!("live-pressure: {} live fixture(s)", fixtures.len());

        let mut alerts = Vec::new();
        for fixture in fixtures {
            if fixture.status != FixtureStatus::Halftime {
                continue;
            }
            let Some(score) = fixture.goals else {
                continue;
            };
            if score.home != 0 || score.away != 0 {
                continue;
            }
            if fixture.statistics.is_empty() {
                continue;
            }
            if ledger.contains(fixture.fixture_id) {
                continue;
            }

            // One alert attempt per fixture: marked before the per-team
            // gates, regardless of which team (if any) triggers below.
            ledger.mark(fixture.fixture_id);

            let home_pressure = Self::team_pressure(&fixture, fixture.home.id);
            let away_pressure = Self::team_pressure(&fixture, fixture.away.id);

            for (team, pressure) in [
                (&fixture.home, home_pressure),
                (&fixture.away, away_pressure),
            ] {
                if pressure.shots < self.min_shots || pressure.xg <= self.min_xg {
                    continue;
                }

                let result = match sim.estimate(home_pressure.xg, away_pressure.xg) {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("skipping fixture {}: {}", fixture.fixture_id, e);
                        continue;
                    }
                };

                let probability = result.under_threshold_probability;
                if probability >= self.min_probability {
                    alerts.push(Alert {
                        strategy: self.name(),
                        fixture_id: fixture.fixture_id,
                        probability,
                        text: self.render(&fixture, team, pressure, probability),
                    });
                }
            }
        }

        Ok(alerts)
    }
}
