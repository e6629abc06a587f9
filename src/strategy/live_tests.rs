//! Unit tests for the live pressure strategy

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::client::MockFixtureSource;
    use crate::config::StrategyConfig;
    use crate::ledger::AlertLedger;
    use crate::sim::MonteCarlo;
    use crate::types::{
        Fixture, FixtureStatus, MatchGoals, StatValue, TeamRef, TeamStats,
    };
    use chrono::Utc;

    fn stats_block(team_id: u64, shots: f64, xg: f64) -> TeamStats {
        TeamStats {
            team_id,
            stats: vec![
                StatValue {
                    name: "Total Shots".to_string(),
                    value: shots,
                },
                StatValue {
                    name: "expected_goals".to_string(),
                    value: xg,
                },
            ],
        }
    }

    fn live_fixture(
        fixture_id: u64,
        status: FixtureStatus,
        score: (u32, u32),
        statistics: Vec<TeamStats>,
    ) -> Fixture {
        Fixture {
            fixture_id,
            league_id: 39,
            kickoff: Utc::now(),
            home: TeamRef {
                id: 10,
                name: "Alpha".to_string(),
            },
            away: TeamRef {
                id: 20,
                name: "Beta".to_string(),
            },
            status,
            goals: Some(MatchGoals {
                home: score.0,
                away: score.1,
            }),
            statistics,
        }
    }

    fn source_with(fixture: Fixture) -> MockFixtureSource {
        let mut source = MockFixtureSource::new();
        source
            .expect_fetch_live()
            .returning(move || vec![fixture.clone()]);
        source
    }

    async fn run(
        source: &MockFixtureSource,
        ledger: &mut AlertLedger,
    ) -> Vec<crate::types::Alert> {
        let cfg = StrategyConfig::default();
        let strategy = LivePressureStrategy::new(&cfg);
        let mut sim = MonteCarlo::seeded(1000, 2.5, 42);
        strategy.evaluate(source, ledger, &mut sim).await.unwrap()
    }

    #[tokio::test]
    async fn goalless_halftime_with_pressure_alerts() {
        let fixture = live_fixture(
            200,
            FixtureStatus::Halftime,
            (0, 0),
            vec![stats_block(10, 6.0, 1.0), stats_block(20, 2.0, 0.2)],
        );
        let source = source_with(fixture);
        let mut ledger = AlertLedger::in_memory();

        let alerts = run(&source, &mut ledger).await;

        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].text.contains("Alpha"));
        assert!(alerts[0].probability >= 0.65);
        assert!(ledger.contains(200));
    }

    #[tokio::test]
    async fn non_goalless_halftime_is_excluded() {
        // 1-0 at halftime is out regardless of statistics.
        let fixture = live_fixture(
            201,
            FixtureStatus::Halftime,
            (1, 0),
            vec![stats_block(10, 9.0, 2.0), stats_block(20, 8.0, 1.8)],
        );
        let source = source_with(fixture);
        let mut ledger = AlertLedger::in_memory();

        let alerts = run(&source, &mut ledger).await;

        assert!(alerts.is_empty());
        assert!(!ledger.contains(201));
    }

    #[tokio::test]
    async fn shots_below_gate_produce_no_alert_even_with_high_xg() {
        let fixture = live_fixture(
            202,
            FixtureStatus::Halftime,
            (0, 0),
            vec![stats_block(10, 4.0, 2.0), stats_block(20, 4.0, 1.9)],
        );
        let source = source_with(fixture);
        let mut ledger = AlertLedger::in_memory();

        let alerts = run(&source, &mut ledger).await;

        assert!(alerts.is_empty());
        // Marked on attempt: this halftime state got its one evaluation.
        assert!(ledger.contains(202));
    }

    #[tokio::test]
    async fn marked_fixture_is_not_reevaluated() {
        let fixture = live_fixture(
            203,
            FixtureStatus::Halftime,
            (0, 0),
            vec![stats_block(10, 6.0, 1.0), stats_block(20, 2.0, 0.2)],
        );
        let source = source_with(fixture);
        let mut ledger = AlertLedger::in_memory();

        let first = run(&source, &mut ledger).await;
        let second = run(&source, &mut ledger).await;

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn missing_statistics_block_is_excluded_and_unmarked() {
        let fixture = live_fixture(204, FixtureStatus::Halftime, (0, 0), Vec::new());
        let source = source_with(fixture);
        let mut ledger = AlertLedger::in_memory();

        let alerts = run(&source, &mut ledger).await;

        assert!(alerts.is_empty());
        // No statistics means no evaluation attempt was spent.
        assert!(!ledger.contains(204));
    }

    #[tokio::test]
    async fn in_play_but_not_halftime_is_excluded() {
        let fixture = live_fixture(
            205,
            FixtureStatus::Live,
            (0, 0),
            vec![stats_block(10, 7.0, 1.2), stats_block(20, 1.0, 0.1)],
        );
        let source = source_with(fixture);
        let mut ledger = AlertLedger::in_memory();

        let alerts = run(&source, &mut ledger).await;

        assert!(alerts.is_empty());
        assert!(!ledger.contains(205));
    }

    #[tokio::test]
    async fn nan_xg_is_skipped_without_alert() {
        // NaN defeats the xg gate comparison, so the bad value reaches the
        // simulator; the simulator rejects it and the fixture is skipped.
        let fixture = live_fixture(
            207,
            FixtureStatus::Halftime,
            (0, 0),
            vec![stats_block(10, 6.0, f64::NAN), stats_block(20, 2.0, 0.2)],
        );
        let source = source_with(fixture);
        let mut ledger = AlertLedger::in_memory();

        let alerts = run(&source, &mut ledger).await;

        assert!(alerts.is_empty());
        // The evaluation attempt was still spent.
        assert!(ledger.contains(207));
    }

    #[tokio::test]
    async fn both_teams_pressuring_alert_once_each() {
        let fixture = live_fixture(
            206,
            FixtureStatus::Halftime,
            (0, 0),
            vec![stats_block(10, 6.0, 0.9), stats_block(20, 7.0, 0.85)],
        );
        let source = source_with(fixture);
        let mut ledger = AlertLedger::in_memory();

        let alerts = run(&source, &mut ledger).await;

        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].text.contains("Alpha"));
        assert!(alerts[1].text.contains("Beta"));
    }
}
