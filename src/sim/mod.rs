//! Monte Carlo under-line estimator
//!
//! Goal scoring is modeled as two independent Poisson processes with
//! per-team mean rates; repeated sampling approximates the probability that
//! the combined goal count stays under the configured line without needing
//! a closed form for the sum distribution.

use crate::error::{BotError, Result};
use crate::types::SimulationResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct MonteCarlo {
    trials: u32,
    goal_line: f64,
    rng: StdRng,
}

impl MonteCarlo {
    pub fn new(trials: u32, goal_line: f64) -> Self {
        Self {
            trials,
            goal_line,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Fixed-seed construction so tests can assert exact probabilities.
    pub fn seeded(trials: u32, goal_line: f64, seed: u64) -> Self {
        Self {
            trials,
            goal_line,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Estimate the probability that combined goals stay under the line.
    ///
    /// Zero rates are valid and yield a near-certain under. Negative or
    /// non-finite rates are rejected: they cannot come out of the feature
    /// extractor, so one showing up here means upstream data is broken.
    pub fn estimate(&mut self, home_rate: f64, away_rate: f64) -> Result<SimulationResult> {
        for rate in [home_rate, away_rate] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(BotError::InvalidRate(rate));
            }
        }

        let mut successes = 0u32;
        for _ in 0..self.trials {
            let home_goals = sample_poisson(&mut self.rng, home_rate);
            let away_goals = sample_poisson(&mut self.rng, away_rate);
            if f64::from(home_goals + away_goals) < self.goal_line {
                successes += 1;
            }
        }

        Ok(SimulationResult {
            under_threshold_probability: f64::from(successes) / f64::from(self.trials),
        })
    }
}

/// Knuth multiplication method. Fine for the small rates football produces;
/// the loop runs O(lambda) iterations.
fn sample_poisson<R: Rng>(rng: &mut R, lambda: f64) -> u32 {
    let limit = (-lambda).exp();
    let mut k = 0u32;
    let mut product: f64 = 1.0;

    loop {
        product *= rng.random::<f64>();
        if product <= limit {
            return k;
        }
        k += 1;
    }
}
