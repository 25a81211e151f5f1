//! Explicit, passed-in configuration for every tunable the planner uses.
//!
//! Nothing here lives behind a global/static singleton: every component that
//! needs a tunable receives a `PlannerConfig` (or a field of one) as a plain
//! argument.

use std::time::Duration;

/// Cache TTLs for each upstream resource (`spec.md` §5).
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub bootstrap: Duration,
    pub fixtures: Duration,
    pub picks: Duration,
    pub expected_points: Duration,
    pub player_lookup: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            bootstrap: Duration::from_secs(5 * 60),
            fixtures: Duration::from_secs(30 * 60),
            picks: Duration::from_secs(10 * 60),
            expected_points: Duration::from_secs(10 * 60),
            player_lookup: Duration::from_secs(10 * 60),
        }
    }
}

/// Weights and constants used by the Transfer MIP Builder's objective (`spec.md` §4.5).
#[derive(Debug, Clone, Copy)]
pub struct SolverWeights {
    /// Points deducted per paid transfer (fixed by FPL rules: 4).
    pub hit_penalty: f64,
    /// Flexibility bonus per banked free transfer above 1, applied at every
    /// step except the last.
    pub ft_flexibility_bonus: f64,
    /// Wall-clock budget given to each solver backend attempt.
    pub solver_time_limit: Duration,
}

impl Default for SolverWeights {
    fn default() -> Self {
        Self {
            hit_penalty: 4.0,
            ft_flexibility_bonus: 0.5,
            solver_time_limit: Duration::from_secs(60),
        }
    }
}

/// Top-level configuration threaded through the pipeline.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub cache_ttls: CacheTtls,
    pub solver: SolverWeights,
    /// Number of upcoming gameweeks to plan over, 1..=10.
    pub num_gameweeks: u8,
    /// Per-gameweek discount factor applied to the objective, 0.5..=1.0.
    pub discount_factor: f64,
    /// Maximum upstream HTTP retry attempts on timeout/transient failure.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub retry_base_delay: Duration,
    /// Resolves the Open Question in `spec.md` §9: whether transfers at
    /// horizon step t=0 are legal (the upcoming deadline hasn't passed) or
    /// locked (the squad at t=0 is fixed). Default `false` (locked).
    pub allow_first_week_transfers: bool,
}

impl PlannerConfig {
    pub fn new(num_gameweeks: u8, discount_factor: f64) -> Self {
        Self {
            cache_ttls: CacheTtls::default(),
            solver: SolverWeights::default(),
            num_gameweeks,
            discount_factor,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(250),
            allow_first_week_transfers: false,
        }
    }

    /// Validate the caller-supplied inputs from `spec.md` §6.
    pub fn validate(&self) -> crate::Result<()> {
        if !(1..=10).contains(&self.num_gameweeks) {
            return Err(crate::FplError::invalid_input(format!(
                "num_gameweeks must be in 1..=10, got {}",
                self.num_gameweeks
            )));
        }
        if !self.discount_factor.is_finite()
            || !(0.5..=1.0).contains(&self.discount_factor)
        {
            return Err(crate::FplError::invalid_input(format!(
                "discount_factor must be finite and in 0.5..=1.0, got {}",
                self.discount_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_horizon() {
        let cfg = PlannerConfig::new(0, 0.9);
        assert!(cfg.validate().is_err());
        let cfg = PlannerConfig::new(11, 0.9);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bad_discount_factor() {
        let cfg = PlannerConfig::new(5, 0.1);
        assert!(cfg.validate().is_err());
        let cfg = PlannerConfig::new(5, f64::NAN);
        assert!(cfg.validate().is_err());
        let cfg = PlannerConfig::new(5, 1.5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn accepts_valid_config() {
        let cfg = PlannerConfig::new(5, 0.9);
        assert!(cfg.validate().is_ok());
    }
}
