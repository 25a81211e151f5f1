//! C6: MIP Solver Adapter — tries a prioritized list of backends.

use super::builder::{Problem, Variables};
use crate::error::{FplError, Result};
use good_lp::{Solution as GoodLpSolution, SolverModel};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::solvers::highs::highs;
use good_lp::solvers::microlp::microlp;

/// Extracted variable values, independent of whichever backend produced them.
pub struct RawSolution {
    pub values: HashMap<good_lp::Variable, f64>,
}

impl RawSolution {
    pub fn value(&self, var: good_lp::Variable) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }
}

/// `good_lp`'s real, feature-gated backends, standing in for the
/// GLPK-MI → CBC → SCIP → ECOS-BB → default priority list in `spec.md` §4.6:
/// HiGHS first (fast, modern), then CBC, then the always-available pure-Rust
/// `microlp` fallback. A backend disabled by its cargo feature is simply
/// absent from this list, matching "skip any not installed".
///
/// Runs on the calling thread — synchronous and CPU-bound, so callers are
/// expected to run it via `tokio::task::spawn_blocking`. `cancel` is checked
/// between backend attempts, since none of the three backends expose a
/// preemption hook mid-solve; a caller requesting abort (e.g. an elapsed
/// `tokio::time::timeout`) sets the flag and the next attempt boundary
/// short-circuits with `FplError::Cancelled` instead of starting.
pub fn solve(problem: Problem, time_limit: Duration, cancel: Arc<AtomicBool>) -> Result<(Variables, RawSolution)> {
    let Problem {
        vars,
        handles,
        objective,
        constraints,
    } = problem;
    let all_vars = handles.all();

    if cancel.load(Ordering::Relaxed) {
        return Err(FplError::Cancelled);
    }
    if let Some(solution) = try_highs(vars.clone(), objective.clone(), &constraints, time_limit) {
        return Ok((handles, extract(solution, &all_vars)));
    }

    if cancel.load(Ordering::Relaxed) {
        return Err(FplError::Cancelled);
    }
    if let Some(solution) = try_cbc(vars.clone(), objective.clone(), &constraints) {
        return Ok((handles, extract(solution, &all_vars)));
    }

    if cancel.load(Ordering::Relaxed) {
        return Err(FplError::Cancelled);
    }
    if let Some(solution) = try_microlp(vars, objective, &constraints) {
        return Ok((handles, extract(solution, &all_vars)));
    }

    Err(FplError::SolverUnavailable {
        message: "no MIP backend produced an optimal solution".to_string(),
    })
}

fn extract(solution: impl GoodLpSolution, all_vars: &[good_lp::Variable]) -> RawSolution {
    let mut values = HashMap::new();
    for &var in all_vars {
        values.insert(var, solution.value(var));
    }
    RawSolution { values }
}

fn try_highs(
    vars: good_lp::ProblemVariables,
    objective: good_lp::Expression,
    constraints: &[good_lp::Constraint],
    time_limit: Duration,
) -> Option<impl GoodLpSolution> {
    let mut model = vars.maximise(objective).using(highs);
    model.set_time_limit(time_limit.as_secs_f64());
    for c in constraints {
        model = model.with(c.clone());
    }
    model.solve().ok()
}

fn try_cbc(
    vars: good_lp::ProblemVariables,
    objective: good_lp::Expression,
    constraints: &[good_lp::Constraint],
) -> Option<impl GoodLpSolution> {
    let mut model = vars.maximise(objective).using(coin_cbc);
    for c in constraints {
        model = model.with(c.clone());
    }
    model.solve().ok()
}

fn try_microlp(
    vars: good_lp::ProblemVariables,
    objective: good_lp::Expression,
    constraints: &[good_lp::Constraint],
) -> Option<impl GoodLpSolution> {
    let mut model = vars.maximise(objective).using(microlp);
    for c in constraints {
        model = model.with(c.clone());
    }
    model.solve().ok()
}
