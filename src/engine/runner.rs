//! Paper-generation orchestration.

use crate::bank::{load_bank, QuestionRecord};
use crate::config::{PlanningParameters, Resolver};
use crate::error::PaperError;
use crate::model::build_selection_model;
use crate::report::SelectionStats;
use crate::solver::{BranchBoundSolver, Solve, SolveStatus};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Outcome of one successful paper-generation run.
#[derive(Debug, Clone)]
pub struct PaperResult {
    /// The chosen records, in bank order.
    pub chosen: Vec<QuestionRecord>,
    pub stats: SelectionStats,
    /// `Optimal` or `Feasible` (a time-limited solve may stop early).
    pub status: SolveStatus,
    /// Final objective value, when the model carried one.
    pub objective: Option<i64>,
    pub solve_time: Duration,
}

/// Builds and solves the selection model for an already-loaded bank.
///
/// The model lives only for this call; re-solving with different
/// parameters means rebuilding from scratch. `Infeasible` and `Unknown`
/// both map to [`PaperError::NoFeasibleSolution`]; the builder never
/// raises on conflicting quotas, conflicts are discovered here.
pub fn generate_paper<S: Solve>(
    params: &PlanningParameters,
    bank: &[QuestionRecord],
    solver: &S,
) -> Result<PaperResult, PaperError> {
    let (model, selected) = build_selection_model(bank, params);
    debug!(
        vars = model.var_count(),
        constraints = model.constraint_count(),
        "selection model built"
    );

    let outcome = solver.solve(&model, params.time_limit);
    info!(
        status = ?outcome.status,
        objective = ?outcome.objective,
        solve_time_ms = outcome.solve_time.as_millis() as u64,
        "solve finished"
    );

    if !outcome.is_solution() {
        return Err(PaperError::NoFeasibleSolution {
            status: outcome.status,
        });
    }

    let chosen: Vec<QuestionRecord> = bank
        .iter()
        .zip(&selected)
        .filter(|(_, &var)| outcome.value(var) == 1)
        .map(|(q, _)| q.clone())
        .collect();

    let stats = SelectionStats::from_selection(&chosen)
        .with_planned_buckets(params.bucket_quota.clone());

    Ok(PaperResult {
        chosen,
        stats,
        status: outcome.status,
        objective: outcome.objective,
        solve_time: outcome.solve_time,
    })
}

/// One-call entry point: resolve configuration, load the bank, solve
/// with the bundled solver.
pub fn paper_generation(config_path: impl AsRef<Path>) -> Result<PaperResult, PaperError> {
    let resolver = Resolver::from_path(config_path)?;
    let params = resolver.into_parameters();
    let bank = load_bank(&params)?;
    generate_paper(&params, &bank, &BranchBoundSolver::new())
}
