//! Solver interface and reference branch-and-bound implementation.

use super::model::{LinearConstraint, LinearExpr, Relation, SelectionModel};
use super::variables::VarId;
use std::time::{Duration, Instant};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// No solution found: time limit hit before any incumbent, or the
    /// model was invalid.
    Unknown,
}

/// Result of one solve call.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Solver status.
    pub status: SolveStatus,
    /// Objective value of the returned assignment, if the model had one.
    pub objective: Option<i64>,
    /// Wall-clock time spent solving.
    pub solve_time: Duration,
    values: Vec<i64>,
}

impl Outcome {
    fn no_solution(status: SolveStatus, solve_time: Duration) -> Self {
        Self {
            status,
            objective: None,
            solve_time,
            values: Vec::new(),
        }
    }

    /// Whether a usable assignment was found.
    pub fn is_solution(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Value assigned to `var`.
    ///
    /// # Panics
    ///
    /// Panics when the solve did not produce an assignment. Querying
    /// values after an `Infeasible`/`Unknown` result is a programming
    /// error, not a domain error.
    pub fn value(&self, var: VarId) -> i64 {
        assert!(
            self.is_solution(),
            "variable value queried after a solve with status {:?}",
            self.status
        );
        self.values[var.index()]
    }
}

/// Narrow interface to a combinatorial solver.
///
/// The model layer only ever needs this surface: declare variables and
/// linear constraints on a [`SelectionModel`], then hand the model to an
/// implementor. [`BranchBoundSolver`] is the bundled reference
/// implementation; wrappers around external engines (e.g. CP-SAT) plug
/// in the same way.
pub trait Solve {
    /// Solves the model, optionally within a wall-clock budget.
    ///
    /// With a time limit, the best assignment found so far is returned
    /// with status `Feasible` rather than blocking indefinitely.
    fn solve(&self, model: &SelectionModel, time_limit: Option<Duration>) -> Outcome;
}

/// Depth-first branch-and-bound over the boolean decision variables.
///
/// Interval propagation over the linear constraints prunes the search;
/// the incumbent objective gives an additional bound. Integer variables
/// are never branched on: after every boolean is fixed they settle at
/// their propagated lower bounds, which is exact for the model class the
/// builder emits (counts pinned by equalities, deviation slacks that are
/// lower-bounded and minimized).
///
/// # Limitations
///
/// A model whose integer variables are not derived this way (e.g. two
/// free integers coupled by one equality) may be reported infeasible
/// even when an assignment exists. The paper-assembly builder never
/// produces such models.
#[derive(Debug, Default)]
pub struct BranchBoundSolver;

impl BranchBoundSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solve for BranchBoundSolver {
    fn solve(&self, model: &SelectionModel, time_limit: Option<Duration>) -> Outcome {
        let started = Instant::now();
        if model.validate().is_err() {
            return Outcome::no_solution(SolveStatus::Unknown, started.elapsed());
        }

        let mut search = Search {
            model,
            deadline: time_limit.map(|l| started + l),
            best: None,
            timed_out: false,
            satisfied: false,
        };

        let mut lo: Vec<i64> = model.vars.iter().map(|v| v.lo).collect();
        let mut hi: Vec<i64> = model.vars.iter().map(|v| v.hi).collect();
        search.dfs(&mut lo, &mut hi);

        let solve_time = started.elapsed();
        match search.best {
            Some((values, objective)) => Outcome {
                status: if search.timed_out {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::Optimal
                },
                objective: model.objective.as_ref().map(|_| objective),
                solve_time,
                values,
            },
            None => Outcome::no_solution(
                if search.timed_out {
                    SolveStatus::Unknown
                } else {
                    SolveStatus::Infeasible
                },
                solve_time,
            ),
        }
    }
}

struct Search<'a> {
    model: &'a SelectionModel,
    deadline: Option<Instant>,
    best: Option<(Vec<i64>, i64)>,
    timed_out: bool,
    /// Set once a solution is found for a model with no objective; the
    /// search unwinds immediately since nothing can improve.
    satisfied: bool,
}

impl Search<'_> {
    fn dfs(&mut self, lo: &mut [i64], hi: &mut [i64]) {
        if self.satisfied {
            return;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.timed_out = true;
                return;
            }
        }
        if !propagate(&self.model.constraints, lo, hi) {
            return;
        }

        // Bound: the objective cannot beat the incumbent from here.
        if let (Some(obj), Some((_, best))) = (&self.model.objective, &self.best) {
            if expr_min(obj, lo, hi) >= *best {
                return;
            }
        }

        let branch = self
            .model
            .vars
            .iter()
            .enumerate()
            .position(|(i, v)| v.is_bool && lo[i] < hi[i]);

        match branch {
            Some(i) => {
                // Try selecting first, then not.
                for value in [1, 0] {
                    let mut lo2 = lo.to_vec();
                    let mut hi2 = hi.to_vec();
                    lo2[i] = value;
                    hi2[i] = value;
                    self.dfs(&mut lo2, &mut hi2);
                    if self.timed_out || self.satisfied {
                        return;
                    }
                }
            }
            None => self.leaf(lo, hi),
        }
    }

    /// All booleans fixed: settle remaining integers at their lower
    /// bounds, verify, and record the assignment if it improves.
    fn leaf(&mut self, lo: &[i64], hi: &[i64]) {
        debug_assert_eq!(lo.len(), hi.len());
        let values: Vec<i64> = lo.to_vec();
        for c in &self.model.constraints {
            let v = eval(&c.expr, &values);
            let ok = match c.rel {
                Relation::Eq => v == c.bound,
                Relation::Le => v <= c.bound,
                Relation::Ge => v >= c.bound,
            };
            if !ok {
                return;
            }
        }
        match &self.model.objective {
            Some(obj) => {
                let objective = eval(obj, &values);
                let better = self.best.as_ref().is_none_or(|(_, b)| objective < *b);
                if better {
                    self.best = Some((values, objective));
                }
            }
            None => {
                self.best = Some((values, 0));
                self.satisfied = true;
            }
        }
    }
}

fn eval(expr: &LinearExpr, values: &[i64]) -> i64 {
    expr.constant
        + expr
            .terms
            .iter()
            .map(|&(var, coeff)| coeff * values[var.index()])
            .sum::<i64>()
}

fn term_range(coeff: i64, lo: i64, hi: i64) -> (i64, i64) {
    let a = coeff * lo;
    let b = coeff * hi;
    (a.min(b), a.max(b))
}

fn expr_min(expr: &LinearExpr, lo: &[i64], hi: &[i64]) -> i64 {
    expr.constant
        + expr
            .terms
            .iter()
            .map(|&(var, coeff)| term_range(coeff, lo[var.index()], hi[var.index()]).0)
            .sum::<i64>()
}

fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) == (b < 0) {
        q + 1
    } else {
        q
    }
}

/// Interval propagation to fixpoint. Returns `false` on conflict.
fn propagate(constraints: &[LinearConstraint], lo: &mut [i64], hi: &mut [i64]) -> bool {
    loop {
        let mut changed = false;
        for c in constraints {
            let (mut sum_min, mut sum_max) = (c.expr.constant, c.expr.constant);
            for &(var, coeff) in &c.expr.terms {
                let (a, b) = term_range(coeff, lo[var.index()], hi[var.index()]);
                sum_min += a;
                sum_max += b;
            }
            let need_le = matches!(c.rel, Relation::Le | Relation::Eq);
            let need_ge = matches!(c.rel, Relation::Ge | Relation::Eq);
            if (need_le && sum_min > c.bound) || (need_ge && sum_max < c.bound) {
                return false;
            }

            for &(var, coeff) in &c.expr.terms {
                let i = var.index();
                let (tmin, tmax) = term_range(coeff, lo[i], hi[i]);
                if need_le {
                    // coeff * x <= bound - (sum_min - tmin)
                    let rhs = c.bound - (sum_min - tmin);
                    if coeff > 0 {
                        let cap = div_floor(rhs, coeff);
                        if cap < hi[i] {
                            hi[i] = cap;
                            changed = true;
                        }
                    } else {
                        let floor = div_ceil(rhs, coeff);
                        if floor > lo[i] {
                            lo[i] = floor;
                            changed = true;
                        }
                    }
                }
                if need_ge {
                    // coeff * x >= bound - (sum_max - tmax)
                    let rhs = c.bound - (sum_max - tmax);
                    if coeff > 0 {
                        let floor = div_ceil(rhs, coeff);
                        if floor > lo[i] {
                            lo[i] = floor;
                            changed = true;
                        }
                    } else {
                        let cap = div_floor(rhs, coeff);
                        if cap < hi[i] {
                            hi[i] = cap;
                            changed = true;
                        }
                    }
                }
                if lo[i] > hi[i] {
                    return false;
                }
            }
        }
        if !changed {
            return true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasibility_only() {
        // x + y == 1 over two booleans.
        let mut model = SelectionModel::new();
        let x = model.new_bool("x");
        let y = model.new_bool("y");
        model.add(LinearExpr::sum([x, y]), Relation::Eq, 1);

        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.value(x) + outcome.value(y), 1);
        assert!(outcome.objective.is_none());
    }

    #[test]
    fn test_infeasible() {
        let mut model = SelectionModel::new();
        let x = model.new_bool("x");
        let y = model.new_bool("y");
        model.add(LinearExpr::sum([x, y]), Relation::Eq, 3);

        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert_eq!(outcome.status, SolveStatus::Infeasible);
    }

    #[test]
    #[should_panic(expected = "variable value queried")]
    fn test_value_after_infeasible_panics() {
        let mut model = SelectionModel::new();
        let x = model.new_bool("x");
        model.add(x.into(), Relation::Ge, 2);

        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        let _ = outcome.value(x);
    }

    #[test]
    fn test_minimize_selected_weight() {
        // Pick exactly two of four items, minimizing total weight.
        let mut model = SelectionModel::new();
        let weights = [7i64, 2, 5, 3];
        let vars: Vec<VarId> = (0..4).map(|i| model.new_bool(format!("q_{i}"))).collect();
        model.add(LinearExpr::sum(vars.iter().copied()), Relation::Eq, 2);
        let mut total = LinearExpr::new();
        for (v, w) in vars.iter().zip(weights) {
            total = total.term(*v, w);
        }
        model.minimize(total);

        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.objective, Some(5)); // items of weight 2 and 3
        assert_eq!(outcome.value(vars[1]), 1);
        assert_eq!(outcome.value(vars[3]), 1);
    }

    #[test]
    fn test_derived_count_variable() {
        // cnt == x + y + z, cnt >= 2, minimize cnt.
        let mut model = SelectionModel::new();
        let xs: Vec<VarId> = (0..3).map(|i| model.new_bool(format!("x{i}"))).collect();
        let cnt = model.new_int("cnt", 0, 3);
        model.add(LinearExpr::sum(xs.clone()).term(cnt, -1), Relation::Eq, 0);
        model.add(cnt.into(), Relation::Ge, 2);
        model.minimize(cnt.into());

        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.objective, Some(2));
        assert_eq!(outcome.value(cnt), 2);
    }

    #[test]
    fn test_deviation_slack_settles_at_lower_bound() {
        // dev >= t - 4 and dev >= 4 - t with t == x0 + 2*x1 + 3*x2,
        // exactly two selected. Best: x0 + x2 gives t = 4, dev = 0.
        let mut model = SelectionModel::new();
        let xs: Vec<VarId> = (0..3).map(|i| model.new_bool(format!("x{i}"))).collect();
        let t = model.new_int("t", 0, 6);
        model.add(
            LinearExpr::new()
                .term(xs[0], 1)
                .term(xs[1], 2)
                .term(xs[2], 3)
                .term(t, -1),
            Relation::Eq,
            0,
        );
        model.add(LinearExpr::sum(xs.clone()), Relation::Eq, 2);
        let dev = model.new_int("dev", 0, 6);
        model.add(LinearExpr::from(t).term(dev, -1), Relation::Le, 4);
        model.add(LinearExpr::new().term(t, -1).term(dev, -1), Relation::Le, -4);
        model.minimize(dev.into());

        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.objective, Some(0));
        assert_eq!(outcome.value(t), 4);
    }

    #[test]
    fn test_determinism() {
        let build = || {
            let mut model = SelectionModel::new();
            let vars: Vec<VarId> = (0..6).map(|i| model.new_bool(format!("q_{i}"))).collect();
            model.add(LinearExpr::sum(vars.iter().copied()), Relation::Eq, 3);
            let mut w = LinearExpr::new();
            for (i, v) in vars.iter().enumerate() {
                w = w.term(*v, i as i64 + 1);
            }
            model.minimize(w);
            model
        };
        let a = BranchBoundSolver::new().solve(&build(), None);
        let b = BranchBoundSolver::new().solve(&build(), None);
        assert_eq!(a.objective, b.objective);
        assert_eq!(a.status, b.status);
    }

    #[test]
    fn test_invalid_model_is_unknown() {
        let mut model = SelectionModel::new();
        model.new_int("bad", 2, 1);
        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert_eq!(outcome.status, SolveStatus::Unknown);
    }

    #[test]
    fn test_div_helpers() {
        assert_eq!(div_floor(7, 2), 3);
        assert_eq!(div_floor(-7, 2), -4);
        assert_eq!(div_ceil(7, 2), 4);
        assert_eq!(div_ceil(-7, 2), -3);
        assert_eq!(div_floor(-7, -2), 3);
        assert_eq!(div_ceil(-7, -2), 4);
    }
}
