//! Constraint model construction.
//!
//! Every operation here is a pure function of (model handle, variables,
//! records, parameters); no state is retained between calls. Which
//! operations run is decided by
//! [`build_selection_model`] from the planning parameters alone.

use crate::bank::QuestionRecord;
use crate::config::{ObjectiveStrategy, PlanningParameters};
use crate::solver::{LinearExpr, Relation, SelectionModel, VarId};
use std::collections::BTreeMap;

/// Content type that the proof-coverage constraint counts.
pub const PROOF_TYPE: &str = "proof";

/// Stand-in for the selection size in objective terms: a compile-time
/// known total (type-quota mode) or an auxiliary count variable
/// (score mode, where the selection size is itself decided).
#[derive(Debug, Clone, Copy)]
pub enum TotalTerm {
    Fixed(u32),
    Var(VarId),
}

/// Declares one boolean selection variable per record, in bank order.
pub fn declare_selection_variables(
    model: &mut SelectionModel,
    bank: &[QuestionRecord],
) -> Vec<VarId> {
    bank.iter()
        .map(|q| model.new_bool(format!("q_{}", q.id)))
        .collect()
}

/// For each content type `t` with quota `k`: exactly `k` selected
/// records of type `t`.
///
/// A quota exceeding the available pool is not detected here; it
/// surfaces as an infeasible model at solve time (for a missing type the
/// emitted constraint degenerates to the constant `0 == k`).
pub fn add_type_quota_constraints(
    model: &mut SelectionModel,
    selected: &[VarId],
    bank: &[QuestionRecord],
    type_quota: &BTreeMap<String, u32>,
) {
    for (qtype, &quota) in type_quota {
        let expr = LinearExpr::sum(
            bank.iter()
                .zip(selected)
                .filter(|(q, _)| q.content_type == *qtype)
                .map(|(_, &var)| var),
        );
        model.add(expr, Relation::Eq, i64::from(quota));
    }
}

/// The selection's summed effective points must equal the target
/// exactly, never approximately.
pub fn add_score_constraint(
    model: &mut SelectionModel,
    selected: &[VarId],
    bank: &[QuestionRecord],
    score_target: i64,
    default_points: i64,
) {
    let mut expr = LinearExpr::new();
    for (q, &var) in bank.iter().zip(selected) {
        expr = expr.term(var, q.effective_points(default_points));
    }
    model.add(expr, Relation::Eq, score_target);
}

/// At least `min_count` proof questions. Silently omitted when the bank
/// has no proof records; an empty constraint is never emitted.
pub fn add_proof_coverage_constraint(
    model: &mut SelectionModel,
    selected: &[VarId],
    bank: &[QuestionRecord],
    min_count: u32,
) {
    let expr = LinearExpr::sum(
        bank.iter()
            .zip(selected)
            .filter(|(q, _)| q.content_type == PROOF_TYPE)
            .map(|(_, &var)| var),
    );
    if expr.is_empty() {
        return;
    }
    model.add(expr, Relation::Ge, i64::from(min_count));
}

/// At least `min_count` questions carrying `tag`. Silently omitted when
/// no record carries the tag.
pub fn add_tag_coverage_constraint(
    model: &mut SelectionModel,
    selected: &[VarId],
    bank: &[QuestionRecord],
    tag: &str,
    min_count: u32,
) {
    let expr = LinearExpr::sum(
        bank.iter()
            .zip(selected)
            .filter(|(q, _)| q.has_tag(tag))
            .map(|(_, &var)| var),
    );
    if expr.is_empty() {
        return;
    }
    model.add(expr, Relation::Ge, i64::from(min_count));
}

/// One auxiliary integer per star level, pinned to the count of
/// selected records at that level. Range [0, bank size].
pub fn add_difficulty_count_variables(
    model: &mut SelectionModel,
    selected: &[VarId],
    bank: &[QuestionRecord],
) -> [VarId; 6] {
    let bank_size = bank.len() as i64;
    std::array::from_fn(|i| {
        let level = (i + 1) as u8;
        let count = model.new_int(format!("cnt_diff_{level}"), 0, bank_size);
        let expr = LinearExpr::sum(
            bank.iter()
                .zip(selected)
                .filter(|(q, _)| q.difficulty == level)
                .map(|(_, &var)| var),
        )
        .term(count, -1);
        model.add(expr, Relation::Eq, 0);
        count
    })
}

/// Keeps each difficulty band's share of the selection inside a fixed
/// corridor: easy (1-2 star) 20-40%, mid (3-4) 30-50%, hard (5-6)
/// 10-30%, expressed with x10 integer arithmetic. Hard ceilings on the
/// extreme levels (1 star at most half, 6 star at most a third of the
/// total) suppress bimodal degenerate selections.
pub fn add_difficulty_bucket_range_constraints(
    model: &mut SelectionModel,
    counts: &[VarId; 6],
    total_questions: u32,
) {
    let total = i64::from(total_questions);
    let bands: [([VarId; 2], i64, i64); 3] = [
        ([counts[0], counts[1]], 2, 4),
        ([counts[2], counts[3]], 3, 5),
        ([counts[4], counts[5]], 1, 3),
    ];
    for (band, lo_tenths, hi_tenths) in bands {
        let scaled = LinearExpr::new().term(band[0], 10).term(band[1], 10);
        model.add(scaled.clone(), Relation::Ge, total * lo_tenths);
        model.add(scaled, Relation::Le, total * hi_tenths);
    }

    model.add(counts[0].into(), Relation::Le, total / 2);
    model.add(counts[5].into(), Relation::Le, total / 3);
}

/// Soft preference: minimize `|sum(selected difficulty) - target * N|`
/// where `N` is the selection size. The deviation variable is bounded
/// from both sides and minimized; this never blocks feasibility, only
/// shapes which feasible assignment is returned.
pub fn add_average_difficulty_objective(
    model: &mut SelectionModel,
    selected: &[VarId],
    bank: &[QuestionRecord],
    target: u8,
    total: TotalTerm,
) {
    let cap = 6 * bank.len() as i64;
    let target = i64::from(target);

    let total_diff = model.new_int("total_diff", 0, cap);
    let mut sum = LinearExpr::new();
    for (q, &var) in bank.iter().zip(selected) {
        sum = sum.term(var, i64::from(q.difficulty));
    }
    model.add(sum.term(total_diff, -1), Relation::Eq, 0);

    let deviation = model.new_int("avg_dev", 0, cap);
    match total {
        TotalTerm::Fixed(n) => {
            let anchor = target * i64::from(n);
            model.add(
                LinearExpr::from(total_diff).term(deviation, -1),
                Relation::Le,
                anchor,
            );
            model.add(
                LinearExpr::new().term(total_diff, -1).term(deviation, -1),
                Relation::Le,
                -anchor,
            );
        }
        TotalTerm::Var(num_q) => {
            model.add(
                LinearExpr::from(total_diff)
                    .term(num_q, -target)
                    .term(deviation, -1),
                Relation::Le,
                0,
            );
            model.add(
                LinearExpr::new()
                    .term(total_diff, -1)
                    .term(num_q, target)
                    .term(deviation, -1),
                Relation::Le,
                0,
            );
        }
    }
    model.minimize(deviation.into());
}

/// Alternate soft preference: minimize the summed per-item distance
/// from the target, penalizing each selected item individually instead
/// of letting easy and hard picks cancel out. Mutually exclusive with
/// the aggregate objective: one model carries exactly one of the two.
pub fn add_per_item_difficulty_objective(
    model: &mut SelectionModel,
    selected: &[VarId],
    bank: &[QuestionRecord],
    target: u8,
) {
    let mut deviations = Vec::with_capacity(bank.len());
    for (q, &var) in bank.iter().zip(selected) {
        let delta = i64::from(q.difficulty) - i64::from(target);
        let dev = model.new_int(format!("dev_{}", q.id), 0, 6);
        model.add(
            LinearExpr::new().term(var, delta).term(dev, -1),
            Relation::Le,
            0,
        );
        model.add(
            LinearExpr::new().term(var, -delta).term(dev, -1),
            Relation::Le,
            0,
        );
        deviations.push(dev);
    }

    let total_dev = model.new_int("total_item_dev", 0, 6 * bank.len() as i64);
    model.add(
        LinearExpr::sum(deviations).term(total_dev, -1),
        Relation::Eq,
        0,
    );
    model.minimize(total_dev.into());
}

/// Builds the full selection model for one run.
///
/// Returns the model and the selection variables in bank order. Type
/// quotas activate the band corridors; without them (score mode) an
/// explicit `num_q` count variable stands in for the selection size,
/// as the selection is then at least one record but otherwise free.
pub fn build_selection_model(
    bank: &[QuestionRecord],
    params: &PlanningParameters,
) -> (SelectionModel, Vec<VarId>) {
    let mut model = SelectionModel::new();
    let selected = declare_selection_variables(&mut model, bank);

    if !params.type_quota.is_empty() {
        add_type_quota_constraints(&mut model, &selected, bank, &params.type_quota);
    }
    if let Some(score_target) = params.score_target {
        add_score_constraint(&mut model, &selected, bank, score_target, params.default_points);
    }
    if let Some(min_count) = params.min_proof {
        add_proof_coverage_constraint(&mut model, &selected, bank, min_count);
    }
    for (tag, min_count) in &params.tag_coverage {
        add_tag_coverage_constraint(&mut model, &selected, bank, tag, *min_count);
    }

    let total = if params.type_quota.is_empty() {
        let num_q = model.new_int("num_q", 1, bank.len() as i64);
        model.add(
            LinearExpr::sum(selected.iter().copied()).term(num_q, -1),
            Relation::Eq,
            0,
        );
        TotalTerm::Var(num_q)
    } else {
        let counts = add_difficulty_count_variables(&mut model, &selected, bank);
        add_difficulty_bucket_range_constraints(&mut model, &counts, params.total_questions);
        TotalTerm::Fixed(params.total_questions)
    };

    match params.objective {
        ObjectiveStrategy::Aggregate => {
            add_average_difficulty_objective(
                &mut model,
                &selected,
                bank,
                params.difficulty_target,
                total,
            );
        }
        ObjectiveStrategy::PerItem => {
            add_per_item_difficulty_objective(
                &mut model,
                &selected,
                bank,
                params.difficulty_target,
            );
        }
    }

    (model, selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{BranchBoundSolver, Solve, SolveStatus};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn record(id: &str, content_type: &str, difficulty: u8, points: i64) -> QuestionRecord {
        QuestionRecord {
            id: id.into(),
            content_type: content_type.into(),
            points,
            difficulty,
            tags: Vec::new(),
        }
    }

    fn params_with_quota(pairs: &[(&str, u32)]) -> PlanningParameters {
        let type_quota: BTreeMap<String, u32> =
            pairs.iter().map(|(t, k)| (t.to_string(), *k)).collect();
        let total_questions = type_quota.values().sum();
        PlanningParameters {
            type_quota,
            total_questions,
            bucket_quota: BTreeMap::new(),
            difficulty_target: 3,
            score_target: None,
            default_points: 5,
            min_proof: None,
            tag_coverage: Vec::new(),
            objective: ObjectiveStrategy::Aggregate,
            dataset_paths: BTreeMap::<String, PathBuf>::new(),
            max_per_type: 0,
            persist_sampled: false,
            time_limit: None,
            seed: None,
        }
    }

    #[test]
    fn test_selection_variables_one_per_record() {
        let bank = vec![
            record("a", "single_choice", 1, 0),
            record("b", "proof", 5, 0),
        ];
        let mut model = SelectionModel::new();
        let selected = declare_selection_variables(&mut model, &bank);
        assert_eq!(selected.len(), 2);
        assert_eq!(model.bool_var_count(), 2);
    }

    #[test]
    fn test_missing_type_quota_emits_constant_constraint() {
        // Quota on a type with no records: a constant 0 == 2 constraint
        // that the solver reports infeasible.
        let bank = vec![record("a", "single_choice", 3, 0)];
        let mut model = SelectionModel::new();
        let selected = declare_selection_variables(&mut model, &bank);
        let quota: BTreeMap<String, u32> = [("proof".to_string(), 2)].into();
        add_type_quota_constraints(&mut model, &selected, &bank, &quota);
        assert_eq!(model.constraint_count(), 1);

        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert_eq!(outcome.status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_proof_coverage_skipped_without_proof_records() {
        let bank = vec![record("a", "single_choice", 3, 0)];
        let mut model = SelectionModel::new();
        let selected = declare_selection_variables(&mut model, &bank);
        add_proof_coverage_constraint(&mut model, &selected, &bank, 1);
        assert_eq!(model.constraint_count(), 0);
    }

    #[test]
    fn test_tag_coverage_skipped_without_tagged_records() {
        let bank = vec![record("a", "single_choice", 3, 0)];
        let mut model = SelectionModel::new();
        let selected = declare_selection_variables(&mut model, &bank);
        add_tag_coverage_constraint(&mut model, &selected, &bank, "matrix", 1);
        assert_eq!(model.constraint_count(), 0);
    }

    #[test]
    fn test_difficulty_counts_match_selection() {
        let bank = vec![
            record("a", "t", 2, 0),
            record("b", "t", 2, 0),
            record("c", "t", 5, 0),
        ];
        let mut model = SelectionModel::new();
        let selected = declare_selection_variables(&mut model, &bank);
        let counts = add_difficulty_count_variables(&mut model, &selected, &bank);
        // Force everything selected.
        model.add(LinearExpr::sum(selected.clone()), Relation::Eq, 3);

        let outcome = BranchBoundSolver::new().solve(&model, None);
        assert!(outcome.is_solution());
        assert_eq!(outcome.value(counts[1]), 2); // two 2-star records
        assert_eq!(outcome.value(counts[4]), 1); // one 5-star record
        assert_eq!(outcome.value(counts[0]), 0);
    }

    #[test]
    fn test_built_model_shape_type_quota_mode() {
        let bank: Vec<QuestionRecord> = (0..6)
            .map(|i| record(&format!("q{i}"), "t", (i % 6 + 1) as u8, 0))
            .collect();
        let params = params_with_quota(&[("t", 4)]);
        let (model, selected) = build_selection_model(&bank, &params);

        assert_eq!(selected.len(), 6);
        assert!(model.validate().is_ok());
        // 6 selection bools + 6 count vars + total_diff + avg_dev.
        assert_eq!(model.var_count(), 14);
    }

    #[test]
    fn test_built_model_score_mode_uses_num_q() {
        let bank: Vec<QuestionRecord> = (0..4)
            .map(|i| record(&format!("q{i}"), "t", 3, 10))
            .collect();
        let mut params = params_with_quota(&[]);
        params.score_target = Some(20);
        let (model, _) = build_selection_model(&bank, &params);

        assert!(model.validate().is_ok());
        // 4 bools + num_q + total_diff + avg_dev.
        assert_eq!(model.var_count(), 7);
    }

    #[test]
    fn test_per_item_objective_variable_count() {
        let bank: Vec<QuestionRecord> = (0..4)
            .map(|i| record(&format!("q{i}"), "t", (i + 1) as u8, 0))
            .collect();
        let mut params = params_with_quota(&[("t", 2)]);
        params.objective = ObjectiveStrategy::PerItem;
        let (model, _) = build_selection_model(&bank, &params);

        assert!(model.validate().is_ok());
        // 4 bools + 6 counts + 4 per-item devs + total_item_dev.
        assert_eq!(model.var_count(), 15);
    }
}
