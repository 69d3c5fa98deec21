//! Paper-assembly constraint model builder.
//!
//! Translates a question bank and resolved planning parameters into a
//! [`SelectionModel`](crate::solver::SelectionModel): one boolean per
//! record, quota and corridor constraints, and one of two soft
//! difficulty objectives.

mod builder;

pub use builder::{
    add_average_difficulty_objective, add_difficulty_bucket_range_constraints,
    add_difficulty_count_variables, add_per_item_difficulty_objective,
    add_proof_coverage_constraint, add_score_constraint, add_tag_coverage_constraint,
    add_type_quota_constraints, build_selection_model, declare_selection_variables, TotalTerm,
    PROOF_TYPE,
};
