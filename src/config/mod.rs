//! Declarative configuration and its resolution.
//!
//! A raw YAML document ([`ConfigDocument`]) is validated and normalized
//! into [`PlanningParameters`] by the [`Resolver`]. Validation is eager:
//! bad per-type counts or difficulty proportions fail at construction,
//! before any model exists.

mod document;
mod resolver;

pub use document::{
    ConfigDocument, CoverageSection, DataSection, DifficultySection, ObjectiveStrategy,
    QuestionTypeEntry, ScoreSection, SolverSection, TagCoverageEntry,
};
pub use resolver::{largest_remainder, PlanningParameters, Resolver};
