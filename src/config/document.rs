//! Raw configuration document.
//!
//! Mirrors the YAML shape the tool is driven by. Values arrive loosely
//! typed (counts as floats, unclamped targets) and are validated and
//! normalized by the resolver; nothing here is checked beyond what
//! serde enforces structurally.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Objective strategy for the soft difficulty preference.
///
/// The two styles are mutually exclusive: one model carries exactly one
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStrategy {
    /// Minimize the deviation of the selected total difficulty from
    /// `target * total`. Individual easy/hard picks may cancel out.
    #[default]
    Aggregate,
    /// Minimize the summed per-item distance from the target. Produces
    /// tighter per-item clustering at the cost of excluding some
    /// aggregate-optimal selections.
    PerItem,
}

/// Top-level configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigDocument {
    /// Per-type required counts. May be empty when running in score mode.
    #[serde(default)]
    pub question_types: Vec<QuestionTypeEntry>,

    pub difficulty: DifficultySection,

    /// Exact-total scoring mode. When present, the selection's summed
    /// effective points must equal `total` exactly.
    #[serde(default)]
    pub score: Option<ScoreSection>,

    #[serde(default)]
    pub coverage: Option<CoverageSection>,

    #[serde(default)]
    pub objective: Option<ObjectiveStrategy>,

    pub data: DataSection,

    #[serde(default)]
    pub solver: Option<SolverSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionTypeEntry {
    pub name: String,
    /// Kept as a float so non-integral inputs are detectable during
    /// validation instead of being silently truncated.
    pub count: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DifficultySection {
    pub target_average: f64,
    /// Star label -> proportion. Normalized by the resolver when the sum
    /// is not 1.
    pub bucket_constraints: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreSection {
    pub total: i64,
    /// Score assumed for records with no positive `points` value.
    #[serde(default = "default_points")]
    pub default_points: i64,
}

fn default_points() -> i64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverageSection {
    /// Lower bound on selected proof questions.
    #[serde(default)]
    pub min_proof: Option<u32>,

    /// Lower bounds on selected questions carrying given tags.
    #[serde(default)]
    pub tags: Vec<TagCoverageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagCoverageEntry {
    pub tag: String,
    pub min_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
    /// Content type -> dataset file path.
    pub paths: BTreeMap<String, PathBuf>,

    /// Per-type pool cap; 0 disables sampling.
    #[serde(default = "default_max_per_type")]
    pub max_per_type: usize,

    /// Whether a downsampled pool overwrites its source file.
    #[serde(default)]
    pub persist_sampled: bool,
}

fn default_max_per_type() -> usize {
    500
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverSection {
    /// Wall-clock budget; past it the best assignment found so far is
    /// returned as feasible.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,

    /// Seed for reproducible pool sampling.
    #[serde(default)]
    pub seed: Option<u64>,
}
