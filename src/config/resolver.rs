//! Configuration resolution.
//!
//! Turns a raw [`ConfigDocument`] into validated, normalized
//! [`PlanningParameters`]. All validation runs eagerly at construction
//! so malformed configuration fails before any model is built.

use super::document::{ConfigDocument, ObjectiveStrategy, QuestionTypeEntry};
use crate::error::ConfigError;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Normalized planning parameters for one paper-generation run.
///
/// Which constraints the model builder activates is a property of these
/// parameters, not of the call site: an empty `type_quota` means score
/// mode, a present `score_target` adds the exact-total constraint, and
/// so on.
#[derive(Debug, Clone)]
pub struct PlanningParameters {
    /// Content type -> required selected count. Empty in score mode.
    pub type_quota: BTreeMap<String, u32>,

    /// Sum of the type quotas.
    pub total_questions: u32,

    /// Star label -> apportioned count, summing to `total_questions`.
    ///
    /// This is the planned distribution surfaced by the reporter; the
    /// model enforces band corridors, not per-star quotas.
    pub bucket_quota: BTreeMap<String, u32>,

    /// Soft preference center, 1..=6.
    pub difficulty_target: u8,

    /// Exact required total of effective points, when in score mode.
    pub score_target: Option<i64>,

    /// Score assumed for records without a positive `points` value.
    pub default_points: i64,

    /// Lower bound on selected proof questions.
    pub min_proof: Option<u32>,

    /// (tag, minimum selected count) coverage bounds.
    pub tag_coverage: Vec<(String, u32)>,

    pub objective: ObjectiveStrategy,

    /// Content type -> dataset file path.
    pub dataset_paths: BTreeMap<String, PathBuf>,

    /// Per-type pool cap; 0 disables sampling.
    pub max_per_type: usize,

    /// Whether downsampled pools overwrite their source files.
    pub persist_sampled: bool,

    /// Solve budget; `None` blocks until exhaustion.
    pub time_limit: Option<Duration>,

    /// Seed for reproducible sampling.
    pub seed: Option<u64>,
}

/// Validated view over a configuration document.
///
/// Construction runs every check (per-type counts, difficulty
/// proportions, the apportionment itself), so a `Resolver` that exists
/// is known good.
#[derive(Debug)]
pub struct Resolver {
    document: ConfigDocument,
    type_quota: BTreeMap<String, u32>,
    total_questions: u32,
    bucket_quota: BTreeMap<String, u32>,
}

impl Resolver {
    /// Reads and resolves a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_document(serde_yaml::from_str(&text)?)
    }

    /// Resolves an already-parsed document.
    pub fn from_document(document: ConfigDocument) -> Result<Self, ConfigError> {
        let type_quota = resolve_type_quota(&document.question_types)?;
        let total_questions = type_quota.values().sum();
        let bucket_quota = largest_remainder(
            &document.difficulty.bucket_constraints,
            total_questions,
        )?;

        debug!(?type_quota, total_questions, ?bucket_quota, "configuration resolved");

        Ok(Self {
            document,
            type_quota,
            total_questions,
            bucket_quota,
        })
    }

    pub fn type_quota(&self) -> &BTreeMap<String, u32> {
        &self.type_quota
    }

    /// Sum of the per-type counts, computed once at construction.
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    pub fn bucket_quota(&self) -> &BTreeMap<String, u32> {
        &self.bucket_quota
    }

    /// Target average difficulty, truncated to an integer and clamped
    /// into [1, 6]. Out-of-range inputs are silently clamped, not
    /// rejected.
    pub fn difficulty_target(&self) -> u8 {
        (self.document.difficulty.target_average as i64).clamp(1, 6) as u8
    }

    /// Consumes the resolver into immutable planning parameters.
    pub fn into_parameters(self) -> PlanningParameters {
        let difficulty_target = self.difficulty_target();
        let doc = self.document;
        let (score_target, default_points) = match &doc.score {
            Some(s) => (Some(s.total), s.default_points),
            None => (None, 5),
        };
        let (min_proof, tag_coverage) = match doc.coverage {
            Some(c) => (
                c.min_proof,
                c.tags.into_iter().map(|t| (t.tag, t.min_count)).collect(),
            ),
            None => (None, Vec::new()),
        };
        let (time_limit, seed) = match &doc.solver {
            Some(s) => (s.time_limit_secs.map(Duration::from_secs), s.seed),
            None => (None, None),
        };

        PlanningParameters {
            type_quota: self.type_quota,
            total_questions: self.total_questions,
            bucket_quota: self.bucket_quota,
            difficulty_target,
            score_target,
            default_points,
            min_proof,
            tag_coverage,
            objective: doc.objective.unwrap_or_default(),
            dataset_paths: doc.data.paths,
            max_per_type: doc.data.max_per_type,
            persist_sampled: doc.data.persist_sampled,
            time_limit,
            seed,
        }
    }
}

fn resolve_type_quota(
    entries: &[QuestionTypeEntry],
) -> Result<BTreeMap<String, u32>, ConfigError> {
    let mut quota = BTreeMap::new();
    for entry in entries {
        if entry.count < 0.0 || entry.count.floor() != entry.count {
            return Err(ConfigError::InvalidQuestionTypeNumber {
                qtype: entry.name.clone(),
                value: entry.count,
            });
        }
        quota.insert(entry.name.clone(), entry.count as u32);
    }
    Ok(quota)
}

/// Largest-remainder apportionment of `total` across buckets.
///
/// Proportions are validated (no negatives, positive sum) and
/// normalized when their sum differs from 1 by more than 1e-6. Each
/// bucket gets the floor of its exact share; the leftover units go to
/// the buckets with the largest fractional remainders, ties broken by
/// the stable sort over label order. The returned counts always sum
/// exactly to `total`.
pub fn largest_remainder(
    proportions: &BTreeMap<String, f64>,
    total: u32,
) -> Result<BTreeMap<String, u32>, ConfigError> {
    for (label, &p) in proportions {
        if p < 0.0 {
            return Err(ConfigError::InvalidConstraint(format!(
                "negative proportion for bucket `{label}`: {p}"
            )));
        }
    }

    let sum: f64 = proportions.values().sum();
    if sum <= 0.0 {
        return Err(ConfigError::InvalidConstraint(
            "proportions must sum to a positive value".into(),
        ));
    }

    let scale = if (sum - 1.0).abs() > 1e-6 { sum } else { 1.0 };

    let mut counts = BTreeMap::new();
    let mut remainders: Vec<(&str, f64)> = Vec::with_capacity(proportions.len());
    for (label, &p) in proportions {
        let exact = p / scale * f64::from(total);
        let base = exact.floor();
        counts.insert(label.clone(), base as u32);
        remainders.push((label.as_str(), exact - base));
    }

    let assigned: u32 = counts.values().sum();
    let deficit = total.saturating_sub(assigned) as usize;
    remainders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    for i in 0..deficit {
        let label = remainders[i % remainders.len()].0;
        if let Some(count) = counts.get_mut(label) {
            *count += 1;
        }
    }

    Ok(counts)
}
