//! Constraint-based exam paper assembly.
//!
//! Selects a subset of a question bank so the subset satisfies a
//! declarative set of quotas and optimizes closeness to a target average
//! difficulty. The pipeline:
//!
//! - **[`config`]**: parses and validates the YAML configuration:
//!   per-type quotas, difficulty proportions (allocated by
//!   largest-remainder apportionment), sourcing parameters.
//! - **[`bank`]**: the question record schema and per-type dataset
//!   loading with optional pool sampling.
//! - **[`model`]**: translates bank + parameters into a selection model:
//!   one boolean per record, quota/corridor constraints, one of two soft
//!   difficulty objectives.
//! - **[`solver`]**: the modeling vocabulary and the narrow solver
//!   interface; ships a reference branch-and-bound solver, external
//!   engines plug in behind the same trait.
//! - **[`report`]**: distribution statistics over the chosen subset.
//! - **[`engine`]**: sequences the above and maps solver outcomes to
//!   domain-level success or failure.
//!
//! # Architecture
//!
//! Each `paper_generation` call builds an independent model, solves it,
//! and discards it; there is no shared solver state and no incremental
//! constraint retraction. Configuration problems fail at resolution time; quota
//! conflicts are only discoverable at solve time and surface as
//! [`error::PaperError::NoFeasibleSolution`].

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod report;
pub mod solver;
