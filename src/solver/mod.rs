//! Boolean-selection constraint layer.
//!
//! Provides the modeling vocabulary for one paper-generation run
//! (boolean decision variables, auxiliary integers, linear constraints,
//! a minimization objective) and the narrow solver interface the rest
//! of the crate consumes.
//!
//! # Key Components
//!
//! - **Variables**: [`VarId`], [`Variable`] (declaration-order handles)
//! - **Model**: [`SelectionModel`], [`LinearExpr`], [`Relation`]
//! - **Solving**: [`Solve`] trait, [`SolveStatus`], [`Outcome`]
//! - **Reference solver**: [`BranchBoundSolver`]
//!
//! # Design
//!
//! The solver is treated as an oracle behind the [`Solve`] trait:
//! external engines (OR-Tools CP-SAT, CPLEX) can be wrapped without the
//! model layer changing. [`BranchBoundSolver`] is a small exact search
//! sufficient for selection models with a few hundred candidates; it is
//! not a general CP engine.

mod model;
mod solve;
mod variables;

pub use model::{LinearConstraint, LinearExpr, Relation, SelectionModel};
pub use solve::{BranchBoundSolver, Outcome, Solve, SolveStatus};
pub use variables::{VarId, Variable};
