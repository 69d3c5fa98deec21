//! Run orchestration: configuration to solved paper.

mod runner;

pub use runner::{generate_paper, paper_generation, PaperResult};
