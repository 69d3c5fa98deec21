//! Question bank loading and per-type sampling.

use super::record::QuestionRecord;
use crate::config::PlanningParameters;
use crate::error::BankError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Loads every configured per-type dataset and merges them into one bank.
///
/// Pools larger than `max_per_type` are downsampled uniformly without
/// replacement; with `persist_sampled` set, the sampled pool overwrites
/// the source file. A `max_per_type` of 0 disables the cap. The merged
/// bank is checked for duplicate ids, as the model builder requires them
/// unique.
pub fn load_bank(params: &PlanningParameters) -> Result<Vec<QuestionRecord>, BankError> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut bank = Vec::new();
    for (qtype, path) in &params.dataset_paths {
        let (records, raw_n) = load_questions_by_type(
            path,
            params.max_per_type,
            params.persist_sampled,
            &mut rng,
        )?;
        if raw_n > records.len() {
            info!(r#type = %qtype, raw = raw_n, used = records.len(), "pool downsampled");
        } else {
            info!(r#type = %qtype, used = records.len(), "pool loaded");
        }
        for q in &records {
            if q.content_type != *qtype {
                warn!(
                    id = %q.id,
                    expected = %qtype,
                    actual = %q.content_type,
                    "record type differs from its dataset key"
                );
            }
        }
        bank.extend(records);
    }

    let mut seen = HashSet::new();
    for q in &bank {
        if !seen.insert(q.id.as_str()) {
            return Err(BankError::DuplicateId(q.id.clone()));
        }
    }

    info!(total = bank.len(), "question bank assembled");
    Ok(bank)
}

/// Reads a single-type dataset file, downsampling when oversized.
///
/// Returns the (possibly sampled) records and the raw pool size.
pub fn load_questions_by_type(
    path: &Path,
    max_per_type: usize,
    persist_sampled: bool,
    rng: &mut StdRng,
) -> Result<(Vec<QuestionRecord>, usize), BankError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| BankError::Io {
        path: display.clone(),
        source,
    })?;
    let mut records: Vec<QuestionRecord> =
        serde_json::from_str(&text).map_err(|source| BankError::Parse {
            path: display.clone(),
            source,
        })?;
    let raw_n = records.len();

    if max_per_type > 0 && raw_n > max_per_type {
        let picked = rand::seq::index::sample(rng, raw_n, max_per_type);
        let mut sampled = Vec::with_capacity(max_per_type);
        for i in picked.iter() {
            sampled.push(records[i].clone());
        }
        records = sampled;

        if persist_sampled {
            let json = serde_json::to_string_pretty(&records).map_err(|source| {
                BankError::Parse {
                    path: display.clone(),
                    source,
                }
            })?;
            fs::write(path, json).map_err(|source| BankError::Io {
                path: display,
                source,
            })?;
        }
    }

    Ok((records, raw_n))
}
