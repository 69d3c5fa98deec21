//! Selection statistics.

use crate::bank::QuestionRecord;
use std::collections::BTreeMap;
use std::fmt;

/// Distribution statistics over a chosen subset.
///
/// Defined for any subset including the empty one; an empty selection
/// is a symptom of a degenerate but feasible model and is reported
/// explicitly rather than crashed on (`mean_difficulty` is `None`,
/// every percentage is 0).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionStats {
    /// Number of chosen records.
    pub total: usize,
    /// Chosen count per content type.
    pub type_counts: BTreeMap<String, usize>,
    /// Chosen count per star level.
    pub difficulty_counts: BTreeMap<u8, usize>,
    /// Mean star difficulty; `None` for the empty selection.
    pub mean_difficulty: Option<f64>,
    /// Planned per-star counts from the apportionment, when known.
    pub planned_buckets: Option<BTreeMap<String, u32>>,
}

impl SelectionStats {
    pub fn from_selection(chosen: &[QuestionRecord]) -> Self {
        let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut difficulty_counts: BTreeMap<u8, usize> = BTreeMap::new();
        for q in chosen {
            *type_counts.entry(q.content_type.clone()).or_default() += 1;
            *difficulty_counts.entry(q.difficulty).or_default() += 1;
        }
        let mean_difficulty = if chosen.is_empty() {
            None
        } else {
            let sum: u32 = chosen.iter().map(|q| u32::from(q.difficulty)).sum();
            Some(f64::from(sum) / chosen.len() as f64)
        };
        Self {
            total: chosen.len(),
            type_counts,
            difficulty_counts,
            mean_difficulty,
            planned_buckets: None,
        }
    }

    /// Attaches the planned per-star distribution for display.
    pub fn with_planned_buckets(mut self, planned: BTreeMap<String, u32>) -> Self {
        self.planned_buckets = Some(planned);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Share of the selection, in [0, 1]. Zero for an empty selection.
    pub fn share(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64
        }
    }
}

impl fmt::Display for SelectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== selection summary ===")?;
        writeln!(f, "total questions: {}", self.total)?;
        if self.is_empty() {
            return writeln!(f, "selection is empty");
        }

        writeln!(f, "\n[type distribution]")?;
        for (qtype, &count) in &self.type_counts {
            writeln!(f, "{qtype}: {count} ({:.1}%)", self.share(count) * 100.0)?;
        }

        writeln!(f, "\n[difficulty distribution]")?;
        for (level, &count) in &self.difficulty_counts {
            write!(f, "{level}*: {count} ({:.1}%)", self.share(count) * 100.0)?;
            if let Some(planned) = &self.planned_buckets {
                if let Some(expected) = planned.get(&level.to_string()) {
                    write!(f, " [planned {expected}]")?;
                }
            }
            writeln!(f)?;
        }

        if let Some(mean) = self.mean_difficulty {
            writeln!(f, "\nmean difficulty: {mean:.2}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, content_type: &str, difficulty: u8) -> QuestionRecord {
        QuestionRecord {
            id: id.into(),
            content_type: content_type.into(),
            points: 0,
            difficulty,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_stats_counts_and_mean() {
        let chosen = vec![
            record("a", "single_choice", 2),
            record("b", "single_choice", 4),
            record("c", "proof", 6),
        ];
        let stats = SelectionStats::from_selection(&chosen);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.type_counts["single_choice"], 2);
        assert_eq!(stats.type_counts["proof"], 1);
        assert_eq!(stats.difficulty_counts[&4], 1);
        assert!((stats.mean_difficulty.unwrap() - 4.0).abs() < 1e-12);
        assert!((stats.share(2) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_selection_reported_not_crashed() {
        let stats = SelectionStats::from_selection(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats.mean_difficulty, None);
        assert_eq!(stats.share(0), 0.0);
        let rendered = stats.to_string();
        assert!(rendered.contains("selection is empty"));
    }

    #[test]
    fn test_display_includes_planned_buckets() {
        let chosen = vec![record("a", "t", 3), record("b", "t", 3)];
        let planned: BTreeMap<String, u32> = [("3".to_string(), 2)].into();
        let stats = SelectionStats::from_selection(&chosen).with_planned_buckets(planned);
        let rendered = stats.to_string();
        assert!(rendered.contains("3*: 2 (100.0%) [planned 2]"));
        assert!(rendered.contains("mean difficulty: 3.00"));
    }
}
