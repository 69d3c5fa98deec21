//! Question record schema.

use serde::{Deserialize, Deserializer, Serialize};

/// One question as loaded from a bank file.
///
/// Records are immutable, externally supplied data. The canonical
/// difficulty representation is the integer star scale 1..=6; legacy
/// datasets that stored a continuous difficulty in (0, 1] are converted
/// once here, at the deserialization boundary, never at constraint
/// sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Unique identifier within the loaded bank. Numeric ids in the
    /// source data are accepted and stringified.
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    /// Question kind (e.g. `single_choice`, `fill_blank`, `proof`).
    pub content_type: String,

    /// Score value. Zero or negative means "use the configured default".
    #[serde(default)]
    pub points: i64,

    /// Star difficulty in 1..=6.
    #[serde(deserialize_with = "de_difficulty")]
    pub difficulty: u8,

    /// Topic labels, used by optional coverage constraints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl QuestionRecord {
    /// Score value used by the score-total constraint.
    pub fn effective_points(&self, default_points: i64) -> i64 {
        if self.points > 0 {
            self.points
        } else {
            default_points
        }
    }

    /// Whether the record carries the given topic label.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(i64),
    Text(String),
}

fn de_id<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(de)? {
        RawId::Num(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn de_difficulty<'de, D: Deserializer<'de>>(de: D) -> Result<u8, D::Error> {
    star_from_raw(f64::deserialize(de)?).map_err(serde::de::Error::custom)
}

/// Maps a raw difficulty value to the 1..=6 star scale.
///
/// Integer values 1..=6 pass through. A fractional value in (0, 1] is
/// legacy continuous-scale data and is quantized as `ceil(f * 6)`, a
/// lossy but deterministic conversion applied exactly once.
fn star_from_raw(raw: f64) -> Result<u8, String> {
    if raw.fract() == 0.0 && (1.0..=6.0).contains(&raw) {
        return Ok(raw as u8);
    }
    if raw > 0.0 && raw <= 1.0 {
        return Ok(((raw * 6.0).ceil() as u8).clamp(1, 6));
    }
    Err(format!("difficulty {raw} is outside the 1..=6 star scale"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<QuestionRecord, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_basic_record() {
        let q = parse(
            r#"{"id": "q-17", "content_type": "proof", "points": 10,
                "difficulty": 4, "tags": ["matrix"]}"#,
        )
        .unwrap();
        assert_eq!(q.id, "q-17");
        assert_eq!(q.difficulty, 4);
        assert_eq!(q.effective_points(5), 10);
        assert!(q.has_tag("matrix"));
        assert!(!q.has_tag("calculus"));
    }

    #[test]
    fn test_numeric_id_stringified() {
        let q = parse(r#"{"id": 42, "content_type": "fill_blank", "difficulty": 2}"#).unwrap();
        assert_eq!(q.id, "42");
        assert!(q.tags.is_empty());
    }

    #[test]
    fn test_missing_points_uses_default() {
        let q = parse(r#"{"id": 1, "content_type": "single_choice", "difficulty": 3}"#).unwrap();
        assert_eq!(q.points, 0);
        assert_eq!(q.effective_points(5), 5);
    }

    #[test]
    fn test_legacy_float_difficulty() {
        // Continuous-scale values quantize to stars: ceil(f * 6).
        for (raw, star) in [(0.05, 1), (0.3, 2), (0.5, 3), (0.62, 4), (0.75, 5), (0.99, 6)] {
            let q = parse(&format!(
                r#"{{"id": 1, "content_type": "proof", "difficulty": {raw}}}"#
            ))
            .unwrap();
            assert_eq!(q.difficulty, star, "raw {raw}");
        }
        // Integral 1.0 is a star rating, not legacy data.
        let q = parse(r#"{"id": 1, "content_type": "proof", "difficulty": 1.0}"#).unwrap();
        assert_eq!(q.difficulty, 1);
    }

    #[test]
    fn test_out_of_range_difficulty_rejected() {
        for raw in ["0", "7", "-1", "3.5"] {
            assert!(
                parse(&format!(
                    r#"{{"id": 1, "content_type": "proof", "difficulty": {raw}}}"#
                ))
                .is_err(),
                "difficulty {raw} should be rejected"
            );
        }
    }
}
