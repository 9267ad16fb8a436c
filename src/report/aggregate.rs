//! Answer Aggregation
//!
//! Builds label → count distributions from a column. Cells may hold
//! comma-separated multi-select answers; every answer is normalized
//! (trimmed, lowercased, one trailing `!`, `.` or `?` removed) before
//! counting.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::types::Table;

/// Normalized label → count
pub type Distribution = BTreeMap<String, usize>;

/// Normalize one answer token
///
/// Stable on its own output unless the token ends in stacked punctuation
/// (`"wow!!"` loses one mark per call).
pub fn normalize_label(token: &str) -> String {
    let lowered = token.trim().to_lowercase();
    match lowered.strip_suffix(['!', '.', '?']) {
        Some(stripped) => stripped.trim_end().to_string(),
        None => lowered,
    }
}

/// Count normalized answers in a column over all data records
///
/// Every non-blank token is counted. A bare `"?"` lands under the empty
/// label.
pub fn aggregate(table: &Table, column: usize) -> Distribution {
    let mut distribution = Distribution::new();

    for cell in table.column(column) {
        if cell.trim().is_empty() {
            continue;
        }
        for token in cell.split(',') {
            if token.trim().is_empty() {
                continue;
            }
            *distribution.entry(normalize_label(token)).or_insert(0) += 1;
        }
    }

    distribution
}

/// Score histogram over `0..=max`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBuckets {
    pub buckets: Vec<u32>,
    pub counts: Vec<usize>,
}

/// Bucket a distribution of numeric labels
///
/// The range ends at `max_score` when given, otherwise at the largest label
/// that parses as a non-negative integer. Returns `None` when no maximum can
/// be determined, or when the range would need more than `limit` buckets.
pub fn score_buckets(
    distribution: &Distribution,
    max_score: Option<u32>,
    limit: usize,
) -> Option<ScoreBuckets> {
    let numeric: BTreeMap<u32, usize> = distribution
        .iter()
        .filter_map(|(label, count)| match label.parse::<u32>() {
            Ok(score) => Some((score, *count)),
            Err(_) => {
                debug!("Ignoring non-numeric score label '{}'", label);
                None
            }
        })
        .collect();

    let max = max_score.or_else(|| numeric.keys().next_back().copied())?;
    let needed = u64::from(max) + 1;
    if needed > limit as u64 {
        warn!(
            "Score range 0..={} needs {} buckets, limit is {}; skipping bar chart",
            max, needed, limit
        );
        return None;
    }

    let buckets: Vec<u32> = (0..=max).collect();
    let counts = buckets
        .iter()
        .map(|bucket| numeric.get(bucket).copied().unwrap_or(0))
        .collect();

    Some(ScoreBuckets { buckets, counts })
}

// =============================================================================
// Tests
// =============================================================================
