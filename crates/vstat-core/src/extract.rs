//! Entity extractors: creator identifiers, view thresholds, metric keywords

use regex::Regex;

use crate::query::Metric;

/// Metric keyword stems checked in priority order; the first matching stem
/// wins regardless of where it appears in the text.
const METRIC_STEMS: [(&str, Metric); 5] = [
    ("просмотр", Metric::Views),
    ("лайк", Metric::Likes),
    ("комментар", Metric::Comments),
    ("жалоб", Metric::Reports),
    ("репорт", Metric::Reports),
];

/// Compiled patterns for the entities interpolated into generated SQL.
///
/// Only substrings vetted here ever reach a SQL string, which is the whole
/// injection defense: a creator token must match `[a-f0-9]{32}` exactly and
/// a threshold is a parsed integer.
pub struct EntityExtractor {
    creator_id: Regex,
    threshold: Regex,
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self {
            // The "id" keyword matches case-insensitively but the token
            // class stays strictly lowercase hex
            creator_id: Regex::new(r"(?i:id)\s+([a-f0-9]{32})\b").unwrap(),
            threshold: Regex::new(r"больше\s+([\d][\d\s]*)\s*просмотров").unwrap(),
        }
    }

    /// Extract a creator identifier: exactly 32 lowercase hex characters
    /// after the word "id". Partial or near matches are rejected.
    pub fn extract_creator_id(&self, text: &str) -> Option<String> {
        let caps = self.creator_id.captures(text)?;
        Some(caps[1].to_string())
    }

    /// Extract `больше <число> просмотров`. Spaces inside the digit run are
    /// thousands separators and are stripped ("100 000" -> 100000).
    pub fn extract_view_threshold(&self, lower: &str) -> Option<i64> {
        let caps = self.threshold.captures(lower)?;
        let digits: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan for metric keyword stems in priority order, then fall back to
/// explicit suffix checks, then to `default`.
pub fn detect_metric_column(lower: &str, default: Metric) -> Metric {
    for (stem, metric) in METRIC_STEMS {
        if lower.contains(stem) {
            return metric;
        }
    }
    if lower.contains("лайков") {
        Metric::Likes
    } else if lower.contains("комментар") {
        Metric::Comments
    } else if lower.contains("жалоб") {
        Metric::Reports
    } else if lower.contains("репорт") {
        Metric::Reports
    } else {
        default
    }
}

/// Like [`detect_metric_column`] but reports a miss instead of defaulting
pub fn detect_metric(lower: &str) -> Option<Metric> {
    for (stem, metric) in METRIC_STEMS {
        if lower.contains(stem) {
            return Some(metric);
        }
    }
    None
}
