//! Ordered pattern-to-SQL rule table
//!
//! Each rule is a `(predicate, builder)` pair over an already-parsed query;
//! the first rule that produces SQL wins. Priority is visible as data in
//! [`rule_table`], not buried in control flow. The same table serves both
//! the pre-LLM stage and the post-LLM fallback stage: a rule tagged
//! `in_fallback` is re-applied after a failed LLM call, while the
//! creator-scoped date/time sub-rules run in the primary stage only.

use crate::extract::{EntityExtractor, detect_metric, detect_metric_column};
use crate::parse::{DateTimeParser, build_datetime_range};
use crate::query::{Metric, ParsedQuery};

/// Known questions mapped directly to precomputed SQL. Matched first as a
/// case-insensitive substring of the canonical question inside the user
/// text, short-circuiting every other stage.
const KNOWN_QUERIES: [(&str, &str); 4] = [
    (
        "сколько всего видео есть в системе?",
        "SELECT COUNT(*) FROM videos",
    ),
    (
        "сколько видео набрало больше 100 000 просмотров?",
        "SELECT COUNT(*) FROM videos WHERE views_count > 100000",
    ),
    (
        "на сколько просмотров в сумме выросли все видео 28 ноября 2025?",
        "SELECT SUM(delta_views_count) FROM video_snapshots WHERE DATE(created_at) = '2025-11-28'",
    ),
    (
        "сколько разных видео получали новые просмотры 27 ноября 2025?",
        "SELECT COUNT(DISTINCT video_id) FROM video_snapshots WHERE DATE(created_at) = '2025-11-27' AND delta_views_count > 0",
    ),
];

/// Default view threshold for the distinct-creator rule when the question
/// implies one but the digits are not captured
const DEFAULT_VIEW_THRESHOLD: i64 = 100_000;

/// Which orchestrator stage a rule application serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Before the LLM is tried
    Primary,
    /// After the LLM failed or was unavailable
    Fallback,
}

/// One guarded SQL builder in the ordered table
pub struct Rule {
    pub name: &'static str,
    /// Whether the rule is re-applied in the post-LLM fallback stage
    pub in_fallback: bool,
    pub build: fn(&ParsedQuery) -> Option<String>,
}

/// The rule table in priority order; first satisfied rule wins
fn rule_table() -> Vec<Rule> {
    vec![
        Rule {
            name: "negative-delta-snapshots",
            in_fallback: true,
            build: negative_delta,
        },
        Rule {
            name: "month-year-aggregate",
            in_fallback: true,
            build: month_year_aggregate,
        },
        Rule {
            name: "distinct-creators-over-threshold",
            in_fallback: true,
            build: distinct_creators,
        },
        Rule {
            name: "creator-calendar-days",
            in_fallback: false,
            build: creator_calendar_days,
        },
        Rule {
            name: "creator-time-window-delta",
            in_fallback: false,
            build: creator_time_window,
        },
        Rule {
            name: "creator-date-range",
            in_fallback: false,
            build: creator_date_range,
        },
        Rule {
            name: "creator-video-count",
            in_fallback: true,
            build: creator_video_count,
        },
    ]
}

fn contains_any(lower: &str, words: &[&str]) -> bool {
    words.iter().any(|word| lower.contains(word))
}

/// Count snapshot rows with a negative view delta
fn negative_delta(q: &ParsedQuery) -> Option<String> {
    let negative = contains_any(&q.lower, &["отрицательным", "отрицательное"]);
    let snapshot = contains_any(&q.lower, &["замер", "снапшот", "статистик"]);
    if negative && snapshot && q.lower.contains("просмотр") {
        Some("SELECT COUNT(*) FROM video_snapshots WHERE delta_views_count < 0".to_string())
    } else {
        None
    }
}

/// Sum of final view counts or count of videos created in an explicitly
/// phrased month/year ("в ноябре 2025 года")
fn month_year_aggregate(q: &ParsedQuery) -> Option<String> {
    let my = q.month_year_explicit?;
    let filter = format!(
        "EXTRACT(YEAR FROM video_created_at) = {} AND EXTRACT(MONTH FROM video_created_at) = {}",
        my.year, my.month
    );
    if contains_any(&q.lower, &["суммарное", "сумма", "сумму"]) {
        Some(format!(
            "SELECT COALESCE(SUM(views_count), 0) FROM videos WHERE {filter}"
        ))
    } else if q.lower.contains("сколько") {
        Some(format!("SELECT COUNT(*) FROM videos WHERE {filter}"))
    } else {
        None
    }
}

/// Distinct creators whose videos exceeded a view threshold
fn distinct_creators(q: &ParsedQuery) -> Option<String> {
    if q.lower.contains("креатор") && q.lower.contains("разных") && q.lower.contains("просмотр") {
        let threshold = q.threshold.unwrap_or(DEFAULT_VIEW_THRESHOLD);
        Some(format!(
            "SELECT COUNT(DISTINCT creator_id) FROM videos WHERE views_count > {threshold}"
        ))
    } else {
        None
    }
}

/// Distinct calendar days on which a creator published within a month/year
fn creator_calendar_days(q: &ParsedQuery) -> Option<String> {
    let creator_id = q.creator_id.as_deref()?;
    let my = q.month_year?;
    if q.lower.contains("календар") && contains_any(&q.lower, &["дня", "дней", "днях"]) {
        Some(format!(
            "SELECT COUNT(DISTINCT DATE(video_created_at)) FROM videos \
             WHERE creator_id = '{creator_id}' \
             AND EXTRACT(YEAR FROM video_created_at) = {} \
             AND EXTRACT(MONTH FROM video_created_at) = {}",
            my.year, my.month
        ))
    } else {
        None
    }
}

/// Null-safe summed delta over a half-open datetime window for one creator
fn creator_time_window(q: &ParsedQuery) -> Option<String> {
    let creator_id = q.creator_id.as_deref()?;
    let date = q.date.as_deref()?;
    let range = q.time_range.as_ref()?;
    let mentions_growth =
        q.metric.is_some() || contains_any(&q.lower, &["прирост", "вырос", "рост"]);
    if !mentions_growth {
        return None;
    }
    let (start, end) = build_datetime_range(date, range)?;
    let column = detect_metric_column(&q.lower, Metric::Views).delta_column();
    Some(format!(
        "SELECT COALESCE(SUM(s.{column}), 0) FROM video_snapshots s \
         JOIN videos v ON s.video_id = v.id \
         WHERE v.creator_id = '{creator_id}' \
         AND s.created_at >= '{start}' AND s.created_at < '{end}'"
    ))
}

/// Count of a creator's videos published between two dates, inclusive of
/// the whole end day. The `<= end 23:59:59` boundary is intentionally
/// inclusive, unlike the half-open time-window interval.
fn creator_date_range(q: &ParsedQuery) -> Option<String> {
    let creator_id = q.creator_id.as_deref()?;
    let (start, end) = q.date_range.as_ref()?;
    Some(format!(
        "SELECT COUNT(*) FROM videos WHERE creator_id = '{creator_id}' \
         AND video_created_at >= '{start}' AND video_created_at <= '{end} 23:59:59'"
    ))
}

/// Count of a creator's videos, optionally filtered by a view threshold.
/// Terminal default within the creator branch.
fn creator_video_count(q: &ParsedQuery) -> Option<String> {
    let creator_id = q.creator_id.as_deref()?;
    Some(match q.threshold {
        Some(threshold) => format!(
            "SELECT COUNT(*) FROM videos WHERE creator_id = '{creator_id}' AND views_count > {threshold}"
        ),
        None => format!("SELECT COUNT(*) FROM videos WHERE creator_id = '{creator_id}'"),
    })
}

/// Parsers, extractors and the ordered rule table for one process lifetime.
/// Read-only after construction; safe to share across requests.
pub struct RuleSet {
    dates: DateTimeParser,
    entities: EntityExtractor,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            dates: DateTimeParser::new(),
            entities: EntityExtractor::new(),
            rules: rule_table(),
        }
    }

    /// Exact known-question lookup: case-insensitive substring match of a
    /// canonical question inside the user text
    pub fn known_query(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        KNOWN_QUERIES
            .iter()
            .find(|(question, _)| lower.contains(question))
            .map(|(_, sql)| sql.to_string())
    }

    /// Run every lexical parser and entity extractor once over the text
    pub fn parse(&self, text: &str) -> ParsedQuery {
        let lower = text.to_lowercase();
        ParsedQuery {
            date: self.dates.parse_single_date(&lower),
            time_range: self.dates.parse_time_range(&lower),
            // The id keyword is case-insensitive but the token itself must
            // be lowercase hex, so this runs over the original text
            creator_id: self.entities.extract_creator_id(text),
            threshold: self.entities.extract_view_threshold(&lower),
            metric: detect_metric(&lower),
            month_year: self.dates.parse_month_year(&lower),
            month_year_explicit: self.dates.parse_month_year_explicit(&lower),
            date_range: self.dates.parse_date_range(&lower),
            text: text.to_string(),
            lower,
        }
    }

    /// Apply the rule table in priority order for the given stage
    pub fn apply(&self, stage: Stage, query: &ParsedQuery) -> Option<String> {
        for rule in &self.rules {
            if stage == Stage::Fallback && !rule.in_fallback {
                continue;
            }
            if let Some(sql) = (rule.build)(query) {
                tracing::debug!(rule = rule.name, sql = %sql, "rule matched");
                return Some(sql);
            }
        }
        None
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    const CREATOR: &str = "0a1b2c3d4e5f60718293a4b5c6d7e8f9";

    fn sql_for(text: &str) -> Option<String> {
        let rules = RuleSet::new();
        rules.apply(Stage::Primary, &rules.parse(text))
    }

    #[test]
    fn known_query_exact_lookup() {
        let rules = RuleSet::new();
        assert_eq!(
            rules.known_query("Сколько всего видео есть в системе?"),
            Some("SELECT COUNT(*) FROM videos".to_string())
        );
        // Substring match inside a longer message, case-insensitive
        assert_eq!(
            rules.known_query("Привет! СКОЛЬКО ВСЕГО ВИДЕО ЕСТЬ В СИСТЕМЕ?"),
            Some("SELECT COUNT(*) FROM videos".to_string())
        );
        assert_eq!(rules.known_query("Сколько видео у креатора?"), None);
    }

    #[test]
    fn negative_delta_rule() {
        let sql = sql_for("Сколько замеров статистики с отрицательным приростом просмотров?");
        assert_eq!(
            sql,
            Some("SELECT COUNT(*) FROM video_snapshots WHERE delta_views_count < 0".to_string())
        );
    }

    #[test]
    fn month_year_count_rule() {
        let sql = sql_for("Сколько видео вышло в ноябре 2025 года?").unwrap();
        assert_snapshot!(
            sql,
            @"SELECT COUNT(*) FROM videos WHERE EXTRACT(YEAR FROM video_created_at) = 2025 AND EXTRACT(MONTH FROM video_created_at) = 11"
        );
    }

    #[test]
    fn month_year_sum_rule() {
        let sql = sql_for("Какое суммарное количество просмотров у видео в ноябре 2025 года?").unwrap();
        assert_snapshot!(
            sql,
            @"SELECT COALESCE(SUM(views_count), 0) FROM videos WHERE EXTRACT(YEAR FROM video_created_at) = 2025 AND EXTRACT(MONTH FROM video_created_at) = 11"
        );
    }

    #[test]
    fn distinct_creators_default_threshold() {
        let sql = sql_for("Сколько разных креаторов имеют видео с большим числом просмотров?");
        assert_eq!(
            sql,
            Some(
                "SELECT COUNT(DISTINCT creator_id) FROM videos WHERE views_count > 100000"
                    .to_string()
            )
        );
    }

    #[test]
    fn distinct_creators_extracted_threshold() {
        let sql =
            sql_for("Сколько разных креаторов набрали больше 500 просмотров?");
        assert_eq!(
            sql,
            Some("SELECT COUNT(DISTINCT creator_id) FROM videos WHERE views_count > 500".to_string())
        );
    }

    #[test]
    fn creator_calendar_days_rule() {
        let text = format!(
            "В скольких календарных днях ноября 2025 выходили видео у креатора с id {CREATOR}?"
        );
        let sql = sql_for(&text).unwrap();
        assert!(sql.starts_with("SELECT COUNT(DISTINCT DATE(video_created_at)) FROM videos"));
        assert!(sql.contains(&format!("creator_id = '{CREATOR}'")));
        assert!(sql.contains("EXTRACT(YEAR FROM video_created_at) = 2025"));
        assert!(sql.contains("EXTRACT(MONTH FROM video_created_at) = 11"));
    }

    #[test]
    fn creator_time_window_half_open() {
        let text = format!(
            "На сколько выросли просмотры у креатора с id {CREATOR} 28 ноября 2025 с 10:00 до 12:00?"
        );
        let sql = sql_for(&text).unwrap();
        assert!(sql.starts_with("SELECT COALESCE(SUM(s.delta_views_count), 0)"));
        assert!(sql.contains("s.created_at >= '2025-11-28 10:00:00+00:00'"));
        // End boundary is exclusive
        assert!(sql.contains("s.created_at < '2025-11-28 12:00:00+00:00'"));
    }

    #[test]
    fn creator_time_window_crosses_midnight() {
        let text = format!(
            "На сколько выросли просмотры у креатора с id {CREATOR} 28 ноября 2025 с 22:00 до 02:00?"
        );
        let sql = sql_for(&text).unwrap();
        assert!(sql.contains(">= '2025-11-28 22:00:00+00:00'"));
        assert!(sql.contains("< '2025-11-29 02:00:00+00:00'"));
    }

    #[test]
    fn creator_time_window_metric_selection() {
        let text = format!(
            "На сколько лайков вырос креатор с id {CREATOR} 28 ноября 2025 с 10:00 до 12:00?"
        );
        let sql = sql_for(&text).unwrap();
        assert!(sql.contains("SUM(s.delta_likes_count)"));
    }

    #[test]
    fn creator_time_window_defaults_to_views() {
        // Growth wording without any metric stem selects the view deltas
        let text = format!(
            "На сколько вырос креатор с id {CREATOR} 28 ноября 2025 с 10:00 до 12:00?"
        );
        let sql = sql_for(&text).unwrap();
        assert!(sql.contains("SUM(s.delta_views_count)"));
    }

    #[test]
    fn creator_time_window_reports_metric() {
        let text = format!(
            "На сколько жалоб вырос креатор с id {CREATOR} 28 ноября 2025 с 10:00 до 12:00?"
        );
        let sql = sql_for(&text).unwrap();
        assert!(sql.contains("SUM(s.delta_reports_count)"));
    }

    #[test]
    fn creator_date_range_inclusive_end() {
        let text = format!(
            "Сколько видео у креатора с id {CREATOR} вышло с 1 ноября 2025 по 5 ноября 2025?"
        );
        let sql = sql_for(&text).unwrap();
        assert_eq!(
            sql,
            format!(
                "SELECT COUNT(*) FROM videos WHERE creator_id = '{CREATOR}' \
                 AND video_created_at >= '2025-11-01' AND video_created_at <= '2025-11-05 23:59:59'"
            )
        );
    }

    #[test]
    fn creator_threshold_count() {
        let text = format!("Сколько видео креатора с id {CREATOR} набрали больше 1 000 просмотров?");
        let sql = sql_for(&text).unwrap();
        assert_eq!(
            sql,
            format!(
                "SELECT COUNT(*) FROM videos WHERE creator_id = '{CREATOR}' AND views_count > 1000"
            )
        );
    }

    #[test]
    fn creator_plain_count_is_terminal_default() {
        let text = format!("Сколько видео у креатора с id {CREATOR}?");
        let sql = sql_for(&text).unwrap();
        assert_eq!(
            sql,
            format!("SELECT COUNT(*) FROM videos WHERE creator_id = '{CREATOR}'")
        );
    }

    #[test]
    fn fallback_stage_skips_date_time_sub_rules() {
        let rules = RuleSet::new();
        let text = format!(
            "Сколько видео у креатора с id {CREATOR} вышло с 1 ноября 2025 по 5 ноября 2025?"
        );
        let parsed = rules.parse(&text);
        // Primary stage picks the date-range rule
        let primary = rules.apply(Stage::Primary, &parsed).unwrap();
        assert!(primary.contains("video_created_at >="));
        // Fallback stage degrades to the plain creator count
        let fallback = rules.apply(Stage::Fallback, &parsed).unwrap();
        assert_eq!(
            fallback,
            format!("SELECT COUNT(*) FROM videos WHERE creator_id = '{CREATOR}'")
        );
    }

    #[test]
    fn unrecognized_question_matches_nothing() {
        assert_eq!(sql_for("Какая сегодня погода?"), None);
    }
}
