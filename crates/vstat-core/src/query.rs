//! Value objects produced by parsing one user question

/// Metric selected by keyword detection.
///
/// The rule matchers only ever aggregate the per-snapshot delta columns, so
/// the column name accessor maps straight to those.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Views,
    Likes,
    Comments,
    Reports,
}

impl Metric {
    /// Delta column in `video_snapshots` recording the hourly increment
    pub fn delta_column(self) -> &'static str {
        match self {
            Metric::Views => "delta_views_count",
            Metric::Likes => "delta_likes_count",
            Metric::Comments => "delta_comments_count",
            Metric::Reports => "delta_reports_count",
        }
    }
}

/// Time-of-day range `с H:MM до H:MM`.
///
/// Hours and minutes are kept exactly as written; values like `25:70` are
/// not rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start_hour: u32,
    pub start_minute: u32,
    pub end_hour: u32,
    pub end_minute: u32,
}

/// Resolved month/year reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

/// Everything the lexical parsers and entity extractors recognized in one
/// question. All fields are optional; `None` means "not mentioned".
///
/// Nothing is inferred beyond what the text states. The metric defaults to
/// view deltas at the rule site, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    /// Original question text
    pub text: String,
    /// Lowercased text used for keyword checks
    pub lower: String,
    /// Single calendar date, ISO `YYYY-MM-DD`. Not range-validated: a
    /// syntactically valid "31 февраля" passes through uncorrected.
    pub date: Option<String>,
    pub time_range: Option<TimeRange>,
    /// Creator identifier, a vetted 32-character lowercase hex token
    pub creator_id: Option<String>,
    /// Numeric view threshold with thousands separators stripped
    pub threshold: Option<i64>,
    /// Metric detected from keyword stems, if any matched
    pub metric: Option<Metric>,
    /// Month/year in any recognized grammatical form
    pub month_year: Option<MonthYear>,
    /// Month/year matched in the explicit `в <месяц> <год> года` form
    pub month_year_explicit: Option<MonthYear>,
    /// Date range `с <дата> по <дата>` as two ISO dates
    pub date_range: Option<(String, String)>,
}
