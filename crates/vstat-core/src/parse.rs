//! Lexical parsers for Russian calendar and time-of-day expressions
//!
//! All matching happens on lowercased text. The parsers are deliberately
//! permissive: day-of-month, hour and minute values are taken as written
//! ("31 февраля" and "25:70" both parse), and invalid values flow through
//! into the produced SQL uncorrected.

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::query::{MonthYear, TimeRange};

/// Genitive month forms used in `<день> <месяц> <год>` date phrasing
const GENITIVE_MONTHS: [(&str, u32); 12] = [
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
];

/// Prepositional month forms used in `в <месяце>` phrasing
const PREPOSITIONAL_MONTHS: [(&str, u32); 12] = [
    ("январе", 1),
    ("феврале", 2),
    ("марте", 3),
    ("апреле", 4),
    ("мае", 5),
    ("июне", 6),
    ("июле", 7),
    ("августе", 8),
    ("сентябре", 9),
    ("октябре", 10),
    ("ноябре", 11),
    ("декабре", 12),
];

fn month_number(word: &str) -> Option<u32> {
    GENITIVE_MONTHS
        .iter()
        .chain(PREPOSITIONAL_MONTHS.iter())
        .find(|(name, _)| *name == word)
        .map(|(_, number)| *number)
}

fn genitive_alternation() -> String {
    GENITIVE_MONTHS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join("|")
}

fn any_case_alternation() -> String {
    GENITIVE_MONTHS
        .iter()
        .chain(PREPOSITIONAL_MONTHS.iter())
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join("|")
}

/// Compiled patterns for the calendar expressions the rule matchers rely on
pub struct DateTimeParser {
    single_date: Regex,
    time_range: Regex,
    month_year: Regex,
    month_year_explicit: Regex,
    date_range: Regex,
}

impl DateTimeParser {
    pub fn new() -> Self {
        let genitive = genitive_alternation();
        let any_case = any_case_alternation();

        Self {
            single_date: Regex::new(&format!(
                r"(\d{{1,2}})\s+({genitive})\s+(\d{{4}})(?:\s+года)?"
            ))
            .unwrap(),
            time_range: Regex::new(r"с\s+(\d{1,2}):(\d{2})\s+(?:до|по)\s+(\d{1,2}):(\d{2})")
                .unwrap(),
            month_year: Regex::new(&format!(r"({any_case})\s+(\d{{4}})")).unwrap(),
            month_year_explicit: Regex::new(&format!(r"в\s+({any_case})\s+(\d{{4}})\s+года"))
                .unwrap(),
            date_range: Regex::new(&format!(
                r"с\s+(\d{{1,2}})\s+({genitive})\s+(\d{{4}})\s+по\s+(\d{{1,2}})\s+({genitive})\s+(\d{{4}})"
            ))
            .unwrap(),
        }
    }

    /// Match `<день> <месяц-родительный> <год> [года]` and return an ISO
    /// `YYYY-MM-DD` string. The day is zero-padded but not range-checked.
    pub fn parse_single_date(&self, lower: &str) -> Option<String> {
        let caps = self.single_date.captures(lower)?;
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        Some(format!("{year:04}-{month:02}-{day:02}"))
    }

    /// Match `с H:MM (до|по) H:MM`. Hours and minutes are plain integers,
    /// not validated against clock ranges.
    pub fn parse_time_range(&self, lower: &str) -> Option<TimeRange> {
        let caps = self.time_range.captures(lower)?;
        Some(TimeRange {
            start_hour: caps[1].parse().ok()?,
            start_minute: caps[2].parse().ok()?,
            end_hour: caps[3].parse().ok()?,
            end_minute: caps[4].parse().ok()?,
        })
    }

    /// Match a month name in any recognized grammatical case followed by a
    /// four-digit year.
    pub fn parse_month_year(&self, lower: &str) -> Option<MonthYear> {
        let caps = self.month_year.captures(lower)?;
        Some(MonthYear {
            month: month_number(&caps[1])?,
            year: caps[2].parse().ok()?,
        })
    }

    /// Match the explicit `в <месяце> <год> года` form that triggers the
    /// month/year aggregate rule.
    pub fn parse_month_year_explicit(&self, lower: &str) -> Option<MonthYear> {
        let caps = self.month_year_explicit.captures(lower)?;
        Some(MonthYear {
            month: month_number(&caps[1])?,
            year: caps[2].parse().ok()?,
        })
    }

    /// Match `с <дата> по <дата>` and return both endpoints as ISO dates
    pub fn parse_date_range(&self, lower: &str) -> Option<(String, String)> {
        let caps = self.date_range.captures(lower)?;
        let start_day: u32 = caps[1].parse().ok()?;
        let start_month = month_number(&caps[2])?;
        let start_year: i32 = caps[3].parse().ok()?;
        let end_day: u32 = caps[4].parse().ok()?;
        let end_month = month_number(&caps[5])?;
        let end_year: i32 = caps[6].parse().ok()?;
        Some((
            format!("{start_year:04}-{start_month:02}-{start_day:02}"),
            format!("{end_year:04}-{end_month:02}-{end_day:02}"),
        ))
    }
}

impl Default for DateTimeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a date plus a time-of-day range into a half-open datetime
/// interval `[start, end)` formatted as `YYYY-MM-DD HH:MM:SS+00:00`.
///
/// If the end time is not after the start time the end date advances by
/// exactly one calendar day, so "с 22:00 до 02:00" crosses midnight and the
/// interval is always non-empty. The offset is always stamped as UTC.
///
/// Returns `None` when the date cannot be interpreted as a real calendar
/// day; the caller falls through to the next rule in that case.
pub fn build_datetime_range(date: &str, range: &TimeRange) -> Option<(String, String)> {
    let end_date = if (range.end_hour, range.end_minute) <= (range.start_hour, range.start_minute) {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        day.checked_add_days(Days::new(1))?
            .format("%Y-%m-%d")
            .to_string()
    } else {
        date.to_string()
    };

    let start = format!(
        "{date} {:02}:{:02}:00+00:00",
        range.start_hour, range.start_minute
    );
    let end = format!(
        "{end_date} {:02}:{:02}:00+00:00",
        range.end_hour, range.end_minute
    );
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> DateTimeParser {
        DateTimeParser::new()
    }

    #[test]
    fn single_date_with_year_word() {
        assert_eq!(
            parser().parse_single_date("на сколько выросли просмотры 28 ноября 2025 года?"),
            Some("2025-11-28".to_string())
        );
    }

    #[test]
    fn single_date_pads_day() {
        assert_eq!(
            parser().parse_single_date("что было 5 мая 2024"),
            Some("2024-05-05".to_string())
        );
    }

    #[test]
    fn single_date_keeps_out_of_range_day() {
        // Permissiveness is deliberate: impossible days pass through
        assert_eq!(
            parser().parse_single_date("31 февраля 2025"),
            Some("2025-02-31".to_string())
        );
    }

    #[test]
    fn single_date_misses_without_month() {
        assert_eq!(parser().parse_single_date("сколько всего видео?"), None);
    }

    #[test]
    fn time_range_basic() {
        assert_eq!(
            parser().parse_time_range("с 10:00 до 12:30"),
            Some(TimeRange {
                start_hour: 10,
                start_minute: 0,
                end_hour: 12,
                end_minute: 30,
            })
        );
    }

    #[test]
    fn time_range_accepts_po() {
        assert!(parser().parse_time_range("с 9:15 по 11:45").is_some());
    }

    #[test]
    fn time_range_keeps_out_of_range_values() {
        let range = parser().parse_time_range("с 25:70 до 26:80").unwrap();
        assert_eq!(range.start_hour, 25);
        assert_eq!(range.start_minute, 70);
    }

    #[test]
    fn datetime_range_same_day() {
        let range = TimeRange {
            start_hour: 10,
            start_minute: 0,
            end_hour: 12,
            end_minute: 0,
        };
        let (start, end) = build_datetime_range("2025-11-28", &range).unwrap();
        assert_eq!(start, "2025-11-28 10:00:00+00:00");
        assert_eq!(end, "2025-11-28 12:00:00+00:00");
        assert!(end > start);
    }

    #[test]
    fn datetime_range_rolls_over_midnight() {
        let range = TimeRange {
            start_hour: 22,
            start_minute: 0,
            end_hour: 2,
            end_minute: 0,
        };
        let (start, end) = build_datetime_range("2025-11-28", &range).unwrap();
        assert_eq!(start, "2025-11-28 22:00:00+00:00");
        assert_eq!(end, "2025-11-29 02:00:00+00:00");
        assert!(end > start);
    }

    #[test]
    fn datetime_range_equal_endpoints_roll_over() {
        let range = TimeRange {
            start_hour: 8,
            start_minute: 30,
            end_hour: 8,
            end_minute: 30,
        };
        let (start, end) = build_datetime_range("2025-12-31", &range).unwrap();
        assert_eq!(start, "2025-12-31 08:30:00+00:00");
        assert_eq!(end, "2026-01-01 08:30:00+00:00");
    }

    #[test]
    fn month_year_genitive_and_prepositional() {
        let parsed = parser().parse_month_year("сколько видео вышло в ноябре 2025?");
        assert_eq!(
            parsed,
            Some(MonthYear {
                month: 11,
                year: 2025
            })
        );

        let parsed = parser().parse_month_year("публикации ноября 2025");
        assert_eq!(
            parsed,
            Some(MonthYear {
                month: 11,
                year: 2025
            })
        );
    }

    #[test]
    fn month_year_explicit_requires_full_form() {
        assert!(
            parser()
                .parse_month_year_explicit("сколько видео вышло в ноябре 2025 года?")
                .is_some()
        );
        assert!(
            parser()
                .parse_month_year_explicit("публикации ноября 2025")
                .is_none()
        );
    }

    #[test]
    fn date_range_two_endpoints() {
        let parsed = parser().parse_date_range("с 1 ноября 2025 по 5 ноября 2025");
        assert_eq!(
            parsed,
            Some(("2025-11-01".to_string(), "2025-11-05".to_string()))
        );
    }
}
