//! Staff dashboard search and date facets.
//!
//! The filter is re-evaluated on every dashboard request against the full
//! feedback set; nothing here is cached.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::Deserialize;

use crate::models::feedback::Feedback;

/// Date facet selected through the `date` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateScope {
    /// The current local calendar day.
    Today,
    /// A rolling window covering the last seven days.
    Week,
}

impl DateScope {
    /// Unknown or empty values mean "no date facet".
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
        }
    }
}

/// Dashboard query string: `?q=<search>&date=<today|week>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl DashboardQuery {
    #[must_use]
    pub fn search_text(&self) -> &str {
        self.q.trim()
    }

    #[must_use]
    pub fn date_scope(&self) -> Option<DateScope> {
        self.date.as_deref().and_then(DateScope::parse)
    }
}

/// Applies search and date facets, newest first.
///
/// `now` carries the timezone used to find the start of "today".
#[must_use]
pub fn apply<Tz: TimeZone>(
    records: Vec<Feedback>,
    query: &DashboardQuery,
    now: &DateTime<Tz>,
) -> Vec<Feedback> {
    let needle = query.search_text().to_lowercase();
    let window = query.date_scope().map(|scope| date_window(scope, now));

    let mut matched: Vec<Feedback> = records
        .into_iter()
        .filter(|feedback| needle.is_empty() || matches_search(feedback, &needle))
        .filter(|feedback| {
            window.is_none_or(|(start, end)| {
                feedback.created_at >= start && end.is_none_or(|end| feedback.created_at < end)
            })
        })
        .collect();

    matched.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    matched
}

fn matches_search(feedback: &Feedback, needle: &str) -> bool {
    [&feedback.name, &feedback.email, &feedback.message]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Returns `[start, end)` in UTC; `end` is open for the rolling week.
///
/// "Today" runs between two local midnights, so a DST change day spans 23
/// or 25 hours.
fn date_window<Tz: TimeZone>(
    scope: DateScope,
    now: &DateTime<Tz>,
) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
    match scope {
        DateScope::Today => {
            let tz = now.timezone();
            let today = now.date_naive();
            let start = local_day_start(&tz, today).unwrap_or_else(|| {
                now.with_timezone(&Utc)
                    - Duration::seconds(i64::from(now.num_seconds_from_midnight()))
            });
            let end = today
                .succ_opt()
                .and_then(|tomorrow| local_day_start(&tz, tomorrow))
                .unwrap_or(start + Duration::hours(24));
            (start, Some(end))
        }
        DateScope::Week => (now.with_timezone(&Utc) - Duration::days(7), None),
    }
}

/// First instant of `date` in `tz`.
///
/// When midnight falls into a DST gap the day starts at the first local
/// time that exists.
fn local_day_start<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);

    (0..=12)
        .map(|quarter| midnight + Duration::minutes(15 * quarter))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedbackId;
    use chrono::{FixedOffset, MappedLocalTime, NaiveDateTime};

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    /// 2025-03-12 15:30 at UTC+2.
    fn now() -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2025, 3, 12, 15, 30, 0).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        offset()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn feedback(id: i32, name: &str, email: &str, message: &str, at: DateTime<Utc>) -> Feedback {
        Feedback {
            id: FeedbackId::new(id),
            author: None,
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            created_at: at,
        }
    }

    fn query(q: &str, date: Option<&str>) -> DashboardQuery {
        DashboardQuery {
            q: q.to_string(),
            date: date.map(str::to_string),
        }
    }

    fn ids(records: &[Feedback]) -> Vec<i32> {
        records.iter().map(|f| f.id.value()).collect()
    }

    fn dated_records() -> Vec<Feedback> {
        vec![
            feedback(1, "a", "", "today", local(2025, 3, 12, 9, 0)),
            feedback(2, "b", "", "yesterday", local(2025, 3, 11, 23, 0)),
            feedback(3, "c", "", "old", local(2025, 3, 4, 12, 0)),
        ]
    }

    #[test]
    fn today_keeps_only_the_current_local_day() {
        let result = apply(dated_records(), &query("", Some("today")), &now());
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn week_is_a_rolling_seven_day_window() {
        let result = apply(dated_records(), &query("", Some("week")), &now());
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn today_window_uses_local_midnight_not_utc() {
        // 00:30 local is still "yesterday" in UTC.
        let records = vec![
            feedback(1, "a", "", "early", local(2025, 3, 12, 0, 30)),
            feedback(2, "b", "", "late", local(2025, 3, 11, 23, 59)),
        ];
        let result = apply(records, &query("", Some("today")), &now());
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn no_facets_returns_everything_newest_first() {
        let result = apply(dated_records(), &query("", None), &now());
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn unknown_date_scope_is_ignored() {
        let result = apply(dated_records(), &query("", Some("month")), &now());
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let at = local(2025, 3, 10, 8, 0);
        let records = vec![
            feedback(1, "ALICE", "x@example.com", "hello", at),
            feedback(2, "Bob", "Alice@Example.com", "hi", at),
            feedback(3, "Carol", "carol@example.com", "ask alice about it", at),
            feedback(4, "Dave", "dave@example.com", "unrelated", at),
        ];

        let result = apply(records, &query("alice", None), &now());
        assert_eq!(ids(&result), vec![3, 2, 1]);
    }

    #[test]
    fn search_text_is_trimmed() {
        let at = local(2025, 3, 10, 8, 0);
        let records = vec![
            feedback(1, "Alice", "", "x", at),
            feedback(2, "Bob", "", "y", at),
        ];

        let result = apply(records, &query("  alice  ", None), &now());
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn search_and_date_compose_with_and() {
        let records = vec![
            feedback(1, "Alice", "", "today", local(2025, 3, 12, 9, 0)),
            feedback(2, "Alice", "", "old", local(2025, 3, 1, 9, 0)),
            feedback(3, "Bob", "", "today", local(2025, 3, 12, 10, 0)),
        ];

        let result = apply(records, &query("alice", Some("today")), &now());
        assert_eq!(ids(&result), vec![1]);
    }

    /// Central European time around the 2025 spring change: CET (+1) until
    /// 2025-03-30 01:00 UTC, CEST (+2) after. Local 02:00 to 03:00 is skipped.
    #[derive(Debug, Clone, Copy)]
    struct CentralEurope;

    impl CentralEurope {
        fn cet() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }

        fn cest() -> FixedOffset {
            FixedOffset::east_opt(2 * 3600).unwrap()
        }

        fn switch_utc() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2025, 3, 30)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        }
    }

    impl TimeZone for CentralEurope {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> MappedLocalTime<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(
            &self,
            local: &NaiveDateTime,
        ) -> MappedLocalTime<FixedOffset> {
            let gap_start = Self::switch_utc() + Duration::hours(1);
            let gap_end = Self::switch_utc() + Duration::hours(2);

            if *local < gap_start {
                MappedLocalTime::Single(Self::cet())
            } else if *local < gap_end {
                MappedLocalTime::None
            } else {
                MappedLocalTime::Single(Self::cest())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch_utc() {
                Self::cet()
            } else {
                Self::cest()
            }
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn today_on_spring_forward_day_starts_at_local_midnight() {
        // 15:00 CEST on the change day.
        let now = CentralEurope.with_ymd_and_hms(2025, 3, 30, 15, 0, 0).unwrap();
        let records = vec![
            // 23:30 CET the evening before.
            feedback(1, "a", "", "yesterday", utc(2025, 3, 29, 22, 30)),
            // 00:30 CET on the change day.
            feedback(2, "b", "", "just after midnight", utc(2025, 3, 29, 23, 30)),
            feedback(3, "c", "", "afternoon", utc(2025, 3, 30, 12, 0)),
        ];

        let result = apply(records, &query("", Some("today")), &now);
        assert_eq!(ids(&result), vec![3, 2]);
    }

    #[test]
    fn today_on_spring_forward_day_is_23_hours_long() {
        let now = CentralEurope.with_ymd_and_hms(2025, 3, 30, 9, 0, 0).unwrap();
        let (start, end) = date_window(DateScope::Today, &now);

        assert_eq!(start, utc(2025, 3, 29, 23, 0));
        assert_eq!(end, Some(utc(2025, 3, 30, 22, 0)));
    }

    #[test]
    fn day_start_skips_a_midnight_gap() {
        // Midnight itself is the missing hour here: a zone whose gap is
        // [00:00, 01:00) local on 2025-03-30.
        #[derive(Debug, Clone, Copy)]
        struct MidnightGap;

        impl TimeZone for MidnightGap {
            type Offset = FixedOffset;

            fn from_offset(_offset: &FixedOffset) -> Self {
                Self
            }

            fn offset_from_local_date(&self, local: &NaiveDate) -> MappedLocalTime<FixedOffset> {
                self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
            }

            fn offset_from_local_datetime(
                &self,
                local: &NaiveDateTime,
            ) -> MappedLocalTime<FixedOffset> {
                let day = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
                let gap_start = day.and_time(NaiveTime::MIN);
                if *local < gap_start {
                    MappedLocalTime::Single(FixedOffset::east_opt(0).unwrap())
                } else if *local < gap_start + Duration::hours(1) {
                    MappedLocalTime::None
                } else {
                    MappedLocalTime::Single(FixedOffset::east_opt(3600).unwrap())
                }
            }

            fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
                self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
            }

            fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
                let switch = NaiveDate::from_ymd_opt(2025, 3, 30)
                    .unwrap()
                    .and_time(NaiveTime::MIN);
                FixedOffset::east_opt(if *utc < switch { 0 } else { 3600 }).unwrap()
            }
        }

        let day = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        // First existing local time is 01:00 at +1, i.e. midnight UTC.
        assert_eq!(local_day_start(&MidnightGap, day), Some(utc(2025, 3, 30, 0, 0)));
    }

    #[test]
    fn date_scope_parsing() {
        assert_eq!(DateScope::parse("today"), Some(DateScope::Today));
        assert_eq!(DateScope::parse("week"), Some(DateScope::Week));
        assert_eq!(DateScope::parse(""), None);
        assert_eq!(DateScope::parse("Today"), None);
    }
}
