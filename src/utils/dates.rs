use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

/// Number of working days covered by a week window (Monday to Friday).
pub const WORK_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekDirection {
    Previous,
    Next,
    Current,
}

/// Inclusive date range sent to the KPI endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

/// Monday-anchored five day window identified by its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// Window of the week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        Self {
            start: date - Duration::days(offset),
        }
    }

    /// The default window: the week before the one containing `today`.
    ///
    /// The backend refuses ranges ending less than three days ago, so the
    /// current calendar week is never requested by default.
    pub fn default_for(today: NaiveDate) -> Self {
        Self::containing(today - Duration::days(7))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(WORK_DAYS - 1)
    }

    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start: self.start + Duration::days(days),
        }
    }

    pub fn previous(&self) -> Self {
        self.shifted(-7)
    }

    pub fn next(&self) -> Self {
        self.shifted(7)
    }

    /// Monday 00:00:00Z through Friday 23:59:59Z.
    pub fn range(&self) -> DateRange {
        let start = Utc.from_utc_datetime(&self.start.and_time(NaiveTime::MIN));
        let end_time = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        let end = Utc.from_utc_datetime(&self.end().and_time(end_time));

        DateRange {
            start_date: format_iso(start),
            end_date: format_iso(end),
        }
    }
}

pub fn format_iso(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}
