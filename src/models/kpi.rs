use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Metrics the dashboard can display, keyed by their frontend names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiMetric {
    WorkingTimeIndividual,
    IndividualPause,
    WorkingTimeTeam,
    PresenceRate,
}

impl KpiMetric {
    pub const ALL: [KpiMetric; 4] = [
        KpiMetric::WorkingTimeIndividual,
        KpiMetric::IndividualPause,
        KpiMetric::WorkingTimeTeam,
        KpiMetric::PresenceRate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KpiMetric::WorkingTimeIndividual => "workingTimeIndividual",
            KpiMetric::IndividualPause => "individualPause",
            KpiMetric::WorkingTimeTeam => "workingTimeTeam",
            KpiMetric::PresenceRate => "presenceRate",
        }
    }
}

impl fmt::Display for KpiMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KpiMetric {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        KpiMetric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == value)
            .ok_or_else(|| AppError::validation(format!("unknown KPI {value}")))
    }
}

/// `GET kpi/average-break-time/{user}/{start}/{end}`; minutes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndividualPause {
    #[serde(default)]
    pub average_break_time: f64,
    pub start_date: String,
    pub end_date: String,
}

/// `GET kpi/work-session-user-weekly-total/{user}/{start}/{end}`; minutes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingTimeIndividual {
    #[serde(default)]
    pub total_time: i64,
    pub start_date: String,
    pub end_date: String,
    pub user_uuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMemberWorkingTime {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub total_time: i64,
    pub user_uuid: String,
}

/// `GET kpi/work-session-team-weekly-total/{team}/{start}/{end}`; minutes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingTimeTeam {
    #[serde(default)]
    pub total_time: i64,
    #[serde(default)]
    pub members: Vec<TeamMemberWorkingTime>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub team_name: String,
    pub team_uuid: String,
}

/// `GET kpi/presence-rate/{user}/{start}/{end}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresenceRate {
    #[serde(default)]
    pub presence_rate: f64,
    #[serde(default)]
    pub weekly_time_done: f64,
    #[serde(default)]
    pub weekly_rate_expected: f64,
    pub user_uuid: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Individual working time with the previous week alongside.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkingTimeIndividualDisplay {
    pub total_time: i64,
    pub start_date: String,
    pub end_date: String,
    pub user_uuid: String,
    pub previous_total: i64,
    pub difference: i64,
}

impl WorkingTimeIndividualDisplay {
    pub fn compare(current: WorkingTimeIndividual, previous: &WorkingTimeIndividual) -> Self {
        Self {
            total_time: current.total_time,
            start_date: current.start_date,
            end_date: current.end_date,
            user_uuid: current.user_uuid,
            previous_total: previous.total_time,
            difference: current.total_time - previous.total_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkingTimeTeamDisplay {
    pub total_time: i64,
    pub members: Vec<TeamMemberWorkingTime>,
    pub start_date: String,
    pub end_date: String,
    pub team_name: String,
    pub team_uuid: String,
    pub previous_total: i64,
    pub difference: i64,
}

impl WorkingTimeTeamDisplay {
    pub fn compare(current: WorkingTimeTeam, previous: &WorkingTimeTeam) -> Self {
        Self {
            total_time: current.total_time,
            members: current.members,
            start_date: current.start_date,
            end_date: current.end_date,
            team_name: current.team_name,
            team_uuid: current.team_uuid,
            previous_total: previous.total_time,
            difference: current.total_time - previous.total_time,
        }
    }
}

/// Cached value of any metric.
#[derive(Debug, Clone, PartialEq)]
pub enum KpiValue {
    WorkingTimeIndividual(WorkingTimeIndividualDisplay),
    IndividualPause(IndividualPause),
    WorkingTimeTeam(WorkingTimeTeamDisplay),
    PresenceRate(PresenceRate),
}

impl KpiValue {
    pub fn metric(&self) -> KpiMetric {
        match self {
            KpiValue::WorkingTimeIndividual(_) => KpiMetric::WorkingTimeIndividual,
            KpiValue::IndividualPause(_) => KpiMetric::IndividualPause,
            KpiValue::WorkingTimeTeam(_) => KpiMetric::WorkingTimeTeam,
            KpiValue::PresenceRate(_) => KpiMetric::PresenceRate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metric_names_round_trip_through_from_str() {
        for metric in KpiMetric::ALL {
            assert_eq!(metric.as_str().parse::<KpiMetric>().unwrap(), metric);
        }
        assert!("shiftAverage".parse::<KpiMetric>().is_err());
    }

    #[test]
    fn cached_value_knows_its_metric() {
        let rate: PresenceRate = serde_json::from_value(json!({
            "presence_rate": 92.5,
            "weekly_time_done": 32.4,
            "weekly_rate_expected": 35.0,
            "user_uuid": "u-7",
            "first_name": "Ana",
            "last_name": "Silva"
        }))
        .unwrap();
        assert_eq!(KpiValue::PresenceRate(rate).metric(), KpiMetric::PresenceRate);
    }

    #[test]
    fn unknown_server_fields_are_dropped() {
        let payload = json!({
            "total_time": 2310,
            "start_date": "2025-10-13T00:00:00Z",
            "end_date": "2025-10-17T23:59:59Z",
            "user_uuid": "u-1",
            "password_hash": "leaked"
        });
        let parsed: WorkingTimeIndividual = serde_json::from_value(payload).unwrap();
        let echoed = serde_json::to_value(&parsed).unwrap();
        assert!(echoed.get("password_hash").is_none());
        assert_eq!(parsed.total_time, 2310);
    }

    #[test]
    fn missing_identifier_is_rejected() {
        let payload = json!({"total_time": 10, "start_date": "a", "end_date": "b"});
        assert!(serde_json::from_value::<WorkingTimeIndividual>(payload).is_err());
    }

    #[test]
    fn team_display_diffs_totals() {
        let current = WorkingTimeTeam {
            total_time: 4200,
            members: vec![],
            start_date: "s".into(),
            end_date: "e".into(),
            team_name: "Support".into(),
            team_uuid: "t-1".into(),
        };
        let previous = WorkingTimeTeam {
            total_time: 4500,
            ..current.clone()
        };

        let display = WorkingTimeTeamDisplay::compare(current, &previous);
        assert_eq!(display.previous_total, 4500);
        assert_eq!(display.difference, -300);
        assert_eq!(display.team_name, "Support");
    }
}
