use serde::{Deserialize, Serialize};

/// Current clocking state from `GET work-session/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClockStatus {
    #[serde(default)]
    pub is_clocked: bool,
    #[serde(default)]
    pub is_breaking: bool,
    #[serde(default)]
    pub work_session_uuid: Option<String>,
    #[serde(default)]
    pub clock_in_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub(crate) struct ClockingUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_uuid: Option<&'a str>,
    pub is_clocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClockingResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub clock_in_time: String,
    #[serde(default)]
    pub clock_out_time: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub(crate) struct BreakUpdate<'a> {
    pub work_session_uuid: &'a str,
    pub is_breaking: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// Query of `GET work-session/history`.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct HistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_uuid: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkSessionHistoryEntry {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub clock_in: String,
    #[serde(default)]
    pub clock_out: Option<String>,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user: Option<SessionOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionOwner {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}
