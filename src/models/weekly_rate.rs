use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyRate {
    pub uuid: String,
    pub rate_name: String,
    pub amount: f64,
}

/// Body of both create and update calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyRateInput {
    pub rate_name: String,
    pub amount: f64,
}
