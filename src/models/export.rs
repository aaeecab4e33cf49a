use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiExportRequest {
    pub kpi_type: String,
    pub uuid_to_search: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiExportResponse {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub url: String,
}
