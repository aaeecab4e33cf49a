use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::models::export::{KpiExportRequest, KpiExportResponse};

pub struct ExportApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ExportApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn export_kpi(&self, request: &KpiExportRequest) -> AppResult<KpiExportResponse> {
        if request.kpi_type.trim().is_empty() {
            return Err(AppError::validation("kpi_type is required for an export"));
        }
        self.client.post("kpi/export", request).await
    }
}
