use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::work_session::{
    BreakResponse, BreakUpdate, ClockStatus, ClockingResponse, ClockingUpdate, HistoryQuery,
    WorkSessionHistoryEntry,
};

const RESOURCE: &str = "work-session";

pub struct WorkSessionApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WorkSessionApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn status(&self) -> AppResult<ClockStatus> {
        self.client.get(&format!("{RESOURCE}/status")).await
    }

    /// Clocks the authenticated user in (`true`) or out (`false`).
    pub async fn update_clocking(&self, is_clocked: bool) -> AppResult<ClockingResponse> {
        self.update_clocking_for(None, is_clocked).await
    }

    /// Same as [`update_clocking`](Self::update_clocking) on behalf of another user.
    pub async fn update_clocking_for(
        &self,
        user_uuid: Option<&str>,
        is_clocked: bool,
    ) -> AppResult<ClockingResponse> {
        let body = ClockingUpdate {
            user_uuid,
            is_clocked,
        };
        self.client
            .post(&format!("{RESOURCE}/update-clocking"), &body)
            .await
    }

    pub async fn toggle_break(
        &self,
        work_session_uuid: &str,
        is_breaking: bool,
    ) -> AppResult<BreakResponse> {
        let body = BreakUpdate {
            work_session_uuid,
            is_breaking,
        };
        self.client
            .post(&format!("{RESOURCE}/update-breaking"), &body)
            .await
    }

    pub async fn history(&self, query: &HistoryQuery) -> AppResult<Vec<WorkSessionHistoryEntry>> {
        self.client
            .get_with_query(&format!("{RESOURCE}/history"), query)
            .await
    }
}
