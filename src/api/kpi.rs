use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::kpi::{IndividualPause, PresenceRate, WorkingTimeIndividual, WorkingTimeTeam};
use crate::utils::dates::DateRange;

const RESOURCE: &str = "kpi";

pub struct KpiApi<'a> {
    client: &'a ApiClient,
}

impl<'a> KpiApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn average_break_time(
        &self,
        user_uuid: &str,
        range: &DateRange,
    ) -> AppResult<IndividualPause> {
        self.client
            .get(&metric_path("average-break-time", user_uuid, range))
            .await
    }

    pub async fn working_time_individual(
        &self,
        user_uuid: &str,
        range: &DateRange,
    ) -> AppResult<WorkingTimeIndividual> {
        self.client
            .get(&metric_path("work-session-user-weekly-total", user_uuid, range))
            .await
    }

    pub async fn working_time_team(
        &self,
        team_uuid: &str,
        range: &DateRange,
    ) -> AppResult<WorkingTimeTeam> {
        self.client
            .get(&metric_path("work-session-team-weekly-total", team_uuid, range))
            .await
    }

    pub async fn presence_rate(&self, user_uuid: &str, range: &DateRange) -> AppResult<PresenceRate> {
        self.client
            .get(&metric_path("presence-rate", user_uuid, range))
            .await
    }
}

fn metric_path(metric: &str, uuid: &str, range: &DateRange) -> String {
    format!(
        "{RESOURCE}/{metric}/{uuid}/{}/{}",
        range.start_date, range.end_date
    )
}
