//! Seams between the stores and the HTTP client. Stores only see these
//! traits, so tests can swap in in-memory backends.

use crate::api::{ApiClient, TeamApi};
use crate::error::AppResult;
use crate::models::kpi::{IndividualPause, PresenceRate, WorkingTimeIndividual, WorkingTimeTeam};
use crate::models::layout::{DashboardRole, GridItem, Layout};
use crate::models::team::Team;
use crate::models::user::{LoginRequest, UserProfile};
use crate::utils::dates::DateRange;

#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> AppResult<()>;

    async fn logout(&self) -> AppResult<()>;

    async fn current_user(&self) -> AppResult<UserProfile>;

    /// Raw session token, when the transport exposes it.
    fn session_token(&self) -> Option<String> {
        None
    }
}

#[async_trait::async_trait]
pub trait KpiBackend: Send + Sync {
    async fn working_time_individual(
        &self,
        user_uuid: &str,
        range: &DateRange,
    ) -> AppResult<WorkingTimeIndividual>;

    async fn working_time_team(
        &self,
        team_uuid: &str,
        range: &DateRange,
    ) -> AppResult<WorkingTimeTeam>;

    async fn presence_rate(&self, user_uuid: &str, range: &DateRange) -> AppResult<PresenceRate>;

    async fn average_break_time(
        &self,
        user_uuid: &str,
        range: &DateRange,
    ) -> AppResult<IndividualPause>;

    async fn teams(&self) -> AppResult<Vec<Team>>;
}

#[async_trait::async_trait]
pub trait LayoutBackend: Send + Sync {
    async fn fetch_layout(&self, role: DashboardRole) -> AppResult<Option<Layout>>;

    async fn save_layout(&self, role: DashboardRole, layout: &[GridItem]) -> AppResult<()>;

    /// Removes the saved arrangement of `role` only.
    async fn delete_layout(&self, role: DashboardRole) -> AppResult<()>;
}

#[async_trait::async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> AppResult<()> {
        self.auth().login(credentials).await
    }

    async fn logout(&self) -> AppResult<()> {
        self.auth().logout().await
    }

    async fn current_user(&self) -> AppResult<UserProfile> {
        self.auth().me().await
    }

    fn session_token(&self) -> Option<String> {
        ApiClient::session_token(self)
    }
}

#[async_trait::async_trait]
impl KpiBackend for ApiClient {
    async fn working_time_individual(
        &self,
        user_uuid: &str,
        range: &DateRange,
    ) -> AppResult<WorkingTimeIndividual> {
        self.kpi().working_time_individual(user_uuid, range).await
    }

    async fn working_time_team(
        &self,
        team_uuid: &str,
        range: &DateRange,
    ) -> AppResult<WorkingTimeTeam> {
        self.kpi().working_time_team(team_uuid, range).await
    }

    async fn presence_rate(&self, user_uuid: &str, range: &DateRange) -> AppResult<PresenceRate> {
        self.kpi().presence_rate(user_uuid, range).await
    }

    async fn average_break_time(
        &self,
        user_uuid: &str,
        range: &DateRange,
    ) -> AppResult<IndividualPause> {
        self.kpi().average_break_time(user_uuid, range).await
    }

    async fn teams(&self) -> AppResult<Vec<Team>> {
        TeamApi::new(self).list().await
    }
}

#[async_trait::async_trait]
impl LayoutBackend for ApiClient {
    async fn fetch_layout(&self, role: DashboardRole) -> AppResult<Option<Layout>> {
        self.layout().get(role).await
    }

    async fn save_layout(&self, role: DashboardRole, layout: &[GridItem]) -> AppResult<()> {
        self.layout().save(role, layout).await
    }

    async fn delete_layout(&self, role: DashboardRole) -> AppResult<()> {
        self.layout().delete(role).await
    }
}
