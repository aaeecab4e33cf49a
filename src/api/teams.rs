use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::team::{Team, TeamCreateInput, TeamMembersInput, TeamUpdateInput};

const RESOURCE: &str = "teams";

pub struct TeamApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TeamApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All teams with their members.
    pub async fn list(&self) -> AppResult<Vec<Team>> {
        self.client.get(RESOURCE).await
    }

    pub async fn get(&self, team_uuid: &str) -> AppResult<Team> {
        self.client.get(&format!("{RESOURCE}/{team_uuid}")).await
    }

    pub async fn create(&self, input: &TeamCreateInput) -> AppResult<()> {
        self.client.post_unit(RESOURCE, input).await
    }

    pub async fn add_members(&self, input: &TeamMembersInput) -> AppResult<()> {
        self.client
            .post_unit(&format!("{RESOURCE}/add-users"), input)
            .await
    }

    pub async fn delete(&self, team_uuid: &str) -> AppResult<()> {
        self.client.delete(&format!("{RESOURCE}/{team_uuid}")).await
    }

    pub async fn remove_member(&self, team_uuid: &str, user_uuid: &str) -> AppResult<()> {
        self.client
            .delete(&format!("{RESOURCE}/users/{team_uuid}/{user_uuid}"))
            .await
    }

    pub async fn update(&self, team_uuid: &str, input: &TeamUpdateInput) -> AppResult<()> {
        self.client
            .put_unit(&format!("{RESOURCE}/edit/{team_uuid}"), input)
            .await
    }
}
