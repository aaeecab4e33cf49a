use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::models::weekly_rate::{WeeklyRate, WeeklyRateInput};

const RESOURCE: &str = "users/weekly-rates";

pub struct WeeklyRateApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WeeklyRateApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> AppResult<Vec<WeeklyRate>> {
        self.client.get(RESOURCE).await
    }

    pub async fn create(&self, input: &WeeklyRateInput) -> AppResult<()> {
        ensure_valid(input)?;
        self.client
            .post_unit(&format!("{RESOURCE}/create"), input)
            .await
    }

    pub async fn update(&self, rate_uuid: &str, input: &WeeklyRateInput) -> AppResult<()> {
        ensure_valid(input)?;
        self.client
            .put_unit(&format!("{RESOURCE}/{rate_uuid}/update"), input)
            .await
    }

    pub async fn delete(&self, rate_uuid: &str) -> AppResult<()> {
        self.client
            .delete(&format!("{RESOURCE}/{rate_uuid}/delete"))
            .await
    }

    pub async fn assign_to_user(&self, rate_uuid: &str, user_uuid: &str) -> AppResult<()> {
        self.client
            .post_empty(&format!("{RESOURCE}/{rate_uuid}/assign-to-user/{user_uuid}"))
            .await
    }
}

fn ensure_valid(input: &WeeklyRateInput) -> AppResult<()> {
    if input.rate_name.trim().is_empty() {
        return Err(AppError::validation("weekly rate name cannot be empty"));
    }
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(AppError::validation("weekly rate amount must be positive"));
    }
    Ok(())
}
