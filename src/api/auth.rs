use tracing::info;

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::user::{LoginRequest, UserProfile};

const RESOURCE: &str = "auth";

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The server answers with a `token` cookie, kept in the client jar.
    pub async fn login(&self, credentials: &LoginRequest) -> AppResult<()> {
        self.client
            .post_unit(&format!("{RESOURCE}/login"), credentials)
            .await?;
        info!(target: "app::api::auth", "login accepted");
        Ok(())
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.client.post_empty(&format!("{RESOURCE}/logout")).await
    }

    pub async fn me(&self) -> AppResult<UserProfile> {
        self.client.get(&format!("{RESOURCE}/me")).await
    }
}
