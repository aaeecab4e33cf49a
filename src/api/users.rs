use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::user::{
    MessageResponse, PasswordChangePayload, PasswordResetPayload, RegisterInput, UserRecord,
    UserStatus, UserStatusUpdate, UserUpdateBody, UserUpdateInput,
};

const RESOURCE: &str = "users";

pub struct UserApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Validates the form locally before anything is sent.
    pub async fn register(&self, input: &RegisterInput) -> AppResult<MessageResponse> {
        input.validate()?;
        self.client
            .post(&format!("{RESOURCE}/register"), input)
            .await
    }

    pub async fn list(&self) -> AppResult<Vec<UserRecord>> {
        self.client.get(RESOURCE).await
    }

    pub async fn get(&self, user_uuid: &str) -> AppResult<UserRecord> {
        self.client.get(&format!("{RESOURCE}/{user_uuid}")).await
    }

    pub async fn get_specific(&self, user_uuid: &str) -> AppResult<UserRecord> {
        self.client
            .get(&format!("{RESOURCE}/specific/{user_uuid}"))
            .await
    }

    pub async fn delete(&self, user_uuid: &str) -> AppResult<()> {
        self.client
            .delete(&format!("{RESOURCE}/delete/{user_uuid}"))
            .await
    }

    pub async fn update_status(&self, user_uuid: &str, status: UserStatus) -> AppResult<()> {
        let body = UserStatusUpdate {
            user_uuid: user_uuid.to_string(),
            status,
        };
        self.client
            .post_unit(&format!("{RESOURCE}/update-status"), &body)
            .await
    }

    pub async fn update(&self, user_uuid: &str, input: &UserUpdateInput) -> AppResult<()> {
        let body = UserUpdateBody {
            uuid: user_uuid,
            input,
        };
        self.client.put_unit(RESOURCE, &body).await
    }

    pub async fn request_password_reset(&self, user_email: &str) -> AppResult<MessageResponse> {
        let body = PasswordResetPayload {
            user_email: user_email.to_string(),
        };
        self.client
            .post(&format!("{RESOURCE}/reset-password"), &body)
            .await
    }

    pub async fn change_password(
        &self,
        user_uuid: &str,
        new_password: &str,
    ) -> AppResult<MessageResponse> {
        let body = PasswordChangePayload {
            new_password: new_password.to_string(),
            user_uuid: user_uuid.to_string(),
        };
        self.client
            .post(&format!("{RESOURCE}/change-password"), &body)
            .await
    }
}
