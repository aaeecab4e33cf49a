use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::api::AuthBackend;
use crate::error::{AppError, AppResult};
use crate::models::user::{LoginRequest, UserProfile, ROLE_ADMIN, ROLE_EMPLOYEE, ROLE_MANAGER};
use crate::utils::token::is_token_expired;

/// Authenticated profile of the current user, or nothing.
pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    user: RwLock<Option<UserProfile>>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            user: RwLock::new(None),
        }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.user.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current user or [`AppError::Unauthenticated`].
    pub fn require_user(&self) -> AppResult<UserProfile> {
        self.current_user().ok_or_else(AppError::unauthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn is_employee(&self) -> bool {
        self.has_role(ROLE_EMPLOYEE)
    }

    pub fn is_manager(&self) -> bool {
        self.has_role(ROLE_MANAGER)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    fn has_role(&self, role: &str) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|user| user.has_role(role))
    }

    /// Restores a previous session from the cookie. Never fails; the
    /// session stays empty when the profile cannot be fetched. Only a token
    /// whose decoded `exp` has passed skips the profile request.
    pub async fn init_auth(&self) {
        if let Some(token) = self.backend.session_token() {
            if is_token_expired(&token) {
                debug!(target: "app::session", "stored session token expired, skipping restore");
                self.clear();
                return;
            }
        }

        match self.backend.current_user().await {
            Ok(profile) => {
                info!(target: "app::session", user_uuid = %profile.user_uuid, "session restored");
                self.set(profile);
            }
            Err(err) => {
                debug!(target: "app::session", error = %err, "no session to restore");
                self.clear();
            }
        }
    }

    /// Authenticates then loads the profile. Any failure leaves the session
    /// empty and is returned unchanged.
    pub async fn login(&self, credentials: &LoginRequest) -> AppResult<UserProfile> {
        let result: AppResult<UserProfile> = async {
            self.backend.login(credentials).await?;
            self.backend.current_user().await
        }
        .await;

        match result {
            Ok(profile) => {
                info!(target: "app::session", user_uuid = %profile.user_uuid, "user logged in");
                self.set(profile.clone());
                Ok(profile)
            }
            Err(err) => {
                warn!(target: "app::session", error = %err, "login failed");
                self.clear();
                Err(err)
            }
        }
    }

    /// Local state is cleared even when the server call fails.
    pub async fn logout(&self) {
        if let Err(err) = self.backend.logout().await {
            warn!(target: "app::session", error = %err, "remote logout failed");
        }
        self.clear();
        info!(target: "app::session", "user logged out");
    }

    fn set(&self, profile: UserProfile) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(profile);
    }

    fn clear(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
