use std::sync::Arc;

use tracing::info;

use crate::api::{ApiClient, AuthBackend, KpiBackend, LayoutBackend};
use crate::config::ClientConfig;
use crate::error::AppResult;
use crate::services::edit_mode::EditModeStore;
use crate::services::kpi_store::KpiStore;
use crate::services::layout_store::LayoutStore;
use crate::services::notification_store::NotificationStore;
use crate::services::session_store::SessionStore;

/// Every client-side store, wired once around a shared [`ApiClient`].
pub struct ClientContext {
    config: ClientConfig,
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    kpi: Arc<KpiStore>,
    layouts: LayoutStore,
    edit_mode: Arc<EditModeStore>,
    notifications: NotificationStore,
}

impl ClientContext {
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let api = Arc::new(ApiClient::new(&config)?);

        let auth_backend: Arc<dyn AuthBackend> = api.clone();
        let kpi_backend: Arc<dyn KpiBackend> = api.clone();
        let layout_backend: Arc<dyn LayoutBackend> = api.clone();

        let session = Arc::new(SessionStore::new(auth_backend));
        let kpi = Arc::new(KpiStore::new(
            Arc::clone(&session),
            kpi_backend,
            config.kpi_cache_ttl,
        ));
        let layouts = LayoutStore::new(layout_backend, config.layout_cache_dir.clone());
        let edit_mode = Arc::new(EditModeStore::new(layouts.clone()));
        let notifications = NotificationStore::new(config.notification_duration);

        info!(target: "app::config", api_root = %api.base_url(), "client context ready");

        Ok(Self {
            config,
            api,
            session,
            kpi,
            layouts,
            edit_mode,
            notifications,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> Arc<ApiClient> {
        Arc::clone(&self.api)
    }

    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    pub fn kpi(&self) -> Arc<KpiStore> {
        Arc::clone(&self.kpi)
    }

    pub fn layouts(&self) -> LayoutStore {
        self.layouts.clone()
    }

    pub fn edit_mode(&self) -> Arc<EditModeStore> {
        Arc::clone(&self.edit_mode)
    }

    pub fn notifications(&self) -> NotificationStore {
        self.notifications.clone()
    }
}
