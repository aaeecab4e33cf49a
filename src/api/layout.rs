use serde::Serialize;

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::layout::{DashboardRole, GridItem, Layout, LayoutEnvelope, RoleLayouts};

const RESOURCE: &str = "users/current-user-dashboard-layout";

#[derive(Serialize)]
struct LayoutBody<'a> {
    layout: &'a RoleLayouts,
}

/// The server keeps a single `layout` document per user. It holds one grid
/// per dashboard role, so every write merges into what is already stored.
pub struct LayoutApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LayoutApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Every saved arrangement, keyed by role name.
    pub async fn get_all(&self) -> AppResult<RoleLayouts> {
        let envelope: LayoutEnvelope = self.client.get(RESOURCE).await?;
        Ok(envelope.into_role_layouts())
    }

    /// `None` when the user never saved a layout for `role`.
    pub async fn get(&self, role: DashboardRole) -> AppResult<Option<Layout>> {
        let mut layouts = self.get_all().await?;
        Ok(layouts.remove(role.as_str()))
    }

    pub async fn save(&self, role: DashboardRole, layout: &[GridItem]) -> AppResult<()> {
        let mut layouts = self.get_all().await?;
        layouts.insert(role.as_str().to_string(), layout.to_vec());
        self.put_all(&layouts).await
    }

    /// Drops the arrangement of `role`. The document itself is deleted once
    /// no role has one left.
    pub async fn delete(&self, role: DashboardRole) -> AppResult<()> {
        let mut layouts = self.get_all().await?;
        layouts.remove(role.as_str());
        if layouts.is_empty() {
            self.client.delete(&format!("{RESOURCE}/delete")).await
        } else {
            self.put_all(&layouts).await
        }
    }

    async fn put_all(&self, layouts: &RoleLayouts) -> AppResult<()> {
        self.client
            .put_unit(&format!("{RESOURCE}/edit"), &LayoutBody { layout: layouts })
            .await
    }
}
