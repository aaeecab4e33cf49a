use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One positioned cell of the dashboard grid (4x4).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridItem {
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(rename = "minW", default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(rename = "minH", default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl GridItem {
    fn cell(id: &str, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            i: id.to_string(),
            x,
            y,
            w,
            h,
            min_w: Some(w),
            min_h: Some(h),
            locked: None,
        }
    }

    fn locked(mut self) -> Self {
        self.locked = Some(true);
        self
    }

    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }
}

pub type Layout = Vec<GridItem>;

/// Saved arrangements of one user, keyed by dashboard role name.
pub type RoleLayouts = BTreeMap<String, Layout>;

/// Payload stored under `layout`. Older clients saved a bare grid that
/// belongs to no particular dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StoredLayout {
    ByRole(RoleLayouts),
    Unkeyed(Layout),
}

/// Wire shape of `GET users/current-user-dashboard-layout`; `layout` is
/// `null` when nothing was saved.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LayoutEnvelope {
    #[serde(default)]
    pub layout: Option<StoredLayout>,
}

impl LayoutEnvelope {
    /// Per-role arrangements. An unkeyed grid cannot be attributed to a
    /// dashboard and yields nothing.
    pub fn into_role_layouts(self) -> RoleLayouts {
        match self.layout {
            Some(StoredLayout::ByRole(layouts)) => layouts,
            Some(StoredLayout::Unkeyed(_)) | None => RoleLayouts::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardRole {
    Employee,
    Manager,
    Admin,
}

impl DashboardRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DashboardRole::Employee => "employee",
            DashboardRole::Manager => "manager",
            DashboardRole::Admin => "admin",
        }
    }

    pub fn default_layout(self) -> Layout {
        match self {
            DashboardRole::Employee => vec![
                GridItem::cell("clock", 0, 0, 1, 2),
                GridItem::cell("team-presence", 3, 0, 1, 3).locked(),
                GridItem::cell("widget-4", 3, 3, 1, 1),
                GridItem::cell("widget-6", 0, 2, 1, 1),
                GridItem::cell("extra-widget", 0, 3, 1, 1),
                GridItem::cell("calendar", 1, 0, 2, 2),
                GridItem::cell("widget-2", 1, 2, 2, 1),
                GridItem::cell("widget-3", 1, 3, 2, 1),
            ],
            DashboardRole::Manager => vec![
                GridItem::cell("clock", 0, 0, 1, 2),
                GridItem::cell("kpi-stats", 0, 2, 1, 1),
                GridItem::cell("team-view", 0, 3, 1, 1),
                GridItem::cell("calendar", 1, 0, 2, 2),
                GridItem::cell("report-button", 1, 2, 2, 2),
                GridItem::cell("team-presence", 3, 0, 1, 3).locked(),
                GridItem::cell("modal-team", 3, 3, 1, 1),
            ],
            DashboardRole::Admin => vec![
                GridItem::cell("add-employee", 0, 0, 1, 1),
                GridItem::cell("staff-settings", 0, 1, 1, 1),
                GridItem::cell("kpi-monthly", 0, 2, 1, 1),
                GridItem::cell("kpi-history", 0, 3, 1, 1),
                GridItem::cell("calendar", 1, 0, 2, 2),
                GridItem::cell("widget-6", 1, 2, 2, 2),
                GridItem::cell("remote-absence", 3, 0, 1, 2),
                GridItem::cell("manager-report", 3, 2, 1, 2),
            ],
        }
    }
}

impl fmt::Display for DashboardRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(DashboardRole::Employee),
            "manager" => Ok(DashboardRole::Manager),
            "admin" => Ok(DashboardRole::Admin),
            other => Err(AppError::validation(format!("unknown dashboard {other}"))),
        }
    }
}
