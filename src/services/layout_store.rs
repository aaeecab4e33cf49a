use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::api::LayoutBackend;
use crate::error::AppResult;
use crate::models::layout::{DashboardRole, Layout};

/// Per-role dashboard arrangement.
///
/// Reads never block on the network: a missing arrangement is served from
/// the built-in default while the saved one loads in the background.
#[derive(Clone)]
pub struct LayoutStore {
    inner: Arc<LayoutInner>,
}

struct LayoutInner {
    backend: Arc<dyn LayoutBackend>,
    cache_dir: Option<PathBuf>,
    layouts: RwLock<HashMap<DashboardRole, Layout>>,
}

impl LayoutStore {
    pub fn new(backend: Arc<dyn LayoutBackend>, cache_dir: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(LayoutInner {
                backend,
                cache_dir,
                layouts: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// In-memory arrangement, without triggering a load.
    pub fn current_layout(&self, role: DashboardRole) -> Option<Layout> {
        self.inner
            .layouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&role)
            .cloned()
    }

    /// Cached arrangement, or the default while [`load_layout`](Self::load_layout)
    /// runs on the current tokio runtime.
    pub fn get_layout(&self, role: DashboardRole) -> Layout {
        if let Some(layout) = self.current_layout(role) {
            return layout;
        }

        let placeholder = role.default_layout();
        self.store(role, placeholder.clone());

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.clone();
                handle.spawn(async move {
                    store.load_layout(role).await;
                });
            }
            Err(_) => {
                debug!(target: "app::layout", %role, "no runtime, serving default layout only");
            }
        }

        placeholder
    }

    /// Server layout for `role` first, then the local override, then the
    /// default.
    pub async fn load_layout(&self, role: DashboardRole) -> Layout {
        let layout = match self.inner.backend.fetch_layout(role).await {
            Ok(Some(layout)) if !layout.is_empty() => {
                debug!(target: "app::layout", %role, "loaded saved layout from server");
                self.write_local(role, &layout);
                layout
            }
            Ok(_) => {
                debug!(target: "app::layout", %role, "no saved layout on server");
                self.read_local(role).unwrap_or_else(|| role.default_layout())
            }
            Err(err) => {
                warn!(target: "app::layout", %role, error = %err, "failed to load layout");
                self.read_local(role).unwrap_or_else(|| role.default_layout())
            }
        };

        self.store(role, layout.clone());
        layout
    }

    /// Memory is updated before any persistence; persistence failures are
    /// logged and dropped.
    pub async fn save_layout(&self, role: DashboardRole, layout: Layout) {
        self.store(role, layout.clone());
        self.write_local(role, &layout);

        match self.inner.backend.save_layout(role, &layout).await {
            Ok(()) => info!(target: "app::layout", %role, cells = layout.len(), "layout saved"),
            Err(err) => warn!(target: "app::layout", %role, error = %err, "failed to save layout"),
        }
    }

    pub async fn reset_layout(&self, role: DashboardRole) {
        self.store(role, role.default_layout());
        self.remove_local(role);

        match self.inner.backend.delete_layout(role).await {
            Ok(()) => info!(target: "app::layout", %role, "layout reset to default"),
            Err(err) => warn!(target: "app::layout", %role, error = %err, "failed to delete saved layout"),
        }
    }

    fn store(&self, role: DashboardRole, layout: Layout) {
        self.inner
            .layouts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(role, layout);
    }

    fn local_path(&self, role: DashboardRole) -> Option<PathBuf> {
        self.inner
            .cache_dir
            .as_deref()
            .map(|dir| local_layout_path(dir, role))
    }

    fn read_local(&self, role: DashboardRole) -> Option<Layout> {
        let path = self.local_path(role)?;
        match read_layout_file(&path) {
            Ok(layout) => layout.filter(|layout| !layout.is_empty()),
            Err(err) => {
                warn!(target: "app::layout", path = %path.display(), error = %err, "ignoring unreadable local layout");
                None
            }
        }
    }

    fn write_local(&self, role: DashboardRole, layout: &Layout) {
        let Some(path) = self.local_path(role) else {
            return;
        };
        if let Err(err) = write_layout_file(&path, layout) {
            warn!(target: "app::layout", path = %path.display(), error = %err, "failed to write local layout");
        }
    }

    fn remove_local(&self, role: DashboardRole) {
        let Some(path) = self.local_path(role) else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(target: "app::layout", path = %path.display(), error = %err, "failed to remove local layout");
            }
        }
    }
}

pub fn local_layout_path(dir: &Path, role: DashboardRole) -> PathBuf {
    dir.join(format!("layout_{}.json", role.as_str()))
}

fn read_layout_file(path: &Path) -> AppResult<Option<Layout>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read(path)?;
    Ok(Some(serde_json::from_slice(&raw)?))
}

fn write_layout_file(path: &Path, layout: &Layout) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_vec_pretty(layout)?)?;
    Ok(())
}
