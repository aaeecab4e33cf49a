use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::models::layout::DashboardRole;
use crate::services::layout_store::LayoutStore;

#[derive(Debug, Default)]
struct EditModeState {
    edit_mode: bool,
    current_dashboard: Option<DashboardRole>,
}

/// Dashboard edit toggle. Leaving edit mode saves the layout of the
/// dashboard being edited.
pub struct EditModeStore {
    layouts: LayoutStore,
    state: Mutex<EditModeState>,
}

impl EditModeStore {
    pub fn new(layouts: LayoutStore) -> Self {
        Self {
            layouts,
            state: Mutex::new(EditModeState::default()),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.lock().edit_mode
    }

    pub fn current_dashboard(&self) -> Option<DashboardRole> {
        self.lock().current_dashboard
    }

    pub fn set_current_dashboard(&self, role: DashboardRole) {
        self.lock().current_dashboard = Some(role);
    }

    /// Returns the new edit mode.
    pub async fn toggle_edit_mode(&self) -> bool {
        let (editing, save_for) = {
            let mut state = self.lock();
            state.edit_mode = !state.edit_mode;
            let save_for = if state.edit_mode {
                None
            } else {
                state.current_dashboard
            };
            (state.edit_mode, save_for)
        };
        debug!(target: "app::layout", editing, "edit mode toggled");

        if let Some(role) = save_for {
            let layout = self
                .layouts
                .current_layout(role)
                .unwrap_or_else(|| role.default_layout());
            self.layouts.save_layout(role, layout).await;
        }

        editing
    }

    pub fn reset(&self) {
        *self.lock() = EditModeState::default();
    }

    fn lock(&self) -> MutexGuard<'_, EditModeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::api::LayoutBackend;
    use crate::error::AppResult;
    use crate::models::layout::{GridItem, Layout};

    #[derive(Default)]
    struct CountingBackend {
        saves: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl LayoutBackend for CountingBackend {
        async fn fetch_layout(&self, _role: DashboardRole) -> AppResult<Option<Layout>> {
            Ok(None)
        }

        async fn save_layout(&self, _role: DashboardRole, _layout: &[GridItem]) -> AppResult<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete_layout(&self, _role: DashboardRole) -> AppResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn leaving_edit_mode_saves_current_dashboard() {
        let backend = Arc::new(CountingBackend::default());
        let store = EditModeStore::new(LayoutStore::new(backend.clone(), None));
        store.set_current_dashboard(DashboardRole::Manager);

        assert!(store.toggle_edit_mode().await);
        assert_eq!(backend.saves.load(Ordering::SeqCst), 0);

        assert!(!store.toggle_edit_mode().await);
        assert_eq!(backend.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn leaving_without_dashboard_saves_nothing() {
        let backend = Arc::new(CountingBackend::default());
        let store = EditModeStore::new(LayoutStore::new(backend.clone(), None));

        store.toggle_edit_mode().await;
        store.toggle_edit_mode().await;
        assert_eq!(backend.saves.load(Ordering::SeqCst), 0);

        store.set_current_dashboard(DashboardRole::Admin);
        store.reset();
        assert!(store.current_dashboard().is_none());
        assert!(!store.is_edit_mode());
    }

    #[test]
    fn poisoned_state_keeps_answering() {
        let store = Arc::new(EditModeStore::new(LayoutStore::new(
            Arc::new(CountingBackend::default()),
            None,
        )));
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("poison the edit mode lock");
        })
        .join();

        store.set_current_dashboard(DashboardRole::Employee);
        assert_eq!(store.current_dashboard(), Some(DashboardRole::Employee));
        assert!(!store.is_edit_mode());
    }
}
