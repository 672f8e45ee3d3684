use crate::filter::patch::FilterPatch;
use crate::filter::state::{FilterState, ViewMode};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Everything the filter panel shares between controls.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub filters: FilterState,
    pub is_full_screen: bool,
    pub view_mode: ViewMode,
}

impl StoreState {
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetFilters(FilterPatch),
    Reset(FilterState),
    /// `None` flips the current value.
    ToggleFullScreen(Option<bool>),
    SetViewMode(ViewMode),
}

pub fn reduce(state: &StoreState, action: FilterAction) -> StoreState {
    match action {
        FilterAction::SetFilters(patch) => StoreState {
            filters: patch.merge_into(&state.filters),
            ..state.clone()
        },
        FilterAction::Reset(filters) => StoreState {
            filters,
            ..state.clone()
        },
        FilterAction::ToggleFullScreen(open) => StoreState {
            is_full_screen: open.unwrap_or(!state.is_full_screen),
            ..state.clone()
        },
        FilterAction::SetViewMode(view_mode) => StoreState {
            view_mode,
            ..state.clone()
        },
    }
}

/// Shared container around [`reduce`]. Cloned snapshots are handed out, the
/// lock is never held by callers.
#[derive(Debug)]
pub struct FilterStore {
    state: RwLock<StoreState>,
    defaults: FilterState,
}

impl FilterStore {
    pub fn new(defaults: FilterState) -> Self {
        Self::with_state(StoreState::new(defaults.clone()), defaults)
    }

    pub fn with_state(state: StoreState, defaults: FilterState) -> Self {
        Self {
            state: RwLock::new(state),
            defaults,
        }
    }

    pub fn snapshot(&self) -> StoreState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn filters(&self) -> FilterState {
        self.snapshot().filters
    }

    pub fn dispatch(&self, action: FilterAction) -> StoreState {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        debug!(?action, "dispatching filter action");
        let next = reduce(&state, action);
        *state = next.clone();
        next
    }

    /// Commits `action` and runs `effect` on the new state before the lock is
    /// released, so effects observe commits in order. The state stays
    /// committed when `effect` fails.
    pub fn dispatch_with<E>(
        &self,
        action: FilterAction,
        effect: impl FnOnce(&StoreState) -> Result<(), E>,
    ) -> Result<StoreState, E> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        debug!(?action, "dispatching filter action");
        let next = reduce(&state, action);
        *state = next.clone();
        effect(&next)?;
        Ok(next)
    }

    pub fn reset(&self) -> StoreState {
        self.dispatch(FilterAction::Reset(self.defaults.clone()))
    }

    pub fn reset_with<E>(
        &self,
        effect: impl FnOnce(&StoreState) -> Result<(), E>,
    ) -> Result<StoreState, E> {
        self.dispatch_with(FilterAction::Reset(self.defaults.clone()), effect)
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}
