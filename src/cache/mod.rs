//! Client-side event cache with revertible optimistic updates.

use crate::data_models::{Event, EventId};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq)]
pub enum CacheError {
    #[error("event {0} is not cached")]
    UnknownEvent(EventId),
    #[error("no pending update for token {0}")]
    UnknownToken(UndoToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UndoToken(Uuid);

impl Display for UndoToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The client-owned fields of an event that mutations touch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventPatch {
    pub is_favorite: Option<bool>,
    pub is_participating: Option<bool>,
    pub participants_count: Option<u32>,
}

impl EventPatch {
    /// Applies the patch and returns the patch that undoes it.
    fn apply(&self, event: &mut Event) -> EventPatch {
        let mut inverse = EventPatch::default();
        if let Some(is_favorite) = self.is_favorite {
            inverse.is_favorite = Some(event.is_favorite);
            event.is_favorite = is_favorite;
        }
        if let Some(is_participating) = self.is_participating {
            inverse.is_participating = Some(event.is_participating);
            event.is_participating = is_participating;
        }
        if let Some(participants_count) = self.participants_count {
            inverse.participants_count = Some(event.participants_count);
            event.participants_count = participants_count;
        }
        inverse
    }

    /// Keeps only the fields of `self` whose value in `event` is still the one
    /// `written` put there.
    fn still_owned(&self, written: &EventPatch, event: &Event) -> EventPatch {
        EventPatch {
            is_favorite: self
                .is_favorite
                .filter(|_| written.is_favorite == Some(event.is_favorite)),
            is_participating: self
                .is_participating
                .filter(|_| written.is_participating == Some(event.is_participating)),
            participants_count: self
                .participants_count
                .filter(|_| written.participants_count == Some(event.participants_count)),
        }
    }
}

#[derive(Debug)]
struct PendingUpdate {
    event_id: EventId,
    written: EventPatch,
    inverse: EventPatch,
}

#[derive(Debug, Default)]
struct CacheInner {
    events: HashMap<EventId, Event>,
    pending: HashMap<UndoToken, PendingUpdate>,
}

#[derive(Debug, Default)]
pub struct EventCache {
    inner: RwLock<CacheInner>,
}

impl EventCache {
    pub fn get(&self, id: &str) -> Option<Event> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.events.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_updates(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.pending.len()
    }

    pub fn upsert(&self, event: Event) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.events.insert(event.id.clone(), event);
    }

    pub fn upsert_all(&self, events: &[Event]) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        for event in events {
            inner.events.insert(event.id.clone(), event.clone());
        }
    }

    pub fn remove(&self, id: &str) -> Option<Event> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.events.remove(id)
    }

    pub fn apply_optimistic_update(
        &self,
        id: &str,
        patch: &EventPatch,
    ) -> Result<UndoToken, CacheError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let event = inner
            .events
            .get_mut(id)
            .ok_or_else(|| CacheError::UnknownEvent(id.to_string()))?;
        let inverse = patch.apply(event);
        let token = UndoToken(Uuid::new_v4());
        inner.pending.insert(
            token,
            PendingUpdate {
                event_id: id.to_string(),
                written: patch.clone(),
                inverse,
            },
        );
        debug!(%token, event_id = id, "optimistic update applied");
        Ok(token)
    }

    /// Forgets the undo record; the patched values stay.
    pub fn commit(&self, token: UndoToken) -> Result<(), CacheError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner
            .pending
            .remove(&token)
            .map(|_| ())
            .ok_or(CacheError::UnknownToken(token))
    }

    /// Restores the fields the update touched, skipping any a later write has
    /// since changed. An event evicted in the meantime is left evicted.
    pub fn rollback(&self, token: UndoToken) -> Result<(), CacheError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let update = inner
            .pending
            .remove(&token)
            .ok_or(CacheError::UnknownToken(token))?;
        match inner.events.get_mut(&update.event_id) {
            Some(event) => {
                update
                    .inverse
                    .still_owned(&update.written, event)
                    .apply(event);
                debug!(%token, event_id = %update.event_id, "optimistic update rolled back");
            }
            None => debug!(%token, event_id = %update.event_id, "rolled back update of evicted event"),
        }
        Ok(())
    }
}
