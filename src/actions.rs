//! Favorite and participation toggles, applied optimistically and reverted
//! when the API refuses them.

use crate::api::GraphQlClient;
use crate::cache::{CacheError, EventCache, EventPatch};
use crate::data_models::Event;
use crate::errors::AppErrors;
use tracing::{info, warn};

async fn cached_or_fetched(
    cache: &EventCache,
    api: &GraphQlClient,
    id: &str,
) -> Result<Event, AppErrors> {
    if let Some(event) = cache.get(id) {
        return Ok(event);
    }
    let event = api
        .event(id)
        .await?
        .ok_or_else(|| CacheError::UnknownEvent(id.to_string()))?;
    cache.upsert(event.clone());
    Ok(event)
}

pub async fn toggle_favorite(
    cache: &EventCache,
    api: &GraphQlClient,
    id: &str,
) -> Result<Event, AppErrors> {
    let current = cached_or_fetched(cache, api, id).await?;
    let value = !current.is_favorite;
    let patch = EventPatch {
        is_favorite: Some(value),
        ..Default::default()
    };
    let token = cache.apply_optimistic_update(id, &patch)?;
    match api.set_favorite(&current.id, value).await {
        Ok(event) => {
            cache.commit(token)?;
            cache.upsert(event.clone());
            info!(event_id = id, value, "favorite updated");
            Ok(event)
        }
        Err(err) => {
            warn!(event_id = id, "favorite update failed, reverting: {err}");
            cache.rollback(token)?;
            Err(err.into())
        }
    }
}

pub async fn toggle_participation(
    cache: &EventCache,
    api: &GraphQlClient,
    id: &str,
) -> Result<Event, AppErrors> {
    let current = cached_or_fetched(cache, api, id).await?;
    let value = !current.is_participating;
    let participants_count = if value {
        current.participants_count.saturating_add(1)
    } else {
        current.participants_count.saturating_sub(1)
    };
    let patch = EventPatch {
        is_participating: Some(value),
        participants_count: Some(participants_count),
        ..Default::default()
    };
    let token = cache.apply_optimistic_update(id, &patch)?;
    match api.set_participation(&current.id, value).await {
        Ok(event) => {
            cache.commit(token)?;
            cache.upsert(event.clone());
            info!(event_id = id, value, "participation updated");
            Ok(event)
        }
        Err(err) => {
            warn!(event_id = id, "participation update failed, reverting: {err}");
            cache.rollback(token)?;
            Err(err.into())
        }
    }
}
