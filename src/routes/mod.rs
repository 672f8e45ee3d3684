use crate::actions;
use crate::app_state::AppState;
use crate::cache::CacheError;
use crate::data_models::{Event, EventInput};
use crate::errors::AppErrors;
use crate::filter::{parse_filters, EventsFilterInput, FilterAction, FilterPatch, StoreState, ViewMode};
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct FullScreenRequest {
    #[serde(default)]
    pub open: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ViewModeRequest {
    pub mode: ViewMode,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub query: String,
    pub writes: usize,
}

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn filters(State(state): State<AppState>) -> Json<StoreState> {
    Json(state.store.snapshot())
}

pub async fn update_filters(
    State(state): State<AppState>,
    Json(patch): Json<FilterPatch>,
) -> Result<Json<StoreState>, AppErrors> {
    let store_state = state.dispatch_and_navigate(FilterAction::SetFilters(patch))?;
    Ok(Json(store_state))
}

pub async fn reset_filters(State(state): State<AppState>) -> Result<Json<StoreState>, AppErrors> {
    Ok(Json(state.reset_filters()?))
}

pub async fn full_screen(
    State(state): State<AppState>,
    Json(request): Json<FullScreenRequest>,
) -> Result<Json<StoreState>, AppErrors> {
    let store_state = state.dispatch(FilterAction::ToggleFullScreen(request.open))?;
    Ok(Json(store_state))
}

pub async fn view_mode(
    State(state): State<AppState>,
    Json(request): Json<ViewModeRequest>,
) -> Result<Json<StoreState>, AppErrors> {
    let store_state = state.dispatch(FilterAction::SetViewMode(request.mode))?;
    Ok(Json(store_state))
}

pub async fn filter_variables(State(state): State<AppState>) -> Json<EventsFilterInput> {
    Json(EventsFilterInput::from(&state.store.filters()))
}

pub async fn location(State(state): State<AppState>) -> Json<LocationResponse> {
    Json(LocationResponse {
        query: state.location.current(),
        writes: state.location.writes(),
    })
}

pub async fn events(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Event>>, AppErrors> {
    let patch = parse_filters(query.as_deref().unwrap_or_default());
    let store_state = state.dispatch(FilterAction::SetFilters(patch))?;
    let input = EventsFilterInput::from(&store_state.filters);
    let events = state.api.events(&input).await?;
    state.cache.upsert_all(&events);
    info!(n_events = events.len(), "events listed");
    Ok(Json(events))
}

pub async fn event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppErrors> {
    let event = state
        .api
        .event(&id)
        .await?
        .ok_or(CacheError::UnknownEvent(id))?;
    state.cache.upsert(event.clone());
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<Event>), AppErrors> {
    let event = state.api.create_event(&input).await?;
    state.cache.upsert(event.clone());
    info!(event_id = %event.id, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EventInput>,
) -> Result<Json<Event>, AppErrors> {
    let event = state.api.update_event(&id, &input).await?;
    state.cache.upsert(event.clone());
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppErrors> {
    if !state.api.delete_event(&id).await? {
        return Err(CacheError::UnknownEvent(id).into());
    }
    state.cache.remove(&id);
    info!(event_id = %id, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppErrors> {
    let event = actions::toggle_favorite(&state.cache, &state.api, &id).await?;
    Ok(Json(event))
}

pub async fn participation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppErrors> {
    let event = actions::toggle_participation(&state.cache, &state.api, &id).await?;
    Ok(Json(event))
}
