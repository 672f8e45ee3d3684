pub mod actions;
pub mod api;
pub mod app_state;
pub mod cache;
pub mod configuration;
pub mod data_models;
pub mod errors;
pub mod filter;
mod routes;
pub mod snapshot;

use crate::app_state::AppState;
use crate::configuration::Settings;
use crate::errors::Error;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_app(settings: &Settings) -> Result<(Router, AppState), Error> {
    let app_state = AppState::init(settings)?;
    let app = Router::new()
        .route("/health_check", get(routes::health_check))
        .route(
            "/filters",
            get(routes::filters)
                .post(routes::update_filters)
                .delete(routes::reset_filters),
        )
        .route("/filters/full_screen", post(routes::full_screen))
        .route("/filters/variables", get(routes::filter_variables))
        .route("/view_mode", post(routes::view_mode))
        .route("/location", get(routes::location))
        .route("/events", get(routes::events).post(routes::create_event))
        .route(
            "/event/:id",
            get(routes::event)
                .put(routes::update_event)
                .delete(routes::delete_event),
        )
        .route("/event/:id/favorite", post(routes::favorite))
        .route("/event/:id/participation", post(routes::participation))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());
    Ok((app, app_state))
}
