use crate::api::GraphQlClient;
use crate::cache::EventCache;
use crate::configuration::Settings;
use crate::errors::{AppErrors, Error};
use crate::filter::{FilterAction, FilterStore, LocationHistory, StoreState, UrlWriter};
use crate::snapshot::SnapshotFile;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<FilterStore>,
    pub cache: Arc<EventCache>,
    pub api: GraphQlClient,
    pub location: Arc<LocationHistory>,
    pub url_writer: Arc<UrlWriter>,
    pub snapshot: Option<SnapshotFile>,
}

impl AppState {
    pub fn init(settings: &Settings) -> Result<Self, Error> {
        settings.check_if_valid()?;
        let api = GraphQlClient::new(settings.api.graphql_url.as_str(), settings.api.timeout())
            .map_err(AppErrors::from)?;
        let defaults = settings.filters.defaults();
        let snapshot = settings
            .snapshot
            .file_path
            .as_ref()
            .map(|path| SnapshotFile::new(path));
        let initial = match snapshot.as_ref().map(SnapshotFile::load) {
            Some(Ok(Some(state))) => {
                info!("restored filters from snapshot");
                state
            }
            Some(Err(err)) => {
                warn!("ignoring unreadable filter snapshot: {err}");
                StoreState::new(defaults.clone())
            }
            Some(Ok(None)) | None => StoreState::new(defaults.clone()),
        };
        let location = Arc::new(LocationHistory::default());
        let url_writer = UrlWriter::new(location.clone(), settings.filters.debounce());
        Ok(Self {
            store: Arc::new(FilterStore::with_state(initial, defaults)),
            cache: Arc::new(EventCache::default()),
            api,
            location,
            url_writer: Arc::new(url_writer),
            snapshot,
        })
    }

    /// Applies `action` to the store and persists the result.
    pub fn dispatch(&self, action: FilterAction) -> Result<StoreState, AppErrors> {
        self.store.dispatch_with(action, |state| self.persist(state))
    }

    /// Like [`AppState::dispatch`], and also schedules a location write.
    pub fn dispatch_and_navigate(&self, action: FilterAction) -> Result<StoreState, AppErrors> {
        self.store.dispatch_with(action, |state| {
            self.persist(state)?;
            self.url_writer.schedule(&state.filters);
            Ok(())
        })
    }

    pub fn reset_filters(&self) -> Result<StoreState, AppErrors> {
        self.store.reset_with(|state| {
            self.persist(state)?;
            self.url_writer.schedule(&state.filters);
            Ok(())
        })
    }

    fn persist(&self, state: &StoreState) -> Result<(), AppErrors> {
        if let Some(snapshot) = &self.snapshot {
            snapshot.save(state)?;
        }
        Ok(())
    }
}
