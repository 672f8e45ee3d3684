use crate::filter::debounce::Debouncer;
use crate::filter::errors::NavigationError;
use crate::filter::params::{ParamValue, QueryParams};
use crate::filter::state::FilterState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::form_urlencoded;

/// Somewhere a query string can be written to.
pub trait Navigator: Send + Sync {
    fn navigate(&self, query: &str) -> Result<(), NavigationError>;
}

/// In-memory location bar: remembers the last query and counts writes.
#[derive(Debug, Default)]
pub struct LocationHistory {
    current: RwLock<String>,
    writes: AtomicUsize,
}

impl LocationHistory {
    pub fn current(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Navigator for LocationHistory {
    fn navigate(&self, query: &str) -> Result<(), NavigationError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = query.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn to_query_params(state: &FilterState) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("location", ParamValue::Text(state.location.to_string()));
    params.insert("status", ParamValue::Text(state.status.to_string()));
    params.insert("paymentType", ParamValue::Text(state.payment_type.to_string()));
    params.insert("eventType", ParamValue::Text(state.event_type.to_string()));
    params.insert(
        "eventProperties",
        ParamValue::Texts(state.event_properties.iter().cloned().map(Some).collect()),
    );
    params.insert("priceRange", ParamValue::Numbers(state.price_range.to_vec()));
    params.insert("dateRange", ParamValue::Texts(state.date_range.to_vec()));
    params.insert(
        "coordinates",
        ParamValue::Numbers(vec![
            Some(state.coordinates.longitude),
            Some(state.coordinates.latitude),
        ]),
    );
    params.insert("currency", ParamValue::Text(state.currency.to_string()));
    params.cleaned()
}

/// Serializes the constrained part of `state`, without the leading `?`.
pub fn to_query_string(state: &FilterState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in to_query_params(state).iter() {
        serializer.append_pair(key, &value.to_string());
    }
    serializer.finish()
}

/// Writes filter changes to a [`Navigator`], coalescing bursts.
#[derive(Debug)]
pub struct UrlWriter {
    debouncer: Debouncer<String>,
}

impl UrlWriter {
    pub fn new(navigator: Arc<dyn Navigator>, delay: Duration) -> Self {
        let debouncer = Debouncer::new(delay, move |query: String| {
            match navigator.navigate(&query) {
                Ok(()) => debug!(%query, "location updated"),
                Err(err) => warn!(%query, "failed to update location: {err}"),
            }
        });
        Self { debouncer }
    }

    pub fn schedule(&self, state: &FilterState) {
        self.debouncer.call(to_query_string(state));
    }
}
