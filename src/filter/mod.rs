//! Search filter state: parsing it from the location, keeping it in a store,
//! turning it into listing query variables and writing it back.

mod debounce;
pub mod errors;
pub mod params;
pub mod patch;
pub mod query;
pub mod state;
pub mod store;
pub mod url_parser;
pub mod url_writer;

pub use debounce::Debouncer;
pub use errors::{FilterError, NavigationError};
pub use params::{ParamValue, QueryParams};
pub use patch::{DateRangeInput, FilterPatch};
pub use query::EventsFilterInput;
pub use state::{
    Bounds, Constraint, Coordinates, EventStatus, EventType, FilterState, PaymentType, Place,
    ViewMode,
};
pub use store::{reduce, FilterAction, FilterStore, StoreState};
pub use url_parser::{parse_filters, parse_query_params};
pub use url_writer::{to_query_string, LocationHistory, Navigator, UrlWriter};
