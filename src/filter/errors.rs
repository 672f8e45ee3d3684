use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },
    #[error("malformed number {value:?} in {key}")]
    MalformedNumber { key: String, value: String },
    #[error("expected two coordinates, got {0}")]
    CoordinatesArity(usize),
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("navigation aborted: {0}")]
    Aborted(String),
}
