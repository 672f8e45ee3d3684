use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request to the events api failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("events api rejected {operation}: {message}")]
    GraphQl { operation: String, message: String },
    #[error("events api returned no data for {0}")]
    EmptyResponse(String),
    #[error("invalid events api url: {0}")]
    Endpoint(#[from] url::ParseError),
}
