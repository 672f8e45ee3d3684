use crate::filter::errors::FilterError;
use crate::filter::params::{ParamValue, QueryParams};
use crate::filter::patch::FilterPatch;
use crate::filter::state::ANY;
use tracing::{debug, warn};
use url::form_urlencoded;

const NUMBER_PAIR_KEYS: [&str; 2] = ["priceRange", "squareFeet"];
const COORDINATES_KEY: &str = "coordinates";

fn parse_number(key: &str, piece: &str) -> Result<Option<f64>, FilterError> {
    let piece = piece.trim();
    if piece.is_empty() {
        return Ok(None);
    }
    match piece.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(FilterError::MalformedNumber {
            key: key.to_string(),
            value: piece.to_string(),
        }),
    }
}

fn parse_number_pair(key: &str, value: &str) -> ParamValue {
    let numbers = value
        .split(',')
        .map(|piece| {
            parse_number(key, piece).unwrap_or_else(|err| {
                warn!("{err}, treating it as unbounded");
                None
            })
        })
        .collect();
    ParamValue::Numbers(numbers)
}

fn parse_coordinates(value: &str) -> Result<ParamValue, FilterError> {
    let pieces = value
        .split(',')
        .map(|piece| {
            parse_number(COORDINATES_KEY, piece)?.ok_or_else(|| FilterError::MalformedNumber {
                key: COORDINATES_KEY.to_string(),
                value: piece.to_string(),
            })
        })
        .collect::<Result<Vec<f64>, FilterError>>()?;
    if pieces.len() != 2 {
        return Err(FilterError::CoordinatesArity(pieces.len()));
    }
    Ok(ParamValue::Numbers(pieces.into_iter().map(Some).collect()))
}

/// Reads a raw query string (with or without the leading `?`) into typed
/// parameters. Never fails: malformed pieces are logged and degraded.
pub fn parse_query_params(query: &str) -> QueryParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = QueryParams::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let key: &str = &key;
        let parsed = if NUMBER_PAIR_KEYS.contains(&key) {
            parse_number_pair(key, &value)
        } else if key == COORDINATES_KEY {
            match parse_coordinates(&value) {
                Ok(coordinates) => coordinates,
                Err(err) => {
                    warn!("dropping coordinates {value:?}: {err}");
                    continue;
                }
            }
        } else if value == ANY {
            ParamValue::Null
        } else {
            ParamValue::Text(value.to_string())
        };
        params.insert(key, parsed);
    }
    debug!(n_params = params.len(), "parsed query string");
    params
}

/// Query string to a cleaned partial filter state, ready for the store.
pub fn parse_filters(query: &str) -> FilterPatch {
    FilterPatch::from(&parse_query_params(query).cleaned())
}
