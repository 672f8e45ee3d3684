use crate::filter::params::{ParamValue, QueryParams};
use crate::filter::state::{
    Bounds, Constraint, Coordinates, EventStatus, EventType, FilterState, PaymentType, Place,
};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::{debug, warn};

const NULL_LITERAL: &str = "null";

/// The two shapes a date range arrives in: a comma-joined string decoded from
/// the URL, or a pair sent by filter controls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateRangeInput {
    Joined(String),
    Pair(Vec<Option<String>>),
}

impl Default for DateRangeInput {
    fn default() -> Self {
        DateRangeInput::Pair(vec![])
    }
}

impl DateRangeInput {
    pub fn normalize(self) -> Bounds<String> {
        match self {
            DateRangeInput::Joined(joined) => {
                let mut parts = joined.split(',').map(|part| match part.trim() {
                    "" | NULL_LITERAL => None,
                    date => Some(date.to_string()),
                });
                Bounds::new(parts.next().flatten(), parts.next().flatten())
            }
            DateRangeInput::Pair(pair) => {
                let mut parts = pair.into_iter();
                Bounds::new(parts.next().flatten(), parts.next().flatten())
            }
        }
    }
}

/// A partial filter state. Every present field replaces the current one.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPatch {
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Constraint<Place>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Constraint<EventStatus>>,
    #[serde(default, deserialize_with = "present")]
    pub payment_type: Option<Constraint<PaymentType>>,
    #[serde(default, deserialize_with = "present")]
    pub event_type: Option<Constraint<EventType>>,
    #[serde(default, deserialize_with = "present")]
    pub event_properties: Option<BTreeSet<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price_range: Option<Bounds<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub date_range: Option<DateRangeInput>,
    #[serde(default, deserialize_with = "present")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "present")]
    pub currency: Option<Constraint<Place>>,
}

/// A key that is present always yields `Some`; an explicit `null` becomes the
/// field's unconstrained default instead of "no change".
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?.unwrap_or_default()))
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        *self == FilterPatch::default()
    }

    /// Shallow merge over `state`; only the date range is normalised on the way.
    pub fn merge_into(self, state: &FilterState) -> FilterState {
        FilterState {
            location: self.location.unwrap_or_else(|| state.location.clone()),
            status: self.status.unwrap_or(state.status),
            payment_type: self.payment_type.unwrap_or(state.payment_type),
            event_type: self.event_type.unwrap_or(state.event_type),
            event_properties: self
                .event_properties
                .unwrap_or_else(|| state.event_properties.clone()),
            price_range: self.price_range.unwrap_or_else(|| state.price_range.clone()),
            date_range: self
                .date_range
                .map(DateRangeInput::normalize)
                .unwrap_or_else(|| state.date_range.clone()),
            coordinates: self.coordinates.unwrap_or(state.coordinates),
            currency: self.currency.unwrap_or_else(|| state.currency.clone()),
        }
    }
}

fn constraint<T: FromStr>(key: &str, value: &ParamValue) -> Option<Constraint<T>>
where
    T::Err: std::fmt::Display,
{
    match value {
        ParamValue::Null => Some(Constraint::Unconstrained),
        ParamValue::Text(text) => match text.parse::<T>() {
            Ok(parsed) => Some(Constraint::Value(parsed)),
            Err(err) => {
                warn!("ignoring {key}: {err}");
                None
            }
        },
        _ => {
            warn!("ignoring {key}: expected a single value");
            None
        }
    }
}

fn event_properties(value: &ParamValue) -> Option<BTreeSet<String>> {
    match value {
        ParamValue::Text(text) => Some(
            text.split(',')
                .map(str::trim)
                .filter(|property| !property.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        ParamValue::Texts(texts) => Some(texts.iter().flatten().cloned().collect()),
        ParamValue::Null => Some(BTreeSet::new()),
        ParamValue::Numbers(_) => None,
    }
}

fn price_range(value: &ParamValue) -> Option<Bounds<f64>> {
    match value {
        ParamValue::Numbers(numbers) => {
            let mut numbers = numbers.iter().copied();
            Some(Bounds::new(numbers.next().flatten(), numbers.next().flatten()))
        }
        ParamValue::Null => Some(Bounds::unbounded()),
        _ => None,
    }
}

fn date_range(value: &ParamValue) -> Option<DateRangeInput> {
    match value {
        ParamValue::Text(joined) => Some(DateRangeInput::Joined(joined.clone())),
        ParamValue::Texts(pair) => Some(DateRangeInput::Pair(pair.clone())),
        ParamValue::Null => Some(DateRangeInput::Pair(vec![])),
        ParamValue::Numbers(_) => None,
    }
}

fn coordinates(value: &ParamValue) -> Option<Coordinates> {
    match value {
        ParamValue::Numbers(numbers) => match numbers.as_slice() {
            [Some(longitude), Some(latitude)] => Some(Coordinates {
                longitude: *longitude,
                latitude: *latitude,
            }),
            _ => None,
        },
        _ => None,
    }
}

impl From<&QueryParams> for FilterPatch {
    fn from(params: &QueryParams) -> Self {
        let mut patch = FilterPatch::default();
        for (key, value) in params.iter() {
            match key {
                "location" => patch.location = constraint(key, value),
                "status" => patch.status = constraint(key, value),
                "paymentType" => patch.payment_type = constraint(key, value),
                "eventType" => patch.event_type = constraint(key, value),
                "eventProperties" => patch.event_properties = event_properties(value),
                "priceRange" => patch.price_range = price_range(value),
                "dateRange" => patch.date_range = date_range(value),
                "coordinates" => patch.coordinates = coordinates(value),
                "currency" => patch.currency = constraint(key, value),
                other => debug!("ignoring query parameter {other}"),
            }
        }
        patch
    }
}
