use crate::filter::errors::FilterError;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Wire spelling of an unconstrained filter dimension.
pub const ANY: &str = "any";
pub const DEFAULT_LOCATION: &str = "Минск";
pub const DEFAULT_LONGITUDE: f64 = 27.561831;
pub const DEFAULT_LATITUDE: f64 = 53.902284;

/// A filter dimension that is either left open or pinned to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint<T> {
    Unconstrained,
    Value(T),
}

impl<T> Default for Constraint<T> {
    fn default() -> Self {
        Constraint::Unconstrained
    }
}

impl<T> Constraint<T> {
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Constraint::Unconstrained)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Constraint::Unconstrained => None,
            Constraint::Value(value) => Some(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Constraint::Unconstrained => None,
            Constraint::Value(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Constraint<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Constraint::Unconstrained, Constraint::Value)
    }
}

impl<T: Display> Display for Constraint<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Unconstrained => write!(f, "{ANY}"),
            Constraint::Value(value) => write!(f, "{value}"),
        }
    }
}

impl<T: FromStr<Err = FilterError>> FromStr for Constraint<T> {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | ANY => Ok(Constraint::Unconstrained),
            value => Ok(Constraint::Value(value.parse()?)),
        }
    }
}

impl<T: Display> Serialize for Constraint<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr<Err = FilterError>> Deserialize<'de> for Constraint<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Constraint::Unconstrained),
            Some(raw) => raw.parse().map_err(D::Error::custom),
        }
    }
}

/// Inclusive pair of optional bounds; `None` on a side means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Option<T>; 2]", into = "[Option<T>; 2]")]
pub struct Bounds<T: Clone> {
    pub from: Option<T>,
    pub to: Option<T>,
}

impl<T: Clone> Bounds<T> {
    pub fn new(from: Option<T>, to: Option<T>) -> Self {
        Self { from, to }
    }

    pub fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn to_vec(&self) -> Vec<Option<T>> {
        vec![self.from.clone(), self.to.clone()]
    }
}

impl<T: Clone> Default for Bounds<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T: Clone> From<[Option<T>; 2]> for Bounds<T> {
    fn from([from, to]: [Option<T>; 2]) -> Self {
        Self { from, to }
    }
}

impl<T: Clone> From<Bounds<T>> for [Option<T>; 2] {
    fn from(bounds: Bounds<T>) -> Self {
        [bounds.from, bounds.to]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            longitude: DEFAULT_LONGITUDE,
            latitude: DEFAULT_LATITUDE,
        }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coordinates: Coordinates) -> Self {
        [coordinates.longitude, coordinates.latitude]
    }
}

/// Free-text location; parsing never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place(pub String);

impl Display for Place {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Place {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Place(s.to_string()))
    }
}

/// Defines an enum mirrored one-to-one by a GraphQL enum, spelled in
/// SCREAMING_SNAKE_CASE on the wire.
macro_rules! api_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FilterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(FilterError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(D::Error::custom)
            }
        }
    };
}

api_enum!(EventStatus, "status", {
    Upcoming => "UPCOMING",
    Ongoing => "ONGOING",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
    Archived => "ARCHIVED",
});

api_enum!(PaymentType, "paymentType", {
    Free => "FREE",
    PaymentRequired => "PAYMENT_REQUIRED",
    Donation => "DONATION",
});

api_enum!(EventType, "eventType", {
    Concert => "CONCERT",
    Exhibition => "EXHIBITION",
    Theater => "THEATER",
    Festival => "FESTIVAL",
    Conference => "CONFERENCE",
    Workshop => "WORKSHOP",
    Sports => "SPORTS",
    Party => "PARTY",
    Meetup => "MEETUP",
    Lecture => "LECTURE",
    Cinema => "CINEMA",
    Standup => "STANDUP",
    Excursion => "EXCURSION",
    MasterClass => "MASTER_CLASS",
    Charity => "CHARITY",
    ForKids => "FOR_KIDS",
    Other => "OTHER",
});

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// The user's current search constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub location: Constraint<Place>,
    pub status: Constraint<EventStatus>,
    pub payment_type: Constraint<PaymentType>,
    pub event_type: Constraint<EventType>,
    pub event_properties: BTreeSet<String>,
    pub price_range: Bounds<f64>,
    pub date_range: Bounds<String>,
    pub coordinates: Coordinates,
    pub currency: Constraint<Place>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_location(DEFAULT_LOCATION)
    }
}

impl FilterState {
    pub fn with_location(location: &str) -> Self {
        Self {
            location: Constraint::Value(Place(location.to_string())),
            status: Constraint::Unconstrained,
            payment_type: Constraint::Unconstrained,
            event_type: Constraint::Unconstrained,
            event_properties: BTreeSet::new(),
            price_range: Bounds::unbounded(),
            date_range: Bounds::unbounded(),
            coordinates: Coordinates::default(),
            currency: Constraint::Unconstrained,
        }
    }
}
