use crate::filter::{Coordinates, EventStatus, EventType, PaymentType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EventId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub payment_type: PaymentType,
    pub event_type: EventType,
    #[serde(default)]
    pub event_properties: Vec<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_participating: bool,
    #[serde(default)]
    pub participants_count: u32,
}

/// Organizer-supplied fields for creating or editing an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub payment_type: PaymentType,
    pub event_type: EventType,
    #[serde(default)]
    pub event_properties: Vec<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[cfg(test)]
impl Event {
    pub fn dummy(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: "test event".to_string(),
            description: None,
            location: "Минск".to_string(),
            coordinates: Some(Coordinates::default()),
            start_date: DateTime::<Utc>::default(),
            end_date: None,
            status: EventStatus::Upcoming,
            payment_type: PaymentType::Free,
            event_type: EventType::Concert,
            event_properties: vec![],
            price: None,
            currency: None,
            is_favorite: false,
            is_participating: false,
            participants_count: 0,
        }
    }
}
