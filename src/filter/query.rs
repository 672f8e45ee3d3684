use crate::filter::state::{Bounds, EventStatus, EventType, FilterState, PaymentType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Variables of the event listing query. Absent fields are not sent.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsFilterInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<[Option<String>; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

// Offset-less datetimes are read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Some(datetime) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(datetime.and_utc());
    }
    Some(
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc(),
    )
}

/// Full ISO-8601 timestamp for a date or datetime, `None` when unparseable.
pub fn to_iso_timestamp(value: &str) -> Option<String> {
    parse_timestamp(value.trim())
        .map(|timestamp| timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// Null bounds are dropped, so a one-sided range is sent as a single element.
fn price_range(bounds: &Bounds<f64>) -> Option<Vec<f64>> {
    if bounds.is_unbounded() {
        return None;
    }
    Some(bounds.to_vec().into_iter().flatten().collect())
}

fn date_range(bounds: &Bounds<String>) -> Option<[Option<String>; 2]> {
    if bounds.is_unbounded() {
        return None;
    }
    Some([
        bounds.from.as_deref().and_then(to_iso_timestamp),
        bounds.to.as_deref().and_then(to_iso_timestamp),
    ])
}

impl From<&FilterState> for EventsFilterInput {
    fn from(state: &FilterState) -> Self {
        Self {
            location: state.location.as_option().map(|place| place.0.clone()),
            status: state.status.into_option(),
            payment_type: state.payment_type.into_option(),
            event_type: state.event_type.into_option(),
            price_range: price_range(&state.price_range),
            date_range: date_range(&state.date_range),
            currency: state.currency.as_option().map(|currency| currency.0.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::state::{Constraint, Place};
    use serde_json::json;

    #[test]
    fn one_sided_price_range_drops_null() {
        let state = FilterState {
            price_range: Bounds::new(Some(1000.0), None),
            ..Default::default()
        };
        let input = EventsFilterInput::from(&state);
        assert_eq!(input.price_range, Some(vec![1000.0]));
    }

    #[test]
    fn unbounded_ranges_are_absent() {
        let input = EventsFilterInput::from(&FilterState::default());
        let json = serde_json::to_value(&input).expect("Failed to serialize");
        assert_eq!(json, json!({ "location": "Минск" }));
    }

    #[test]
    fn date_range_becomes_timestamps() {
        let state = FilterState {
            date_range: Bounds::new(Some("2024-01-01".to_string()), None),
            ..Default::default()
        };
        let json = serde_json::to_value(EventsFilterInput::from(&state))
            .expect("Failed to serialize");
        assert_eq!(json["dateRange"], json!(["2024-01-01T00:00:00.000Z", null]));
    }

    #[test]
    fn unparseable_date_becomes_null() {
        let state = FilterState {
            date_range: Bounds::new(Some("soon".to_string()), Some("2024-05-02".to_string())),
            ..Default::default()
        };
        let input = EventsFilterInput::from(&state);
        assert_eq!(
            input.date_range,
            Some([None, Some("2024-05-02T00:00:00.000Z".to_string())])
        );
    }

    #[test]
    fn rfc3339_dates_are_normalised_to_utc() {
        assert_eq!(
            to_iso_timestamp("2024-01-01T03:00:00+03:00"),
            Some("2024-01-01T00:00:00.000Z".to_string())
        );
    }

    #[test]
    fn offsetless_datetimes_are_read_as_utc() {
        assert_eq!(
            to_iso_timestamp("2024-01-01T10:00:00"),
            Some("2024-01-01T10:00:00.000Z".to_string())
        );
        assert_eq!(
            to_iso_timestamp("2024-01-01T10:00"),
            Some("2024-01-01T10:00:00.000Z".to_string())
        );
        assert_eq!(
            to_iso_timestamp("2024-01-01 10:00:00"),
            Some("2024-01-01T10:00:00.000Z".to_string())
        );
        assert_eq!(
            to_iso_timestamp("2024-01-01T10:00:00.250"),
            Some("2024-01-01T10:00:00.250Z".to_string())
        );
        assert_eq!(to_iso_timestamp("2024-13-01T10:00"), None);
    }

    #[test]
    fn constrained_enums_are_included() {
        let state = FilterState {
            location: Constraint::Unconstrained,
            status: Constraint::Value(EventStatus::Upcoming),
            payment_type: Constraint::Value(PaymentType::PaymentRequired),
            event_type: Constraint::Value(EventType::MasterClass),
            currency: Constraint::Value(Place("BYN".to_string())),
            ..Default::default()
        };
        let json = serde_json::to_value(EventsFilterInput::from(&state))
            .expect("Failed to serialize");
        assert_eq!(
            json,
            json!({
                "status": "UPCOMING",
                "paymentType": "PAYMENT_REQUIRED",
                "eventType": "MASTER_CLASS",
                "currency": "BYN",
            })
        );
    }

    #[test]
    fn negative_prices_are_sent_as_is() {
        let state = FilterState {
            price_range: Bounds::new(Some(-5.0), Some(10.0)),
            ..Default::default()
        };
        assert_eq!(
            EventsFilterInput::from(&state).price_range,
            Some(vec![-5.0, 10.0])
        );
    }
}
