//! Client for the events GraphQL endpoint.

mod errors;
mod queries;

use crate::data_models::{Event, EventId, EventInput};
use crate::filter::EventsFilterInput;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub use errors::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V> {
    operation_name: &'a str,
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Deserialize)]
struct GraphQlResponse<R> {
    data: Option<R>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Deserialize)]
struct EventsData {
    events: Vec<Event>,
}

#[derive(Deserialize)]
struct EventData {
    event: Option<Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEventData {
    create_event: Event,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEventData {
    update_event: Event,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteEventData {
    delete_event: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetFavoriteData {
    set_favorite: Event,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetParticipationData {
    set_participation: Event,
}

#[derive(Debug, Clone)]
pub struct GraphQlClient {
    endpoint: Url,
    client: Client,
}

impl GraphQlClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client,
        })
    }

    async fn execute<V, R>(&self, operation: &str, query: &str, variables: V) -> Result<R, ApiError>
    where
        V: Serialize,
        R: DeserializeOwned,
    {
        let request = GraphQlRequest {
            operation_name: operation,
            query,
            variables,
        };
        let response: GraphQlResponse<R> = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if !response.errors.is_empty() {
            let message = response
                .errors
                .into_iter()
                .map(|err| err.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::GraphQl {
                operation: operation.to_string(),
                message,
            });
        }
        debug!(operation, "events api responded");
        response
            .data
            .ok_or_else(|| ApiError::EmptyResponse(operation.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn events(&self, filter: &EventsFilterInput) -> Result<Vec<Event>, ApiError> {
        let data: EventsData = self
            .execute("Events", queries::EVENTS, json!({ "filter": filter }))
            .await?;
        Ok(data.events)
    }

    #[instrument(skip(self))]
    pub async fn event(&self, id: &str) -> Result<Option<Event>, ApiError> {
        let data: EventData = self
            .execute("Event", queries::EVENT, json!({ "id": id }))
            .await?;
        Ok(data.event)
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_event(&self, input: &EventInput) -> Result<Event, ApiError> {
        let data: CreateEventData = self
            .execute("CreateEvent", queries::CREATE_EVENT, json!({ "input": input }))
            .await?;
        Ok(data.create_event)
    }

    #[instrument(skip(self, input))]
    pub async fn update_event(&self, id: &str, input: &EventInput) -> Result<Event, ApiError> {
        let data: UpdateEventData = self
            .execute(
                "UpdateEvent",
                queries::UPDATE_EVENT,
                json!({ "id": id, "input": input }),
            )
            .await?;
        Ok(data.update_event)
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: &str) -> Result<bool, ApiError> {
        let data: DeleteEventData = self
            .execute("DeleteEvent", queries::DELETE_EVENT, json!({ "id": id }))
            .await?;
        Ok(data.delete_event)
    }

    #[instrument(skip(self))]
    pub async fn set_favorite(&self, id: &EventId, value: bool) -> Result<Event, ApiError> {
        let data: SetFavoriteData = self
            .execute(
                "SetFavorite",
                queries::SET_FAVORITE,
                json!({ "id": id, "value": value }),
            )
            .await?;
        Ok(data.set_favorite)
    }

    #[instrument(skip(self))]
    pub async fn set_participation(&self, id: &EventId, value: bool) -> Result<Event, ApiError> {
        let data: SetParticipationData = self
            .execute(
                "SetParticipation",
                queries::SET_PARTICIPATION,
                json!({ "id": id, "value": value }),
            )
            .await?;
        Ok(data.set_participation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_graphql_field_names() {
        let request = GraphQlRequest {
            operation_name: "Events",
            query: queries::EVENTS,
            variables: json!({ "filter": EventsFilterInput::default() }),
        };
        let body = serde_json::to_value(&request).expect("Failed to serialize");
        assert_eq!(body["operationName"], "Events");
        assert_eq!(body["variables"], json!({ "filter": {} }));
        assert!(body["query"]
            .as_str()
            .is_some_and(|query| query.contains("fragment EventFields on Event")));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let result = GraphQlClient::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::Endpoint(_))));
    }

    #[test]
    fn graphql_errors_are_read() {
        let response: GraphQlResponse<EventsData> =
            serde_json::from_str(r#"{"data": null, "errors": [{"message": "boom"}]}"#)
                .expect("Failed to deserialize");
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "boom");
    }
}
