use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use event_finder::app_state::AppState;
use event_finder::configuration::{
    ApiSettings, Application, FilterSettings, Settings, SnapshotSettings,
};
use event_finder::create_app;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

type Requests = Arc<Mutex<Vec<Value>>>;

fn event_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("event {id}"),
        "location": "Минск",
        "coordinates": [27.56, 53.9],
        "startDate": "2024-06-01T18:00:00Z",
        "status": "UPCOMING",
        "paymentType": "FREE",
        "eventType": "CONCERT",
        "isFavorite": false,
        "isParticipating": false,
        "participantsCount": 0
    })
}

async fn graphql(requests: Requests, Json(body): Json<Value>) -> Json<Value> {
    requests.lock().unwrap().push(body.clone());
    let variables = &body["variables"];
    let id = variables["id"].as_str().unwrap_or_default().to_string();
    let response = match body["operationName"].as_str().unwrap_or_default() {
        "Events" => json!({ "data": { "events": [event_json("1"), event_json("2")] } }),
        "Event" if id == "404" => json!({ "data": { "event": null } }),
        "Event" => json!({ "data": { "event": event_json(&id) } }),
        "SetFavorite" if id == "broken" => {
            json!({ "data": null, "errors": [{ "message": "favorite refused" }] })
        }
        "SetFavorite" => {
            let mut event = event_json(&id);
            event["isFavorite"] = variables["value"].clone();
            json!({ "data": { "setFavorite": event } })
        }
        "SetParticipation" => {
            let mut event = event_json(&id);
            event["isParticipating"] = variables["value"].clone();
            event["participantsCount"] = json!(1);
            json!({ "data": { "setParticipation": event } })
        }
        "CreateEvent" => {
            let mut event = event_json("new");
            event["title"] = variables["input"]["title"].clone();
            json!({ "data": { "createEvent": event } })
        }
        "DeleteEvent" => json!({ "data": { "deleteEvent": id != "404" } }),
        other => json!({ "data": null, "errors": [{ "message": format!("unknown operation {other}") }] }),
    };
    Json(response)
}

async fn spawn_graphql_mock() -> (Url, Requests) {
    let requests: Requests = Arc::default();
    let recorded = requests.clone();
    let mock = Router::new().route(
        "/graphql",
        post(move |body| graphql(recorded.clone(), body)),
    );
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to read mock address");
    tokio::spawn(async move { axum::serve(listener, mock).await });
    let url = Url::parse(&format!("http://{addr}/graphql")).expect("Failed to create url");
    (url, requests)
}

fn settings(graphql_url: Url) -> Settings {
    Settings {
        application: Application {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        api: ApiSettings {
            graphql_url,
            timeout_secs: 5,
        },
        filters: FilterSettings {
            debounce_ms: 100,
            default_location: "Минск".to_string(),
        },
        snapshot: SnapshotSettings::default(),
    }
}

async fn create_test_app() -> (Router, AppState, Requests) {
    let (url, requests) = spawn_graphql_mock().await;
    let (app, state) = create_app(&settings(url)).expect("Failed to create an app");
    (app, state, requests)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_check_works() {
    let (app, _, _) = create_test_app().await;
    let (status, _) = send(&app, Method::GET, "/health_check", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn default_filters_are_served() {
    let (app, _, _) = create_test_app().await;
    let (status, body) = send(&app, Method::GET, "/filters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filters"]["location"], "Минск");
    assert_eq!(body["filters"]["status"], "any");
    assert_eq!(body["filters"]["priceRange"], json!([null, null]));
    assert_eq!(body["viewMode"], "grid");
    assert_eq!(body["isFullScreen"], false);
}

#[tokio::test]
async fn events_listing_sends_built_variables() {
    let (app, state, requests) = create_test_app().await;
    let (status, body) = send(
        &app,
        Method::GET,
        "/events?priceRange=500,&eventType=any&location=Minsk&dateRange=2024-01-01,null",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(state.cache.len(), 2);

    let requests = requests.lock().unwrap();
    let filter = &requests[0]["variables"]["filter"];
    assert_eq!(
        *filter,
        json!({
            "location": "Minsk",
            "priceRange": [500.0],
            "dateRange": ["2024-01-01T00:00:00.000Z", null],
        })
    );
}

#[tokio::test]
async fn filter_updates_write_location_once() {
    let (app, state, _) = create_test_app().await;
    for price in [100, 200, 300] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/filters",
            Some(json!({ "priceRange": [price, null], "status": "ONGOING" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    tokio::time::sleep(Duration::from_millis(400)).await;

    let (_, body) = send(&app, Method::GET, "/location", None).await;
    assert_eq!(body["writes"], 1);
    let query = body["query"].as_str().unwrap_or_default().to_string();
    assert!(query.contains("status=ONGOING"));
    assert!(query.contains("priceRange=300%2C"));
    assert_eq!(state.location.writes(), 1);
}

#[tokio::test]
async fn filter_variables_follow_the_store() {
    let (app, _, _) = create_test_app().await;
    send(
        &app,
        Method::POST,
        "/filters",
        Some(json!({ "location": "any", "dateRange": "2024-01-01,", "currency": "BYN" })),
    )
    .await;
    let (status, body) = send(&app, Method::GET, "/filters/variables", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "dateRange": ["2024-01-01T00:00:00.000Z", null], "currency": "BYN" })
    );

    let (_, body) = send(&app, Method::DELETE, "/filters", None).await;
    assert_eq!(body["filters"]["location"], "Минск");
    assert_eq!(body["filters"]["currency"], "any");
}

#[tokio::test]
async fn panel_and_view_mode_can_be_switched() {
    let (app, _, _) = create_test_app().await;
    let (_, body) = send(&app, Method::POST, "/filters/full_screen", Some(json!({}))).await;
    assert_eq!(body["isFullScreen"], true);
    let (_, body) = send(
        &app,
        Method::POST,
        "/filters/full_screen",
        Some(json!({ "open": true })),
    )
    .await;
    assert_eq!(body["isFullScreen"], true);

    let (status, body) = send(&app, Method::POST, "/view_mode", Some(json!({ "mode": "list" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["viewMode"], "list");
}

#[tokio::test]
async fn favorite_toggle_commits() {
    let (app, state, _) = create_test_app().await;
    let (status, body) = send(&app, Method::POST, "/event/7/favorite", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isFavorite"], true);
    assert!(state.cache.get("7").is_some_and(|event| event.is_favorite));
    assert_eq!(state.cache.pending_updates(), 0);
}

#[tokio::test]
async fn failed_favorite_is_rolled_back() {
    let (app, state, _) = create_test_app().await;
    let (status, body) = send(&app, Method::POST, "/event/broken/favorite", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("favorite refused")));
    assert!(state.cache.get("broken").is_some_and(|event| !event.is_favorite));
    assert_eq!(state.cache.pending_updates(), 0);
}

#[tokio::test]
async fn participation_toggle_works() {
    let (app, state, _) = create_test_app().await;
    let (status, body) = send(&app, Method::POST, "/event/3/participation", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isParticipating"], true);
    assert_eq!(body["participantsCount"], 1);
    assert!(state.cache.get("3").is_some_and(|event| event.is_participating));
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let (app, _, _) = create_test_app().await;
    let (status, _) = send(&app, Method::GET, "/event/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::POST, "/event/404/favorite", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_lifecycle_keeps_cache_in_step() {
    let (app, state, _) = create_test_app().await;
    let input = json!({
        "title": "Jazz night",
        "location": "Минск",
        "startDate": "2024-07-01T19:00:00Z",
        "paymentType": "PAYMENT_REQUIRED",
        "eventType": "CONCERT",
        "price": 25.0,
        "currency": "BYN"
    });
    let (status, body) = send(&app, Method::POST, "/events", Some(input)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Jazz night");
    assert!(state.cache.get("new").is_some());

    let (status, _) = send(&app, Method::DELETE, "/event/new", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.cache.get("new").is_none());
}
