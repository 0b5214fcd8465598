use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use voice_calendar_bridge::components::google_calendar::{
    self, CalendarEvent, CalendarProvider, EventQuery, GoogleCalendarClient, SendUpdates,
};
use voice_calendar_bridge::components::google_calendar::models::Attendee;
use voice_calendar_bridge::config::Config;
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, method, path, path_regex, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/service_account.json"
);

fn config_with(vars: Vec<(&'static str, String)>) -> Config {
    Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap()
}

/// Client authenticated with a fixed token against the mock server
fn token_client(server: &MockServer) -> GoogleCalendarClient {
    let config = config_with(vec![
        ("GOOGLE_ACCESS_TOKEN", "test-token".to_string()),
        ("GOOGLE_CALENDAR_API_BASE", server.uri()),
    ]);
    google_calendar::connect(&config).unwrap()
}

/// Service account key JSON whose token endpoint is the mock server
fn service_account_json(server: &MockServer) -> String {
    let raw = std::fs::read_to_string(FIXTURE).unwrap();
    let mut key: Value = serde_json::from_str(&raw).unwrap();
    key["token_uri"] = json!(format!("{}/token", server.uri()));
    key.to_string()
}

fn morning() -> EventQuery {
    EventQuery::window(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
    )
}

fn event_json(id: &str, summary: &str) -> Value {
    json!({
        "id": id,
        "summary": summary,
        "start": { "dateTime": "2024-06-01T09:00:00Z" },
        "end": { "dateTime": "2024-06-01T09:30:00Z" }
    })
}

#[tokio::test]
async fn test_list_events_query_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("timeMin", "2024-06-01T09:00:00Z"))
        .and(query_param("timeMax", "2024-06-01T10:00:00Z"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [event_json("a", "Dentist")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let events = token_client(&server)
        .list_events("primary", &morning())
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].summary.as_deref(), Some("Dentist"));
}

#[tokio::test]
async fn test_list_events_follows_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [event_json("b", "Standup")] })),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [event_json("a", "Dentist")],
            "nextPageToken": "page-2"
        })))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let events = token_client(&server)
        .list_events("primary", &morning())
        .await
        .unwrap();

    let ids: Vec<_> = events.iter().filter_map(|e| e.id.as_deref()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_calendar_id_is_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/calendars/team%231(@|%40)example\.com/events$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let events = token_client(&server)
        .list_events("team#1@example.com", &morning())
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_insert_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(query_param("sendUpdates", "all"))
        .and(body_partial_json(json!({
            "summary": "Dentist",
            "attendees": [{ "email": "pat@example.com" }],
            "reminders": { "useDefault": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "created-1",
            "summary": "Dentist",
            "htmlLink": "https://calendar.google.com/event?eid=created-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let event = CalendarEvent {
        summary: Some("Dentist".to_string()),
        attendees: vec![Attendee {
            email: "pat@example.com".to_string(),
            ..Default::default()
        }],
        reminders: Some(google_calendar::Reminders::standard()),
        ..Default::default()
    };
    let created = token_client(&server)
        .insert_event("primary", &event, SendUpdates::All)
        .await
        .unwrap();

    assert_eq!(created.id.as_deref(), Some("created-1"));
    assert!(created.html_link.is_some());
}

#[tokio::test]
async fn test_get_and_update_keep_unknown_fields() {
    let server = MockServer::start().await;
    let mut stored = event_json("abc123", "Dentist");
    stored["location"] = json!("Main St 1");

    Mock::given(method("GET"))
        .and(path("/calendars/primary/events/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored.clone()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/calendars/primary/events/abc123"))
        .and(body_partial_json(json!({ "location": "Main St 1", "summary": "Dentist" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server);
    let event = client.get_event("primary", "abc123").await.unwrap();
    assert_eq!(event.extra.get("location"), Some(&json!("Main St 1")));

    client.update_event("primary", "abc123", &event).await.unwrap();
}

#[tokio::test]
async fn test_delete_event() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/primary/events/abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/primary/events/gone"))
        .respond_with(ResponseTemplate::new(410).set_body_string("Resource has been deleted"))
        .mount(&server)
        .await;

    let client = token_client(&server);
    client.delete_event("primary", "abc123").await.unwrap();

    let err = client.delete_event("primary", "gone").await.unwrap_err();
    assert_eq!(err.kind(), "google_calendar");
    assert!(err.to_string().contains("HTTP 410"), "{}", err);
}

#[tokio::test]
async fn test_http_errors_carry_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let err = token_client(&server)
        .list_events("primary", &morning())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("fetch events"), "{}", message);
    assert!(message.contains("HTTP 500"), "{}", message);
    assert!(message.contains("backend exploded"), "{}", message);
}

#[tokio::test]
async fn test_list_calendars() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .and(query_param("maxResults", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "primary@example.com",
                "summary": "Front desk",
                "timeZone": "Europe/Helsinki",
                "accessRole": "owner",
                "primary": true
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let calendars = token_client(&server).list_calendars(1).await.unwrap();
    assert_eq!(calendars.len(), 1);
    assert_eq!(calendars[0].time_zone.as_deref(), Some("Europe/Helsinki"));
    assert_eq!(calendars[0].primary, Some(true));
}

#[tokio::test]
async fn test_service_account_token_is_exchanged_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "sa-token",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/calendarList"))
        .and(header("authorization", "Bearer sa-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(2)
        .mount(&server)
        .await;

    let config = config_with(vec![
        ("GOOGLE_SERVICE_ACCOUNT_JSON", service_account_json(&server)),
        ("GOOGLE_CALENDAR_API_BASE", server.uri()),
    ]);
    let client = google_calendar::connect(&config).unwrap();

    client.list_calendars(1).await.unwrap();
    client.list_calendars(1).await.unwrap();
}

#[tokio::test]
async fn test_rejected_token_exchange_fails_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_with(vec![
        ("GOOGLE_SERVICE_ACCOUNT_JSON", service_account_json(&server)),
        ("GOOGLE_CALENDAR_API_BASE", server.uri()),
    ]);
    let client = google_calendar::connect(&config).unwrap();

    assert!(client.list_events("primary", &morning()).await.is_err());
}

#[tokio::test]
async fn test_connect_without_credentials() {
    let config = config_with(vec![]);
    let err = google_calendar::connect(&config).err().unwrap();
    assert_eq!(err.kind(), "credentials");
}
