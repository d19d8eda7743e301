//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use snooze::{ApiClient, ClientConfig, User, UserRecord};
use std::time::Duration;
use wiremock::MockServer;

pub const TOKEN: &str = "tok-ada";

pub fn story_json(id: &str) -> Value {
    json!({
        "storyId": id,
        "title": format!("Story {id}"),
        "author": "Ada",
        "url": format!("https://{}.example.com/post", id.to_lowercase()),
        "username": "ada",
        "createdAt": "2024-03-01T12:30:00.000Z"
    })
}

pub fn user_json(favorites: Vec<Value>, stories: Vec<Value>) -> Value {
    json!({
        "username": "ada",
        "name": "Ada Lovelace",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "favorites": favorites,
        "stories": stories
    })
}

pub fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.uri())).expect("mock server uri is valid")
}

/// Client pointed at a port nothing listens on.
pub fn unreachable_api() -> ApiClient {
    let mut config = ClientConfig::new("http://127.0.0.1:1");
    config.connect_timeout = Duration::from_secs(1);
    config.timeout = Duration::from_secs(2);
    ApiClient::new(config).expect("valid url")
}

/// User "ada" holding `favorites`, built without any request.
pub fn user_with_favorites(favorites: Vec<Value>) -> User {
    let record: UserRecord =
        serde_json::from_value(user_json(favorites, vec![])).expect("valid user record");
    User::from_record(record, TOKEN)
}

pub fn ids(stories: &[snooze::Story]) -> Vec<&str> {
    stories.iter().map(|s| s.id().as_str()).collect()
}
