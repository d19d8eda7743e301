//! Story list fetching and submission against a mock API.

mod common;

use common::{TOKEN, api, ids, story_json, unreachable_api, user_with_favorites};
use serde_json::json;
use snooze::{ApiClient, ClientConfig, NewStory, SnoozeError, StoryId, StoryList};
use time::macros::datetime;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod fetch {
    use super::*;

    #[tokio::test]
    async fn test_fetch_all_keeps_api_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stories": [story_json("S1"), story_json("S2")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let list = StoryList::fetch_all(&api(&server)).await.unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(ids(list.stories()), ["S1", "S2"]);
        let first = list.get(0).unwrap();
        assert_eq!(first.title(), "Story S1");
        assert_eq!(first.submitter(), "ada");
        assert_eq!(first.created_at(), datetime!(2024-03-01 12:30:00 UTC));
        assert_eq!(first.host_name().unwrap(), "s1.example.com");
    }

    #[tokio::test]
    async fn test_fetch_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "stories": [] })))
            .mount(&server)
            .await;

        let list = StoryList::fetch_all(&api(&server)).await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_sends_skip_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .and(query_param("skip", "25"))
            .and(query_param("limit", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stories": [story_json("S26")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let list = StoryList::fetch_page(&api(&server), 25, 25).await.unwrap();
        assert_eq!(ids(list.stories()), ["S26"]);
    }

    #[tokio::test]
    async fn test_missing_fields_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stories": [{ "storyId": "S1" }]
            })))
            .mount(&server)
            .await;

        match StoryList::fetch_all(&api(&server)).await {
            Err(SnoozeError::Format(_)) => {}
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        assert!(matches!(
            StoryList::fetch_all(&api(&server)).await,
            Err(SnoozeError::Format(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stories": [story_json("S1"), story_json("S2"), story_json("S3")]
            })))
            .mount(&server)
            .await;

        let mut config = ClientConfig::new(server.uri());
        config.max_body_bytes = 64;
        let api = ApiClient::new(config).unwrap();

        match StoryList::fetch_all(&api).await {
            Err(SnoozeError::Format(msg)) => assert!(msg.contains("64")),
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        match StoryList::fetch_all(&unreachable_api()).await {
            Err(SnoozeError::Transport(_)) => {}
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        match StoryList::fetch_all(&api(&server)).await {
            Err(SnoozeError::Transport(msg)) => assert!(msg.contains("503")),
            other => panic!("expected Transport error, got {other:?}"),
        }
    }
}

mod add_story {
    use super::*;

    #[tokio::test]
    async fn test_returns_echoed_story() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stories"))
            .and(body_json(json!({
                "token": TOKEN,
                "story": { "title": "T", "author": "A", "url": "http://x.com" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "story": {
                    "storyId": "S9",
                    "title": "T",
                    "author": "A",
                    "url": "http://x.com",
                    "username": "ada",
                    "createdAt": "2024-05-05T10:00:00.000Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = user_with_favorites(vec![]);
        let draft = NewStory::new("T", "A", "http://x.com");
        let story = StoryList::add_story(&api(&server), &user, &draft).await.unwrap();

        assert_eq!(story.id(), &StoryId::from("S9"));
        assert_eq!(story.title(), "T");
        assert_eq!(story.author(), "A");
        assert_eq!(story.url(), "http://x.com");
        assert_eq!(story.submitter(), user.username());
        assert_eq!(story.host_name().unwrap(), "x.com");
    }

    #[tokio::test]
    async fn test_rejected_token_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "status": 401, "title": "Unauthorized", "message": "A valid token must be provided." }
            })))
            .mount(&server)
            .await;

        let user = user_with_favorites(vec![]);
        let draft = NewStory::new("T", "A", "http://x.com");
        match StoryList::add_story(&api(&server), &user, &draft).await {
            Err(SnoozeError::Auth(msg)) => assert_eq!(msg, "A valid token must be provided."),
            other => panic!("expected Auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejected_fields_is_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stories"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "status": 400, "title": "Bad Request", "message": "instance.story.url does not conform to the \"uri\" format" }
            })))
            .mount(&server)
            .await;

        let user = user_with_favorites(vec![]);
        let draft = NewStory::new("T", "A", "not a url");
        match StoryList::add_story(&api(&server), &user, &draft).await {
            Err(SnoozeError::Validation(msg)) => assert!(msg.contains("uri")),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }
}
