//! Signed-in account and the favorites workflow.

use crate::api::ApiClient;
use crate::credentials::StoredCredentials;
use crate::error::{Result, SnoozeError};
use crate::story::{Story, StoryId, StoryRecord};
use crate::story_list::StoryList;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Account as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub favorites: Vec<StoryRecord>,
    /// Stories this account submitted.
    #[serde(default)]
    pub stories: Vec<StoryRecord>,
}

#[derive(Deserialize)]
struct AuthResponse {
    user: UserRecord,
    token: String,
}

#[derive(Deserialize)]
struct UserResponse {
    user: UserRecord,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    user: SignupFields<'a>,
}

#[derive(Serialize)]
struct SignupFields<'a> {
    username: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    user: LoginFields<'a>,
}

#[derive(Serialize)]
struct LoginFields<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

/// The signed-in account.
///
/// Holds the session token used for every authenticated call. Favorites never
/// contain two stories with the same id.
#[derive(Clone)]
pub struct User {
    username: String,
    name: String,
    created_at: OffsetDateTime,
    token: String,
    favorites: Vec<Story>,
    own_stories: Vec<Story>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .field("token", &"<redacted>")
            .field("favorites", &self.favorites.len())
            .field("own_stories", &self.own_stories.len())
            .finish()
    }
}

impl User {
    /// Build a user from an account record and its session token.
    pub fn from_record(record: UserRecord, token: impl Into<String>) -> Self {
        let mut user = Self {
            username: record.username,
            name: record.name,
            created_at: record.created_at,
            token: token.into(),
            favorites: Vec::with_capacity(record.favorites.len()),
            own_stories: record.stories.into_iter().map(Story::from).collect(),
        };
        for favorite in record.favorites {
            user.insert_favorite(Story::from(favorite));
        }
        user
    }

    /// Register a new account and return it signed in.
    pub async fn signup(api: &ApiClient, username: &str, password: &str, name: &str) -> Result<Self> {
        let request = api.request(Method::POST, &["signup"])?.json(&SignupRequest {
            user: SignupFields {
                username,
                password,
                name,
            },
        });
        let response: AuthResponse = api.send_json(request).await?;
        info!(username = %response.user.username, "Signed up");
        Ok(Self::from_record(response.user, response.token))
    }

    /// Sign in with a username and password.
    pub async fn login(api: &ApiClient, username: &str, password: &str) -> Result<Self> {
        let request = api.request(Method::POST, &["login"])?.json(&LoginRequest {
            user: LoginFields { username, password },
        });
        let response: AuthResponse = api.send_json(request).await?;
        info!(username = %response.user.username, "Logged in");
        Ok(Self::from_record(response.user, response.token))
    }

    /// Rebuild the user from a previously issued token.
    ///
    /// Never fails: an expired token, unknown user, or network problem all
    /// yield `None` so the caller can carry on signed out.
    pub async fn restore_session(api: &ApiClient, token: &str, username: &str) -> Option<Self> {
        match Self::fetch_account(api, token, username).await {
            Ok(user) => {
                debug!(username = %user.username, "Session restored");
                Some(user)
            }
            Err(e) => {
                warn!(username = %username, error = %e, "Session restore failed, continuing signed out");
                None
            }
        }
    }

    pub(crate) async fn fetch_account(api: &ApiClient, token: &str, username: &str) -> Result<Self> {
        let request = api
            .request(Method::GET, &["users", username])?
            .query(&[("token", token)]);
        let response: UserResponse = api.send_json(request).await?;
        Ok(Self::from_record(response.user, token))
    }

    /// Flip the favorite state of `story_id`, returning the new state.
    ///
    /// `currently_favorited` selects the branch: `false` adds, `true`
    /// removes. See [`add_favorite`](Self::add_favorite) and
    /// [`remove_favorite`](Self::remove_favorite).
    pub async fn toggle_favorite(
        &mut self,
        api: &ApiClient,
        story_id: &StoryId,
        currently_favorited: bool,
        stories: &StoryList,
    ) -> Result<bool> {
        if currently_favorited {
            self.remove_favorite(api, story_id).await?;
            Ok(false)
        } else {
            self.add_favorite(api, story_id, stories).await?;
            Ok(true)
        }
    }

    /// Register `story_id` as a favorite, then add the matching story from
    /// `stories` to the local favorites.
    ///
    /// The story must be in `stories`; otherwise this is a
    /// [`SnoozeError::Validation`] and nothing is sent. Local favorites only
    /// change after the API confirms. Adding an existing favorite again leaves
    /// the collection as it was.
    pub async fn add_favorite(
        &mut self,
        api: &ApiClient,
        story_id: &StoryId,
        stories: &StoryList,
    ) -> Result<()> {
        let story = stories.find(story_id).cloned().ok_or_else(|| {
            SnoozeError::validation(format!("story {story_id} is not in the provided story list"))
        })?;

        let request = api
            .request(Method::POST, &["users", self.username.as_str(), "favorites", story_id.as_str()])?
            .json(&TokenBody { token: &self.token });
        api.send(request).await?;

        if self.insert_favorite(story) {
            debug!(story_id = %story_id, "Favorite added");
        } else {
            debug!(story_id = %story_id, "Story was already a favorite");
        }
        Ok(())
    }

    /// Remove `story_id` from favorites on the API, then locally.
    ///
    /// Local favorites only change after the API confirms. Removing a story
    /// that is not a favorite locally is not an error.
    pub async fn remove_favorite(&mut self, api: &ApiClient, story_id: &StoryId) -> Result<()> {
        let request = api
            .request(Method::DELETE, &["users", self.username.as_str(), "favorites", story_id.as_str()])?
            .json(&TokenBody { token: &self.token });
        api.send(request).await?;

        let removed = self.drop_favorite(story_id);
        debug!(story_id = %story_id, removed, "Favorite removed");
        Ok(())
    }

    /// Returns false when a story with the same id is already present.
    fn insert_favorite(&mut self, story: Story) -> bool {
        if self.is_favorite(story.id()) {
            return false;
        }
        self.favorites.push(story);
        true
    }

    fn drop_favorite(&mut self, story_id: &StoryId) -> usize {
        let before = self.favorites.len();
        self.favorites.retain(|s| s.id() != story_id);
        before - self.favorites.len()
    }

    /// Track a story this user just submitted via
    /// [`StoryList::add_story`].
    pub fn record_own_story(&mut self, story: Story) {
        if !self.is_own_story(story.id()) {
            self.own_stories.insert(0, story);
        }
    }

    pub fn is_favorite(&self, story_id: &StoryId) -> bool {
        self.favorites.iter().any(|s| s.id() == story_id)
    }

    pub fn is_own_story(&self, story_id: &StoryId) -> bool {
        self.own_stories.iter().any(|s| s.id() == story_id)
    }

    pub fn favorites(&self) -> &[Story] {
        &self.favorites
    }

    pub fn own_stories(&self) -> &[Story] {
        &self.own_stories
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// What to persist so the next start can call
    /// [`restore_session`](Self::restore_session).
    pub fn credentials(&self) -> StoredCredentials {
        StoredCredentials {
            username: self.username.clone(),
            token: self.token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::tests::story;
    use time::macros::datetime;

    fn record(favorites: Vec<StoryRecord>) -> UserRecord {
        UserRecord {
            username: "ada".into(),
            name: "Ada Lovelace".into(),
            created_at: datetime!(2024-01-01 0:00 UTC),
            favorites,
            stories: vec![],
        }
    }

    #[test]
    fn duplicate_favorites_in_record_are_collapsed() {
        let s1 = StoryRecord::from(story("S1", "http://a.com"));
        let user = User::from_record(record(vec![s1.clone(), s1]), "tok");
        assert_eq!(user.favorites().len(), 1);
        assert!(user.is_favorite(&StoryId::from("S1")));
    }

    #[test]
    fn insert_and_drop_keep_ids_unique() {
        let mut user = User::from_record(record(vec![]), "tok");
        assert!(user.insert_favorite(story("S1", "http://a.com")));
        assert!(!user.insert_favorite(story("S1", "http://a.com")));
        assert_eq!(user.favorites().len(), 1);

        assert_eq!(user.drop_favorite(&StoryId::from("S1")), 1);
        assert_eq!(user.drop_favorite(&StoryId::from("S1")), 0);
        assert!(user.favorites().is_empty());
    }

    #[test]
    fn debug_output_hides_token() {
        let user = User::from_record(record(vec![]), "secret-token");
        let out = format!("{user:?}");
        assert!(!out.contains("secret-token"));
        assert!(out.contains("ada"));
    }

    #[test]
    fn credentials_carry_username_and_token() {
        let user = User::from_record(record(vec![]), "tok-1");
        let creds = user.credentials();
        assert_eq!(creds.username, "ada");
        assert_eq!(creds.token, "tok-1");
    }

    #[test]
    fn record_own_story_puts_newest_first_once() {
        let mut user = User::from_record(record(vec![]), "tok");
        user.record_own_story(story("S1", "http://a.com"));
        user.record_own_story(story("S2", "http://b.com"));
        user.record_own_story(story("S2", "http://b.com"));
        let ids: Vec<&str> = user.own_stories().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["S2", "S1"]);
    }
}
