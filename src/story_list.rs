//! Ordered story collection and the story endpoints.

use crate::api::ApiClient;
use crate::error::Result;
use crate::story::{NewStory, Story, StoryId, StoryRecord};
use crate::user::User;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Deserialize)]
struct StoriesResponse {
    stories: Vec<StoryRecord>,
}

#[derive(Deserialize)]
struct StoryResponse {
    story: StoryRecord,
}

#[derive(Serialize)]
struct NewStoryRequest<'a> {
    token: &'a str,
    story: &'a NewStory,
}

/// Stories in the order the API returned them (newest first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryList {
    stories: Vec<Story>,
}

impl StoryList {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }

    /// Fetch the public story list. No authentication required.
    pub async fn fetch_all(api: &ApiClient) -> Result<Self> {
        Self::fetch(api, None).await
    }

    /// Fetch one page of the public story list.
    pub async fn fetch_page(api: &ApiClient, skip: usize, limit: usize) -> Result<Self> {
        Self::fetch(api, Some((skip, limit))).await
    }

    async fn fetch(api: &ApiClient, page: Option<(usize, usize)>) -> Result<Self> {
        let mut request = api.request(Method::GET, &["stories"])?;
        if let Some((skip, limit)) = page {
            request = request.query(&[("skip", skip), ("limit", limit)]);
        }
        let response: StoriesResponse = api.send_json(request).await?;
        debug!(count = response.stories.len(), "Fetched stories");
        Ok(response.stories.into_iter().map(Story::from).collect())
    }

    /// Submit a new story on behalf of `user` and return it.
    ///
    /// The returned story is not added to any list; callers that want it
    /// shown must [`prepend`](Self::prepend) it themselves.
    pub async fn add_story(api: &ApiClient, user: &User, draft: &NewStory) -> Result<Story> {
        let request = api
            .request(Method::POST, &["stories"])?
            .json(&NewStoryRequest {
                token: user.token(),
                story: draft,
            });
        let response: StoryResponse = api.send_json(request).await?;
        let story = Story::from(response.story);
        info!(story_id = %story.id(), username = %user.username(), "Story submitted");
        Ok(story)
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Story> {
        self.stories.iter()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    pub fn find(&self, id: &StoryId) -> Option<&Story> {
        self.stories.iter().find(|s| s.id() == id)
    }

    /// Put a freshly submitted story at the front, matching API order.
    pub fn prepend(&mut self, story: Story) {
        self.stories.insert(0, story);
    }
}

impl From<Vec<Story>> for StoryList {
    fn from(stories: Vec<Story>) -> Self {
        Self::new(stories)
    }
}

impl FromIterator<Story> for StoryList {
    fn from_iter<I: IntoIterator<Item = Story>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StoryList {
    type Item = &'a Story;
    type IntoIter = std::slice::Iter<'a, Story>;

    fn into_iter(self) -> Self::IntoIter {
        self.stories.iter()
    }
}
