//! Story value object and its wire records.

use crate::error::{Result, SnoozeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use url::Url;

/// API-assigned story identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Story as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    pub story_id: StoryId,
    pub title: String,
    pub author: String,
    pub url: String,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields a user supplies when submitting a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStory {
    pub title: String,
    pub author: String,
    pub url: String,
}

impl NewStory {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            url: url.into(),
        }
    }
}

/// One story. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    id: StoryId,
    title: String,
    author: String,
    url: String,
    submitter: String,
    created_at: OffsetDateTime,
}

impl Story {
    pub fn id(&self) -> &StoryId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Username of the account that posted the story.
    pub fn submitter(&self) -> &str {
        &self.submitter
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Host component of the story URL, e.g. `example.com` for
    /// `https://example.com/a`.
    ///
    /// A URL that does not parse, or has no host, is a [`SnoozeError::Format`].
    pub fn host_name(&self) -> Result<String> {
        let parsed = Url::parse(&self.url).map_err(|e| {
            SnoozeError::format(format!("story {} has invalid url {:?}: {e}", self.id, self.url))
        })?;
        parsed.host_str().map(str::to_string).ok_or_else(|| {
            SnoozeError::format(format!("story {} url {:?} has no host", self.id, self.url))
        })
    }
}

impl From<StoryRecord> for Story {
    fn from(record: StoryRecord) -> Self {
        Self {
            id: record.story_id,
            title: record.title,
            author: record.author,
            url: record.url,
            submitter: record.username,
            created_at: record.created_at,
        }
    }
}

impl From<Story> for StoryRecord {
    fn from(story: Story) -> Self {
        Self {
            story_id: story.id,
            title: story.title,
            author: story.author,
            url: story.url,
            username: story.submitter,
            created_at: story.created_at,
        }
    }
}
