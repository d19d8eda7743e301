//! Client-side data layer for a Hack-or-Snooze style story API.
//!
//! Models stories, story lists and the signed-in user, and keeps the user's
//! favorites in step with the API one request at a time.
//!
//! ```ignore
//! use snooze::{ApiClient, ClientConfig, StoryList, User};
//!
//! let api = ApiClient::new(ClientConfig::default())?;
//! let stories = StoryList::fetch_all(&api).await?;
//! let mut user = User::login(&api, "ada", "hunter2").await?;
//!
//! let first = stories.stories()[0].id().clone();
//! let favorited = user.is_favorite(&first);
//! user.toggle_favorite(&api, &first, favorited, &stories).await?;
//! ```

mod api;
mod credentials;
mod error;
mod story;
mod story_list;
mod user;

pub use api::{ApiClient, ClientConfig, DEFAULT_BASE_URL};
pub use credentials::{CredentialStore, StoredCredentials, config_dir};
pub use error::{Result, SnoozeError};
pub use story::{NewStory, Story, StoryId, StoryRecord};
pub use story_list::StoryList;
pub use user::{User, UserRecord};
