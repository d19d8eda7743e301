use super::{App, Flow};
use crate::ui;
use anyhow::Result;
use snooze::{NewStory, StoryList, User};
use tracing::warn;

impl App {
    pub(super) async fn log_in(&mut self) -> Result<Flow> {
        let username = ui::prompt_text("Username")?;
        let password = ui::prompt_password("Password")?;
        match User::login(&self.api, &username, &password).await {
            Ok(user) => self.sign_in(user),
            Err(e) => ui::pause(&format!("Login failed: {}", e))?,
        }
        Ok(Flow::Continue)
    }

    pub(super) async fn sign_up(&mut self) -> Result<Flow> {
        let name = ui::prompt_text("Name")?;
        let username = ui::prompt_text("Username")?;
        let password = ui::prompt_password("Password")?;
        match User::signup(&self.api, &username, &password, &name).await {
            Ok(user) => self.sign_in(user),
            Err(e) => ui::pause(&format!("Sign up failed: {}", e))?,
        }
        Ok(Flow::Continue)
    }

    pub(super) fn log_out(&mut self) -> Result<Flow> {
        self.user = None;
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, "Failed to clear stored credentials");
            }
        }
        Ok(Flow::Continue)
    }

    pub(super) async fn submit_story(&mut self) -> Result<Flow> {
        let Some(user) = self.user.as_mut() else {
            return Ok(Flow::Continue);
        };
        let title = ui::prompt_text("Title")?;
        let author = ui::prompt_text("Author")?;
        let url = ui::prompt_text("URL")?;
        let draft = NewStory::new(title, author, url);

        match StoryList::add_story(&self.api, user, &draft).await {
            Ok(story) => {
                user.record_own_story(story.clone());
                self.stories.prepend(story);
                ui::pause("Story submitted.")?;
            }
            Err(e) => ui::pause(&format!("Could not submit story: {}", e))?,
        }
        Ok(Flow::Continue)
    }

    /// Keep the user and remember their token for the next start.
    fn sign_in(&mut self, user: User) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&user.credentials()) {
                warn!(error = %e, "Failed to save credentials");
            }
        }
        self.user = Some(user);
    }
}
