mod account;

use crate::config::RuntimeConfig;
use crate::open_url::open_url;
use crate::ui::{self, MenuChoice};
use crate::util::sanitize::sanitize_for_terminal;
use anyhow::Result;
use snooze::{ApiClient, CredentialStore, Story, StoryId, StoryList, User};
use tracing::warn;

const LABEL_WIDTH: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listing {
    All,
    Favorites,
    Mine,
}

impl Listing {
    fn title(self) -> &'static str {
        match self {
            Listing::All => "Stories (b = back, q = quit). Select a story to open or favorite it.",
            Listing::Favorites => "Favorites (b = back, q = quit)",
            Listing::Mine => "My stories (b = back, q = quit)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Browse(Listing),
    Submit,
    LogIn,
    SignUp,
    LogOut,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Browse(Listing::All) => "Stories",
            Action::Browse(Listing::Favorites) => "Favorites",
            Action::Browse(Listing::Mine) => "My stories",
            Action::Submit => "Submit story",
            Action::LogIn => "Log in",
            Action::SignUp => "Sign up",
            Action::LogOut => "Log out",
            Action::Quit => "Quit",
        }
    }
}

fn main_actions(signed_in: bool) -> Vec<Action> {
    if signed_in {
        vec![
            Action::Browse(Listing::All),
            Action::Browse(Listing::Favorites),
            Action::Browse(Listing::Mine),
            Action::Submit,
            Action::LogOut,
            Action::Quit,
        ]
    } else {
        vec![
            Action::Browse(Listing::All),
            Action::LogIn,
            Action::SignUp,
            Action::Quit,
        ]
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Terminal front end: owns the API handle, the current story list and the
/// signed-in user, and passes them explicitly to every data-layer call.
pub struct App {
    cfg: RuntimeConfig,
    api: ApiClient,
    store: Option<CredentialStore>,
    user: Option<User>,
    stories: StoryList,
}

impl App {
    /// Build the API client and restore the previous session if one was saved.
    pub async fn start(cfg: RuntimeConfig) -> Result<Self> {
        let api = ApiClient::new(cfg.client.clone())?;
        let store = CredentialStore::default_location();
        let user = match &store {
            Some(store) => store.restore_session(&api).await,
            None => None,
        };
        Ok(Self {
            cfg,
            api,
            store,
            user,
            stories: StoryList::default(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            let actions = main_actions(self.user.is_some());
            let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
            let prompt = match &self.user {
                Some(u) => format!("Main Menu - signed in as {} (b = back/quit)", u.username()),
                None => "Main Menu (b = back/quit)".to_string(),
            };
            let action = match ui::choose(&prompt, &labels, self.cfg.header.as_deref())? {
                MenuChoice::Back | MenuChoice::Quit => break,
                MenuChoice::Index(i) => actions[i],
            };
            let flow = match action {
                Action::Browse(listing) => self.browse(listing).await?,
                Action::Submit => self.submit_story().await?,
                Action::LogIn => self.log_in().await?,
                Action::SignUp => self.sign_up().await?,
                Action::LogOut => self.log_out()?,
                Action::Quit => Flow::Quit,
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        Ok(())
    }

    async fn browse(&mut self, listing: Listing) -> Result<Flow> {
        if listing == Listing::All {
            self.refresh_stories().await?;
        }
        loop {
            let snapshot = self.listing(listing);
            let labels: Vec<String> = snapshot.iter().map(|s| self.story_label(s)).collect();
            match ui::choose(listing.title(), &labels, self.cfg.header.as_deref())? {
                MenuChoice::Back => return Ok(Flow::Continue),
                MenuChoice::Quit => return Ok(Flow::Quit),
                MenuChoice::Index(i) => {
                    if let Some(story) = snapshot.get(i) {
                        let id = story.id().clone();
                        if let Flow::Quit = self.story_actions(&snapshot, &id).await? {
                            return Ok(Flow::Quit);
                        }
                    }
                }
            }
        }
    }

    /// `candidates` is the list the story was picked from; adding a favorite
    /// looks the story up there.
    async fn story_actions(&mut self, candidates: &StoryList, story_id: &StoryId) -> Result<Flow> {
        loop {
            let Some(story) = candidates.find(story_id) else {
                return Ok(Flow::Continue);
            };
            let mut items = vec!["Open link".to_string()];
            if let Some(user) = &self.user {
                let toggle = if user.is_favorite(story_id) { "Unfavorite" } else { "Favorite" };
                items.push(toggle.to_string());
            }
            let prompt = format!("{} (b = back, q = quit)", self.story_label(story));
            match ui::choose(&prompt, &items, self.cfg.header.as_deref())? {
                MenuChoice::Back => return Ok(Flow::Continue),
                MenuChoice::Quit => return Ok(Flow::Quit),
                MenuChoice::Index(0) => {
                    if let Err(e) = open_url(story.url(), self.cfg.open_command.as_deref()) {
                        ui::pause(&format!("Could not open link: {:#}", e))?;
                    }
                }
                MenuChoice::Index(_) => {
                    let Some(user) = self.user.as_mut() else {
                        continue;
                    };
                    let favorited = user.is_favorite(story_id);
                    if let Err(e) = user
                        .toggle_favorite(&self.api, story_id, favorited, candidates)
                        .await
                    {
                        warn!(story_id = %story_id, error = %e, "Favorite toggle failed");
                        ui::pause(&format!("Could not update favorite: {}", e))?;
                    }
                }
            }
        }
    }

    async fn refresh_stories(&mut self) -> Result<()> {
        match StoryList::fetch_all(&self.api).await {
            Ok(list) => self.stories = list,
            Err(e) => {
                warn!(error = %e, "Failed to fetch stories");
                ui::pause(&format!("Could not load stories: {}", e))?;
            }
        }
        Ok(())
    }

    fn listing(&self, listing: Listing) -> StoryList {
        match (listing, &self.user) {
            (Listing::All, _) => self.stories.clone(),
            (Listing::Favorites, Some(user)) => user.favorites().iter().cloned().collect(),
            (Listing::Mine, Some(user)) => user.own_stories().iter().cloned().collect(),
            (_, None) => StoryList::default(),
        }
    }

    fn story_label(&self, story: &Story) -> String {
        let star = match &self.user {
            Some(u) if u.is_favorite(story.id()) => format!("{} ", console::style("★").yellow().bold()),
            Some(_) => "☆ ".to_string(),
            None => String::new(),
        };
        let host = story.host_name().unwrap_or_else(|_| "unknown host".to_string());
        format!(
            "{}{} ({}) by {}",
            star,
            sanitize_for_terminal(story.title(), LABEL_WIDTH),
            sanitize_for_terminal(&host, LABEL_WIDTH),
            sanitize_for_terminal(story.author(), LABEL_WIDTH),
        )
    }
}
