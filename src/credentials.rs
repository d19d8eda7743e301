use crate::api::ApiClient;
use crate::error::{Result, SnoozeError};
use crate::user::User;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Token and username kept between runs to restore a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub username: String,
    pub token: String,
}

/// `$XDG_CONFIG_HOME/snooze`, falling back to `$HOME/.config/snooze`.
pub fn config_dir() -> Option<PathBuf> {
    let mut p = match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let mut home = PathBuf::from(env::var("HOME").ok()?);
            home.push(".config");
            home
        }
    };
    p.push("snooze");
    Some(p)
}

/// JSON file holding the last signed-in account's credentials.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `credentials.json` under [`config_dir`].
    pub fn default_location() -> Option<Self> {
        config_dir().map(|dir| Self::at(dir.join("credentials.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored credentials, or `None` if the file is missing or unreadable.
    pub fn load(&self) -> Option<StoredCredentials> {
        if !self.path.is_file() {
            return None;
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| warn!(path = %self.path.display(), error = %e, "Failed to read credentials"))
            .ok()?;
        serde_json::from_str(&contents)
            .map_err(|e| warn!(path = %self.path.display(), error = %e, "Ignoring corrupt credentials file"))
            .ok()
    }

    /// Write `credentials`, readable by the owner only on unix.
    pub fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(credentials)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        // mode() only applies when the file is created
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Restore the saved session, if any.
    ///
    /// Credentials the API rejects (bad token, unknown user) are removed so
    /// the next start does not retry them. On transport failures the file is
    /// kept and the session simply stays signed out.
    pub async fn restore_session(&self, api: &ApiClient) -> Option<User> {
        let creds = self.load()?;
        match User::fetch_account(api, &creds.token, &creds.username).await {
            Ok(user) => {
                debug!(username = %user.username(), "Session restored");
                Some(user)
            }
            Err(e @ (SnoozeError::Auth(_) | SnoozeError::Validation(_))) => {
                warn!(username = %creds.username, error = %e, "Stored session rejected, discarding it");
                if let Err(e) = self.clear() {
                    warn!(path = %self.path.display(), error = %e, "Failed to remove stale credentials");
                }
                None
            }
            Err(e) => {
                warn!(username = %creds.username, error = %e, "Session restore failed, continuing signed out");
                None
            }
        }
    }

    /// Forget stored credentials. A missing file is fine.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
