use anyhow::{Context, Result, bail};
use std::process::Command;

/// Open `url` with the configured command (program plus optional arguments),
/// or the system default handler.
pub fn open_url(url: &str, open_command: Option<&str>) -> Result<()> {
    if let Some(cmd) = open_command {
        let mut parts = cmd.split_whitespace();
        let Some(program) = parts.next() else {
            bail!("open_command is empty");
        };
        Command::new(program)
            .args(parts)
            .arg(url)
            .spawn()
            .with_context(|| format!("failed to run {}", program))?;
        return Ok(());
    }
    open::that(url).with_context(|| format!("failed to open {}", url))
}
