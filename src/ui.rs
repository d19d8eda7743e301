use anyhow::{Result, anyhow};
use console::{Key, Term};
use dialoguer::{Input, Password};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
}

/// Show a numbered menu and read a choice.
///
/// The first key picks the input mode: arrows switch to a scrolling
/// selector, anything else falls back to typed input.
pub fn prompt_menu(prompt: &str, labels: &[String], header: Option<&str>) -> Result<MenuChoice> {
    let term = Term::stdout();
    let _ = term.clear_screen();
    if let Some(h) = header {
        println!("{}", h);
    }
    println!("{}", prompt);
    if labels.is_empty() {
        println!("  (nothing here)");
    }
    for (i, it) in labels.iter().enumerate() {
        println!("{}: {}", i + 1, it);
    }
    println!("Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit.");

    match term.read_key()? {
        Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End | Key::PageUp | Key::PageDown
            if !labels.is_empty() =>
        {
            arrow_select(prompt, labels, header)
        }
        Key::Char('q') | Key::Char('Q') => Ok(MenuChoice::Quit),
        Key::Char('b') | Key::Char('B') | Key::Escape => Ok(MenuChoice::Back),
        Key::Char(c) if !c.is_control() => {
            let input: String = Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .with_initial_text(c.to_string())
                .interact_text()?;
            parse_selection(&input, labels.len())
        }
        _ => {
            let input: String = Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .interact_text()?;
            parse_selection(&input, labels.len())
        }
    }
}

/// Same as [`prompt_menu`], but a bad entry re-prompts instead of failing.
pub fn choose(prompt: &str, labels: &[String], header: Option<&str>) -> Result<MenuChoice> {
    loop {
        match prompt_menu(prompt, labels, header) {
            Ok(choice) => return Ok(choice),
            Err(e) => pause(&format!("{}", e))?,
        }
    }
}

pub fn prompt_text(prompt: &str) -> Result<String> {
    let s: String = Input::new().with_prompt(prompt).interact_text()?;
    Ok(s.trim().to_string())
}

pub fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}

/// Print `message` and wait for any key.
pub fn pause(message: &str) -> Result<()> {
    println!();
    println!("{}", message);
    println!("Press any key to continue.");
    Term::stdout().read_key()?;
    Ok(())
}

fn parse_selection(input: &str, len: usize) -> Result<MenuChoice> {
    let s = input.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("b") {
        return Ok(MenuChoice::Back);
    }
    if s.eq_ignore_ascii_case("q") {
        return Ok(MenuChoice::Quit);
    }
    let idx: usize = s.parse::<usize>().map_err(|_| anyhow!("invalid selection: {}", s))?;
    if idx == 0 || idx > len {
        return Err(anyhow!("out of range: {}", idx));
    }
    Ok(MenuChoice::Index(idx - 1))
}

fn arrow_select(prompt: &str, items: &[String], header: Option<&str>) -> Result<MenuChoice> {
    let term = Term::stdout();
    let mut sel: usize = 0;
    let mut top: usize = 0;
    loop {
        term.clear_screen()?;
        if let Some(h) = header {
            println!("{}", h);
        }
        println!("{}", prompt);

        let (rows, _cols) = term.size();
        // header + prompt + help line
        let reserved: usize = 2 + usize::from(header.is_some());
        let max_visible = (rows as usize).saturating_sub(reserved).max(3).min(items.len());

        if sel < top {
            top = sel;
        }
        if sel >= top + max_visible {
            top = sel + 1 - max_visible;
        }

        let end = (top + max_visible).min(items.len());
        for (i, item) in items.iter().enumerate().take(end).skip(top) {
            let marker = if i == sel { '>' } else { ' ' };
            println!("{} {}: {}", marker, i + 1, item);
        }
        println!("Use arrows + Enter. 'b' = back, 'q' = quit.");

        let step = max_visible.saturating_sub(1).max(1);
        let last = items.len().saturating_sub(1);
        match term.read_key()? {
            Key::ArrowUp => sel = sel.saturating_sub(1),
            Key::ArrowDown => sel = (sel + 1).min(last),
            Key::Home => sel = 0,
            Key::End => sel = last,
            Key::PageUp => sel = sel.saturating_sub(step),
            Key::PageDown => sel = (sel + step).min(last),
            Key::Enter => return Ok(MenuChoice::Index(sel)),
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            _ => {}
        }
    }
}
