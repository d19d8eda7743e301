use regex::Regex;
use std::sync::LazyLock;

// CSI sequences: ESC [ params intermediates final
static ANSI_CSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").expect("valid regex"));

/// Make API-supplied text safe to print in a menu line.
///
/// Strips ANSI escapes and control characters, folds line breaks and tabs
/// into spaces, trims, and truncates to `max_chars` characters.
pub fn sanitize_for_terminal(s: &str, max_chars: usize) -> String {
    let no_ansi = ANSI_CSI.replace_all(s, "");
    let cleaned: String = no_ansi
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
        .filter(|ch| !ch.is_control())
        .collect();
    cleaned.trim().chars().take(max_chars).collect()
}
