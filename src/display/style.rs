//! Terminal styling helpers
//!
//! Colors are plain ANSI escapes, used only when stdout is a terminal and
//! `NO_COLOR` is unset.

use std::io::IsTerminal;

use crate::snapshot::Tone;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Whether output gets colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Color when stdout is a terminal and `NO_COLOR` is not set
    pub fn from_env() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(!no_color && std::io::stdout().is_terminal())
    }

    /// Wrap `text` in the color for `tone`
    pub fn tone(&self, text: &str, tone: Tone) -> String {
        let color = match tone {
            Tone::Good => GREEN,
            Tone::Neutral => YELLOW,
            Tone::Bad => RED,
        };
        self.wrap(text, color)
    }

    pub fn bold(&self, text: &str) -> String {
        self.wrap(text, BOLD)
    }

    /// Color one line of unified diff output
    pub fn diff_line(&self, line: &str) -> String {
        if line.starts_with("+++") || line.starts_with("---") {
            self.bold(line)
        } else if line.starts_with('+') {
            self.wrap(line, GREEN)
        } else if line.starts_with('-') {
            self.wrap(line, RED)
        } else if line.starts_with("@@") {
            self.wrap(line, CYAN)
        } else {
            line.to_string()
        }
    }

    fn wrap(&self, text: &str, code: &str) -> String {
        if self.enabled {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }
}

/// Left-align text in a field of given width
pub fn left_align(s: &str, width: usize) -> String {
    if s.len() >= width {
        s.to_string()
    } else {
        format!("{:<width$}", s, width = width)
    }
}

/// Truncate a string to a maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
