/*!
 * Greedy line reflow for message boxes.
 *
 * Translated paragraphs are wrapped on whitespace so that every line fits
 * the configured width. Width is measured in characters as the game draws
 * them: control codes such as `\C[2]`, `\N[1]` or `\.` take no room.
 * A word wider than the limit is never split; it gets a line of its own.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ReflowError;

/// RPG Maker message control codes (`\C[n]`, `\I[n]`, `\{`, `\.`, `\|` ...)
static CONTROL_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\[A-Za-z]+\[[^\]]*\]|\\[{}.|!<>^$]").unwrap()
});

/// Result of wrapping a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapped {
    /// The text was wrapped normally
    Lines(Vec<String>),
    /// Wrapping was not possible; the whole text is kept as one line
    SingleLine { line: String, reason: ReflowError },
}

impl Wrapped {
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Wrapped::Lines(lines) => lines,
            Wrapped::SingleLine { line, .. } => vec![line],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Wrapped::SingleLine { .. })
    }
}

/// Width of a string as rendered in a message window
pub fn display_width(text: &str) -> usize {
    if text.contains('\\') {
        CONTROL_CODE_REGEX.replace_all(text, "").chars().count()
    } else {
        text.chars().count()
    }
}

/// Wrap `text` into lines no wider than `max_width`
pub fn reflow(text: &str, max_width: usize) -> Result<Vec<String>, ReflowError> {
    if max_width == 0 {
        return Err(ReflowError::ZeroWidth);
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = display_width(word);

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        return Err(ReflowError::EmptyInput);
    }
    Ok(lines)
}

/// Wrap, falling back to the unwrapped text as a single line
pub fn reflow_or_single_line(text: &str, max_width: usize) -> Wrapped {
    match reflow(text, max_width) {
        Ok(lines) => Wrapped::Lines(lines),
        Err(reason) => Wrapped::SingleLine {
            line: text.to_string(),
            reason,
        },
    }
}

/// Wrap into at most two lines joined by `\n`.
/// Whatever does not fit on the first line goes to the second, even if long.
pub fn reflow_two_lines(text: &str, max_width: usize) -> String {
    let mut lines = reflow_or_single_line(text, max_width).into_lines();
    if lines.len() <= 1 {
        return lines.pop().unwrap_or_default();
    }
    let first = lines.remove(0);
    format!("{}\n{}", first, lines.join(" "))
}
