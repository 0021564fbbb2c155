//! Terminal styling for the interactive shell.

use colored::{ColoredString, Colorize};

pub const APP_NAME: &str = "Solana Balance Checker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Failure,
}

impl Tone {
    fn paint(self, text: &str) -> ColoredString {
        match self {
            Tone::Info => text.cyan(),
            Tone::Success => text.green(),
            Tone::Failure => text.red(),
        }
    }
}

/// Widest body line before wrapping kicks in.
pub const MAX_BODY_WIDTH: usize = 76;

/// Terminal columns taken by `c`: wide East Asian and emoji take two,
/// combining marks and joiners take none.
fn char_width(c: char) -> usize {
    match c as u32 {
        0x0300..=0x036F | 0x200B..=0x200F | 0xFE00..=0xFE0F => 0,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x1F680..=0x1F6FF
        | 0x1F900..=0x1F9FF
        | 0x20000..=0x3FFFD => 2,
        _ => 1,
    }
}

pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Greedy word wrap to `max` columns. Words wider than `max` are split.
pub fn wrap(line: &str, max: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split(' ') {
        let word_width = display_width(word);
        let sep = usize::from(!current.is_empty());
        if current_width + sep + word_width <= max {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }
        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for c in word.chars() {
            let w = char_width(c);
            if current_width + w > max && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
    }
    out.push(current);
    out
}

/// Boxed block of text with an optional title in the top border.
pub fn panel(title: Option<&str>, body: &str, tone: Tone) -> String {
    let lines: Vec<String> = body
        .lines()
        .flat_map(|l| wrap(l.trim_end(), MAX_BODY_WIDTH))
        .collect();
    let title_width = title.map(|t| display_width(t) + 2).unwrap_or(0);
    let width = lines
        .iter()
        .map(|l| display_width(l))
        .max()
        .unwrap_or(0)
        .max(title_width)
        + 2;

    let top = match title {
        Some(t) => {
            let label = format!(" {} ", t);
            let fill = width - display_width(&label);
            format!(
                "{}{}{}{}",
                tone.paint("╭"),
                label.bold(),
                tone.paint(&"─".repeat(fill)),
                tone.paint("╮")
            )
        }
        None => tone.paint(&format!("╭{}╮", "─".repeat(width))).to_string(),
    };

    let mut out = top;
    out.push('\n');
    for line in &lines {
        let pad = width - 1 - display_width(line);
        out.push_str(&format!(
            "{} {}{}{}\n",
            tone.paint("│"),
            line,
            " ".repeat(pad),
            tone.paint("│")
        ));
    }
    out.push_str(&tone.paint(&format!("╰{}╯", "─".repeat(width))).to_string());
    out.push('\n');
    out
}

pub fn welcome(wallet: &str) -> String {
    panel(
        None,
        &format!("{}\nWallet: {}", APP_NAME, wallet),
        Tone::Info,
    )
}

pub fn operations() -> String {
    panel(
        Some("Available Operations"),
        "1. Check Balance\n2. Exit",
        Tone::Info,
    )
}

pub fn result(body: &str) -> String {
    panel(Some("Result"), body, Tone::Success)
}

pub fn error(message: &str) -> String {
    panel(Some("Error"), message, Tone::Failure)
}

pub fn prompt(text: &str) -> String {
    format!("{}: ", text.bold())
}

pub fn notice(text: &str) -> String {
    format!("{}\n", text.yellow())
}

pub fn farewell() -> String {
    format!(
        "{}\n",
        format!("Thank you for using {}! Goodbye!", APP_NAME).green()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_contains_every_body_line() {
        colored::control::set_override(false);
        let rendered = panel(Some("Result"), "first\nsecond line", Tone::Success);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Result"));
        assert_eq!(lines[1], "│ first       │");
        assert_eq!(lines[2], "│ second line │");
        assert_eq!(lines[3], "╰─────────────╯");
    }

    #[test]
    fn title_wider_than_body() {
        colored::control::set_override(false);
        let rendered = panel(Some("Available Operations"), "1", Tone::Info);
        let widths: Vec<usize> = rendered.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn long_lines_wrap_inside_the_box() {
        colored::control::set_override(false);
        let body = "word ".repeat(40);
        let rendered = panel(None, &body, Tone::Success);
        let widths: Vec<usize> = rendered.lines().map(display_width).collect();
        assert!(widths.len() > 3);
        assert!(widths.iter().all(|w| *w <= MAX_BODY_WIDTH + 4));
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn wide_characters_keep_borders_aligned() {
        colored::control::set_override(false);
        let rendered = panel(Some("Result"), "Balance 🚀\nok", Tone::Success);
        let widths: Vec<usize> = rendered.lines().map(display_width).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{:?}", widths);
    }

    #[test]
    fn wrap_splits_oversized_words() {
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("ab cd ef", 5), vec!["ab cd", "ef"]);
        assert_eq!(wrap("", 5), vec![""]);
    }
}
