//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::{ColoredString, Colorize};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print dimmed hint line
pub fn hint(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().dimmed());
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print prompt without newline (cyan)
pub fn prompt(msg: &(impl std::fmt::Display + ?Sized)) {
    use std::io::Write;
    print!("{} ", msg.to_string().cyan());
    std::io::stdout().flush().ok();
}

/// `#RRGGBB` to RGB; malformed input gives neutral grey.
pub fn hex_rgb(hex: &str) -> (u8, u8, u8) {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => (r, g, b),
        _ => (0x99, 0x99, 0x99),
    }
}

/// Coloured square used as legend swatch.
pub fn swatch(hex: &str) -> ColoredString {
    let (r, g, b) = hex_rgb(hex);
    "■".truecolor(r, g, b)
}

/// Horizontal bar of `width` cells, `share` (0..=1) of it filled in `hex`.
pub fn bar(share: f64, width: usize, hex: &str) -> String {
    let filled = ((share.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    let (r, g, b) = hex_rgb(hex);
    format!(
        "{}{}",
        "█".repeat(filled).truecolor(r, g, b),
        "░".repeat(width - filled).dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_palette_hex_when_parsing_then_returns_channels() {
        assert_eq!(hex_rgb("#E69F00"), (0xE6, 0x9F, 0x00));
        assert_eq!(hex_rgb("56B4E9"), (0x56, 0xB4, 0xE9));
        assert_eq!(hex_rgb("#xyz"), (0x99, 0x99, 0x99));
    }

    #[test]
    fn given_share_when_drawing_bar_then_fills_proportionally() {
        colored::control::set_override(false);
        assert_eq!(bar(0.5, 10, "#000000"), "█████░░░░░");
        assert_eq!(bar(1.7, 4, "#000000"), "████");
        assert_eq!(bar(0.0, 3, "#000000"), "░░░");
    }
}
