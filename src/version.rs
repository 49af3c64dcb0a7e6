use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use retrofeed::display::TimedWriter;
use std::io::stdout;

const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

/// Phosphor green, for the framed text
const SCREEN_GREEN: Color = Color::AnsiValue(46);
/// Amber, for highlighted values
const SCREEN_AMBER: Color = Color::AnsiValue(214);

/// Helper to print a dynamic-width version status box with optional color highlights
pub fn print_version_status_box(lines: Vec<(String, Option<Color>)>) {
    let max_content_width = lines
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0);
    let box_width = max_content_width + 4; // 2 for borders, 2 for padding
    let border = format!("╔{:═<width$}╗", "", width = box_width - 2);
    let sep = format!("╠{:═<width$}╣", "", width = box_width - 2);
    let bottom = format!("╚{:═<width$}╝", "", width = box_width - 2);

    execute!(stdout(), SetForegroundColor(SCREEN_GREEN), Print(format!("{border}\n"))).ok();
    for (i, (line, color)) in lines.iter().enumerate() {
        match (color, line.split_once(':')) {
            (Some(c), Some((pre, value))) => {
                let pre = format!("║ {pre}:");
                let value = value.trim_start();
                let pad = max_content_width - (pre.chars().count() - 2 + value.chars().count());
                execute!(
                    stdout(),
                    SetForegroundColor(SCREEN_GREEN),
                    Print(pre),
                    SetForegroundColor(*c),
                    Print(value),
                    SetForegroundColor(SCREEN_GREEN),
                    Print(format!("{:pad$} ║\n", "", pad = pad)),
                )
                .ok();
            }
            (color, _) => {
                let padded = format!("║ {line:<max_content_width$} ║");
                execute!(
                    stdout(),
                    SetForegroundColor(color.unwrap_or(SCREEN_GREEN)),
                    Print(padded),
                    SetForegroundColor(SCREEN_GREEN),
                    Print("\n")
                )
                .ok();
            }
        }
        if i == 0 && lines.len() > 2 {
            execute!(stdout(), Print(format!("{sep}\n"))).ok();
        }
    }
    execute!(stdout(), Print(format!("{bottom}\n")), ResetColor).ok();
}

/// Prints the `--version` box.
pub fn print_version_info() {
    print_version_status_box(vec![
        ("Retrofeed".to_string(), None),
        (String::new(), None),
        (format!("Version: {CURRENT_VERSION}"), Some(SCREEN_AMBER)),
        (format!("Package: {CRATE_NAME}"), Some(SCREEN_AMBER)),
        ("License: MIT".to_string(), Some(SCREEN_AMBER)),
    ]);
}

/// Title line typed at startup.
pub fn title_line() -> String {
    format!("{} - VERSION {}", CRATE_NAME.to_uppercase(), CURRENT_VERSION)
}

/// Clears the screen, scrolls a screenful of blank lines, then types the title.
pub async fn show_title(out: &mut TimedWriter) {
    execute!(stdout(), Clear(ClearType::All)).ok();
    let blank_lines = "\n".repeat(out.settings().height);
    execute!(stdout(), Print(blank_lines)).ok();

    out.write(&title_line()).await;
    out.write("MIT License").await;
    out.newline().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_line() {
        assert_eq!(title_line(), format!("RETROFEED - VERSION {CURRENT_VERSION}"));
    }
}
