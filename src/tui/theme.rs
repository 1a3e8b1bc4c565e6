use ratatui::style::Color;

use crate::model::{TaskStatus, UiConfig};
use crate::ops::gantt::DayKind;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    pub not_started: Color,
    pub in_progress: Color,
    pub review: Color,
    pub done: Color,
    /// Gantt grid background for days before today
    pub past_bg: Color,
    /// Gantt grid background for today's column
    pub today_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x12, 0x1A),
            text: Color::Rgb(0xC8, 0xCC, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x4C, 0xA3, 0xFF),
            dim: Color::Rgb(0x6E, 0x74, 0x88),
            red: Color::Rgb(0xFF, 0x55, 0x55),
            selection_bg: Color::Rgb(0x24, 0x30, 0x4A),
            search_match_bg: Color::Rgb(0xFF, 0xD7, 0x00),
            search_match_fg: Color::Rgb(0x10, 0x12, 0x1A),
            not_started: Color::Rgb(0x9E, 0x9E, 0x9E),
            in_progress: Color::Rgb(0x42, 0x8B, 0xF5),
            review: Color::Rgb(0xF5, 0xC5, 0x42),
            done: Color::Rgb(0x4C, 0xC9, 0x6E),
            past_bg: Color::Rgb(0x18, 0x1B, 0x26),
            today_bg: Color::Rgb(0x3A, 0x22, 0x2E),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Theme {
    /// Defaults with `[ui.colors]` overrides applied. Unknown slots and
    /// malformed values are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "red" => &mut theme.red,
                "selection_bg" => &mut theme.selection_bg,
                "search_match_bg" => &mut theme.search_match_bg,
                "search_match_fg" => &mut theme.search_match_fg,
                "not_started" => &mut theme.not_started,
                "in_progress" => &mut theme.in_progress,
                "review" => &mut theme.review,
                "done" => &mut theme.done,
                "past_bg" => &mut theme.past_bg,
                "today_bg" => &mut theme.today_bg,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }

    /// Column heading and Gantt bar color for a status
    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::NotStarted => self.not_started,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Review => self.review,
            TaskStatus::Done => self.done,
        }
    }

    /// Background of an empty Gantt cell
    pub fn day_bg(&self, kind: DayKind) -> Color {
        match kind {
            DayKind::Past => self.past_bg,
            DayKind::Today => self.today_bg,
            DayKind::Upcoming => self.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#4CA3FF"),
            Some(Color::Rgb(0x4C, 0xA3, 0xFF))
        );
        assert_eq!(parse_hex_color("4CA3FF"), None);
        assert_eq!(parse_hex_color("#4CA3"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("done".into(), "#000000".into());
        ui.colors.insert("nonsense".into(), "#111111".into());
        ui.colors.insert("review".into(), "yellow".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.done, Color::Rgb(0, 0, 0));
        assert_eq!(theme.review, Theme::default().review);
        assert_eq!(theme.text, Theme::default().text);
    }

    #[test]
    fn test_status_and_day_colors() {
        let theme = Theme::default();
        assert_eq!(theme.status_color(TaskStatus::InProgress), theme.in_progress);
        assert_eq!(theme.status_color(TaskStatus::Done), theme.done);
        assert_eq!(theme.day_bg(DayKind::Today), theme.today_bg);
        assert_eq!(theme.day_bg(DayKind::Upcoming), theme.background);
    }
}
