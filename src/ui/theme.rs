//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;
use topowatch_types::{OperationalStatus, RuntimeStatus};

use crate::config::ThemeMode;
use crate::data::{ColorToken, EdgeStyle, Severity};

/// Color and style theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Success token (runtime active).
    pub success: Color,
    /// Error token (runtime error).
    pub error: Color,
    /// Neutral token (runtime inactive, unknown endpoints).
    pub neutral: Color,
    pub warning: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            success: Color::Green,
            error: Color::Red,
            neutral: Color::Gray,
            warning: Color::Yellow,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            neutral: Color::DarkGray,
            warning: Color::Yellow,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Theme for a configured mode.
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::auto_detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Terminal color for a semantic color token.
    pub fn token(&self, token: ColorToken) -> Color {
        match token {
            ColorToken::Success => self.success,
            ColorToken::Error => self.error,
            ColorToken::Neutral => self.neutral,
        }
    }

    pub fn runtime_style(&self, status: RuntimeStatus) -> Style {
        let style = Style::default().fg(self.token(status.into()));
        if status == RuntimeStatus::Error {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Operational has no color channel of its own on edges; in tables it
    /// reuses the tokens so the two columns read alike.
    pub fn operational_style(&self, status: OperationalStatus) -> Style {
        match status {
            OperationalStatus::Active => Style::default().fg(self.success),
            OperationalStatus::Inactive => Style::default().fg(self.neutral),
            OperationalStatus::Error => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
        }
    }

    pub fn edge_style(&self, style: &EdgeStyle) -> Style {
        let base = Style::default().fg(self.token(style.color));
        if style.animated {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        }
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => Style::default().fg(self.neutral),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Error => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_modes_pick_matching_theme() {
        assert_eq!(Theme::from_mode(ThemeMode::Dark).highlight, Color::Cyan);
        assert_eq!(Theme::from_mode(ThemeMode::Light).highlight, Color::Blue);
    }

    #[test]
    fn tokens_map_to_distinct_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.token(ColorToken::Success), Color::Green);
        assert_eq!(theme.token(ColorToken::Error), Color::Red);
        assert_eq!(theme.token(ColorToken::Neutral), Color::Gray);
    }
}
