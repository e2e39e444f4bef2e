use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Dark,
    Light,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Dark => DisplayMode::Light,
            DisplayMode::Light => DisplayMode::Dark,
        }
    }

    /// Label of the toggle control, naming the mode it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            DisplayMode::Dark => "☀ Light Mode",
            DisplayMode::Light => "☾ Dark Mode",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            DisplayMode::Dark => Palette {
                background: Color::Black,
                foreground: Color::White,
                muted: Color::DarkGray,
                border: Color::Gray,
                highlight: Color::Magenta,
            },
            DisplayMode::Light => Palette {
                background: Color::White,
                foreground: Color::Black,
                muted: Color::Gray,
                border: Color::DarkGray,
                highlight: Color::Blue,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub highlight: Color,
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn border(&self) -> Style {
        self.base().fg(self.border)
    }

    pub fn selected(&self) -> Style {
        self.base().fg(self.highlight).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_mode() {
        let mode = DisplayMode::default();
        assert_eq!(mode.toggled(), DisplayMode::Light);
        assert_eq!(mode.toggled().toggled(), mode);
    }

    #[test]
    fn palettes_differ_between_modes() {
        assert_ne!(DisplayMode::Dark.palette(), DisplayMode::Light.palette());
        assert_eq!(DisplayMode::Dark.palette().background, Color::Black);
    }
}
