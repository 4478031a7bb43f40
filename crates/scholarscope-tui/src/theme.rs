use ratatui::style::{Color, Modifier, Style};

/// Color theme for the TUI.
pub struct Theme {
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub rating: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub gauge: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Default for Theme {
    /// Indigo accents on a dark background.
    fn default() -> Self {
        Self {
            accent: Color::Rgb(99, 102, 241),
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(245, 158, 11),
            error: Color::Rgb(239, 68, 68),
            rating: Color::Rgb(250, 204, 21),

            header_fg: Color::White,
            header_bg: Color::Rgb(49, 46, 129),
            border: Color::Rgb(71, 85, 105),
            text: Color::White,
            dim: Color::Rgb(148, 163, 184),
            highlight_bg: Color::Rgb(30, 41, 59),
            active: Color::Rgb(129, 140, 248),
            gauge: Color::Rgb(99, 102, 241),
            footer_fg: Color::Rgb(148, 163, 184),
            footer_bg: Color::Reset,
        }
    }
}

impl Theme {
    /// Sixteen-color fallback for terminals without truecolor.
    pub fn mono() -> Self {
        Self {
            accent: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            rating: Color::Yellow,

            header_fg: Color::Black,
            header_bg: Color::Cyan,
            border: Color::DarkGray,
            text: Color::Reset,
            dim: Color::DarkGray,
            highlight_bg: Color::DarkGray,
            active: Color::Cyan,
            gauge: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Resolve a theme by name, falling back to the default for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "mono" => Self::mono(),
            "default" => Self::default(),
            other => {
                tracing::warn!(theme = other, "unknown theme, using default");
                Self::default()
            }
        }
    }

    /// Badge color for a venue rank string.
    pub fn rank_color(&self, rank: Option<&str>) -> Color {
        match rank {
            Some(r) if r.contains("A*") || r.contains("Q1") => self.success,
            Some(r) if !r.is_empty() => self.warning,
            _ => self.dim,
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn key_style(&self) -> Style {
        Style::default()
            .fg(self.active)
            .add_modifier(Modifier::BOLD)
    }

    pub fn block_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.active)
        } else {
            Style::default().fg(self.border)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_ranks_are_green() {
        let theme = Theme::default();
        assert_eq!(theme.rank_color(Some("A*")), theme.success);
        assert_eq!(theme.rank_color(Some("Q1")), theme.success);
        assert_eq!(theme.rank_color(Some("B")), theme.warning);
        assert_eq!(theme.rank_color(None), theme.dim);
    }

    #[test]
    fn unknown_theme_names_fall_back() {
        assert_eq!(Theme::from_name("nope").accent, Theme::default().accent);
        assert_eq!(Theme::from_name("MONO").accent, Theme::mono().accent);
    }

    #[test]
    fn themes_resolve_by_documented_name() {
        assert_eq!(Theme::from_name("default").header_bg, Theme::default().header_bg);
        assert_eq!(Theme::from_name("mono").header_bg, Color::Cyan);
    }
}
