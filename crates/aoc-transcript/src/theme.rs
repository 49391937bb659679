use crate::highlight::HighlightClass;
use ratatui::style::{Color, Modifier, Style};

/// Styles used by [`crate::Viewport::render`]. Passed in on every render so
/// hosts can swap palettes without touching viewport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTheme {
    pub plain: Style,
    pub code_fence: Style,
    pub prompt: Style,
    pub error: Style,
    pub warning: Style,
    pub info: Style,
    pub line_number: Style,
    pub separator: Style,
    pub timestamp: Style,
    pub search_match: Style,
    pub current_match: Style,
    pub footer: Style,
    pub placeholder: Style,
}

impl Default for RenderTheme {
    fn default() -> Self {
        Self {
            plain: Style::new(),
            code_fence: Style::new().fg(Color::Rgb(131, 165, 152)),
            prompt: Style::new()
                .fg(Color::Rgb(142, 192, 124))
                .add_modifier(Modifier::BOLD),
            error: Style::new().fg(Color::Rgb(251, 73, 52)),
            warning: Style::new().fg(Color::Rgb(250, 189, 47)),
            info: Style::new().fg(Color::Rgb(69, 133, 136)),
            line_number: Style::new().fg(Color::Rgb(102, 92, 84)),
            separator: Style::new().fg(Color::Rgb(80, 73, 69)),
            timestamp: Style::new().fg(Color::Rgb(146, 131, 116)),
            search_match: Style::new()
                .bg(Color::Rgb(80, 73, 69))
                .fg(Color::Rgb(250, 189, 47)),
            current_match: Style::new()
                .bg(Color::Rgb(250, 189, 47))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            footer: Style::new().fg(Color::Rgb(146, 131, 116)),
            placeholder: Style::new()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

impl RenderTheme {
    /// Theme without colors, for plain terminals and snapshot tests.
    pub fn monochrome() -> Self {
        Self {
            plain: Style::new(),
            code_fence: Style::new(),
            prompt: Style::new().add_modifier(Modifier::BOLD),
            error: Style::new().add_modifier(Modifier::BOLD),
            warning: Style::new(),
            info: Style::new(),
            line_number: Style::new().add_modifier(Modifier::DIM),
            separator: Style::new().add_modifier(Modifier::DIM),
            timestamp: Style::new().add_modifier(Modifier::DIM),
            search_match: Style::new().add_modifier(Modifier::UNDERLINED),
            current_match: Style::new().add_modifier(Modifier::REVERSED),
            footer: Style::new().add_modifier(Modifier::DIM),
            placeholder: Style::new().add_modifier(Modifier::DIM | Modifier::ITALIC),
        }
    }

    pub fn class_style(&self, class: HighlightClass) -> Style {
        match class {
            HighlightClass::CodeFence => self.code_fence,
            HighlightClass::Prompt => self.prompt,
            HighlightClass::Error => self.error,
            HighlightClass::Warning => self.warning,
            HighlightClass::Info => self.info,
            HighlightClass::Plain => self.plain,
        }
    }

    pub fn match_style(&self, current: bool) -> Style {
        if current {
            self.current_match
        } else {
            self.search_match
        }
    }
}
