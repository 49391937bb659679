use ratatui::style::{Color, Modifier, Style};

pub const TITLE_STYLE: Style = Style::new()
    .fg(Color::Rgb(142, 192, 124))
    .add_modifier(Modifier::BOLD);
pub const BORDER_STYLE: Style = Style::new().fg(Color::Rgb(131, 165, 152));
pub const SEARCH_PROMPT_STYLE: Style = Style::new()
    .fg(Color::Rgb(250, 189, 47))
    .add_modifier(Modifier::BOLD);
pub const HINT_STYLE: Style = Style::new().fg(Color::Rgb(146, 131, 116));
pub const NOTE_STYLE: Style = Style::new().fg(Color::Rgb(254, 128, 25));

pub fn follow_style(follow: bool) -> Style {
    if follow {
        Style::new().fg(Color::Rgb(184, 187, 38))
    } else {
        Style::new().fg(Color::Rgb(146, 131, 116))
    }
}

pub mod icons {
    pub const FOLLOW_ON: &str = "follow";
    pub const FOLLOW_OFF: &str = "paused";
    pub const SEARCH: &str = "/";
}
