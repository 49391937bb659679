use crate::state::{App, InputMode};
use crate::theme::{self, icons};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.size();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(app.title(), theme::TITLE_STYLE))
        .border_style(theme::BORDER_STYLE);
    let inner = block.inner(area);
    f.render_widget(block, area);

    app.update_layout(inner);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    render_header(f, app, chunks[0]);
    let body = Paragraph::new(app.viewport.render(&app.theme));
    f.render_widget(body, chunks[1]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.mode {
        InputMode::Search => Line::from(vec![
            Span::styled(icons::SEARCH, theme::SEARCH_PROMPT_STYLE),
            Span::raw(app.search_input.clone()),
            Span::styled("_", theme::SEARCH_PROMPT_STYLE),
            Span::styled("   enter apply  esc cancel", theme::HINT_STYLE),
        ]),
        InputMode::Normal => {
            let follow_label = if app.follow {
                icons::FOLLOW_ON
            } else {
                icons::FOLLOW_OFF
            };
            let mut spans = vec![Span::styled(follow_label, theme::follow_style(app.follow))];
            if app.viewport.is_searching() {
                spans.push(Span::styled(
                    format!("  {}{}", icons::SEARCH, app.viewport.search_query()),
                    theme::SEARCH_PROMPT_STYLE,
                ));
            }
            match &app.status_note {
                Some(note) => spans.push(Span::styled(format!("  {note}"), theme::NOTE_STYLE)),
                None => spans.push(Span::styled(
                    "  / search  n/N next/prev  g/G top/bottom  f follow  q quit",
                    theme::HINT_STYLE,
                )),
            }
            Line::from(spans)
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, TranscriptSource};
    use crate::source::Transcript;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer.get(x, y).symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn draws_header_lines_and_footer_inside_border() {
        let config = Config {
            source: TranscriptSource::Stdin,
            max_lines: 0,
            follow: false,
            log_file: None,
        };
        let mut app = App::new(&config);
        app.apply_transcript(Transcript {
            lines: vec!["$ cargo test".into(), "error: boom".into()],
            timestamps: Vec::new(),
            skipped: 0,
        });

        let mut terminal = Terminal::new(TestBackend::new(40, 8)).expect("terminal");
        terminal.draw(|f| render(f, &mut app)).expect("draw");

        assert_eq!(app.viewport.width(), 38);
        assert_eq!(app.viewport.height(), 6);
        let rows = buffer_rows(&terminal);
        assert!(rows[0].contains("Transcript: <stdin>"));
        assert!(rows[1].contains("paused"));
        assert!(rows[2].contains("1 │ $ cargo test"));
        assert!(rows[3].contains("2 │ error: boom"));
        assert!(rows[4].contains("2 lines"));
    }
}
