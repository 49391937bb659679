use crate::highlight::HighlightClass;
use crate::search::find_ignore_case;
use crate::theme::RenderTheme;
use crate::viewport::Viewport;
use ratatui::{
    style::Style,
    text::{Line, Span, Text},
};

pub const EMPTY_PLACEHOLDER: &str = "No transcript lines yet";
pub const SEPARATOR: &str = " │ ";
pub const ELLIPSIS: &str = "...";
const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

impl Viewport {
    /// Renders the visible window followed by a footer line.
    ///
    /// Rendering reads state only; calling it twice without a mutation in
    /// between yields the same text.
    pub fn render(&self, theme: &RenderTheme) -> Text<'static> {
        let width = self.width as usize;
        if self.lines.is_empty() {
            let placeholder = vec![Span::styled(EMPTY_PLACEHOLDER, theme.placeholder)];
            return Text::from(truncate_spans(placeholder, width));
        }

        let number_width = digit_count(self.lines.len());
        let range = self.visible_range();
        let mut rendered = Vec::with_capacity(range.len() + 1);
        for idx in range {
            let line = &self.lines[idx];
            let mut spans = vec![
                Span::styled(
                    format!("{:>number_width$}", idx + 1),
                    theme.line_number,
                ),
                Span::styled(SEPARATOR, theme.separator),
            ];
            if let Some(stamp) = self.timestamps.get(idx) {
                spans.push(Span::styled(
                    format!("{} ", stamp.format(TIMESTAMP_FORMAT)),
                    theme.timestamp,
                ));
            }
            spans.extend(self.content_spans(idx, line, theme));
            rendered.push(truncate_spans(spans, width));
        }

        let footer = vec![Span::styled(self.footer_text(), theme.footer)];
        rendered.push(truncate_spans(footer, width));
        Text::from(rendered)
    }

    /// Unstyled rendering, one `\n`-separated row per rendered line.
    pub fn render_plain(&self) -> String {
        text_to_plain(&self.render(&RenderTheme::monochrome()))
    }

    /// Status text shown under the line window.
    pub fn footer_text(&self) -> String {
        let total = self.lines.len();
        let fits = total <= self.visible_height();
        let range = if fits {
            if total == 1 {
                "1 line".to_string()
            } else {
                format!("{total} lines")
            }
        } else {
            let visible = self.visible_range();
            format!("{}-{} of {}", visible.start + 1, visible.end, total)
        };

        if self.is_searching() && !self.search_hits.is_empty() {
            return format!(
                "{range}  match {}/{}",
                self.search_index + 1,
                self.search_hits.len()
            );
        }

        let mut text = if fits {
            range
        } else {
            format!("{range} ({}%)", self.scroll_percent())
        };
        if self.is_searching() {
            text.push_str("  no matches");
        }
        text
    }

    /// How far the window has travelled through the buffer, 0..=100.
    pub fn scroll_percent(&self) -> usize {
        let max_scroll = self.max_scroll();
        if max_scroll == 0 {
            return 0;
        }
        self.scroll_offset * 100 / max_scroll
    }

    /// Splits a line into base-styled text with the search match overlaid.
    fn content_spans(&self, idx: usize, line: &str, theme: &RenderTheme) -> Vec<Span<'static>> {
        let base = theme.class_style(HighlightClass::classify(line));
        let matched = if self.search_hits.binary_search(&idx).is_ok() {
            find_ignore_case(line, &self.search_query)
        } else {
            None
        };

        let Some((start, end)) = matched else {
            return vec![Span::styled(line.to_string(), base)];
        };

        let overlay = theme.match_style(self.current_hit() == Some(idx));
        let mut spans = Vec::with_capacity(3);
        if start > 0 {
            spans.push(Span::styled(line[..start].to_string(), base));
        }
        spans.push(Span::styled(line[start..end].to_string(), overlay));
        if end < line.len() {
            spans.push(Span::styled(line[end..].to_string(), base));
        }
        spans
    }
}

/// Cuts a styled line to `width` characters, ending it with an ellipsis when
/// anything was dropped. A width of zero disables truncation.
fn truncate_spans(spans: Vec<Span<'static>>, width: usize) -> Line<'static> {
    let total: usize = spans.iter().map(|span| span.content.chars().count()).sum();
    if width == 0 || total <= width {
        return Line::from(spans);
    }

    let ellipsis_len = ELLIPSIS.chars().count();
    if width <= ellipsis_len {
        return Line::from(ELLIPSIS.chars().take(width).collect::<String>());
    }

    let mut budget = width - ellipsis_len;
    let mut kept = Vec::with_capacity(spans.len() + 1);
    let mut tail_style = Style::default();
    for span in spans {
        if budget == 0 {
            break;
        }
        let len = span.content.chars().count();
        tail_style = span.style;
        if len <= budget {
            budget -= len;
            kept.push(span);
        } else {
            let cut: String = span.content.chars().take(budget).collect();
            kept.push(Span::styled(cut, span.style));
            budget = 0;
        }
    }
    kept.push(Span::styled(ELLIPSIS, tail_style));
    Line::from(kept)
}

fn digit_count(mut value: usize) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

/// Concatenates span content, one row per line.
pub fn text_to_plain(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
