use crate::config::{Config, TranscriptSource};
use crate::source::{self, Transcript};
use aoc_transcript::{RenderTheme, Viewport};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::SystemTime;
use tracing::{info, warn};

const MOUSE_SCROLL_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

pub struct App {
    pub source: TranscriptSource,
    pub viewport: Viewport,
    pub theme: RenderTheme,
    pub mode: InputMode,
    pub search_input: String,
    pub follow: bool,
    pub status_note: Option<String>,
    pub last_mtime: Option<SystemTime>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut viewport = Viewport::new();
        viewport.set_max_lines(config.max_lines);
        Self {
            source: config.source.clone(),
            viewport,
            theme: RenderTheme::default(),
            mode: InputMode::Normal,
            search_input: String::new(),
            follow: config.follow,
            status_note: None,
            last_mtime: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn on_tick(&mut self) {
        self.refresh(false);
    }

    /// The watcher saw the file change; reload even when the mtime looks
    /// unchanged, since coarse timestamps can hide back-to-back writes.
    pub fn on_watch_event(&mut self) {
        self.refresh(true);
    }

    /// Re-reads a file source when it changed on disk (or always, when
    /// forced). Stdin sources are loaded once by the caller.
    pub fn refresh(&mut self, force: bool) {
        let TranscriptSource::File(path) = &self.source else {
            return;
        };

        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok();
        if !force && modified.is_some() && self.last_mtime == modified {
            return;
        }

        match source::load_file(path) {
            Ok(transcript) => {
                self.last_mtime = modified;
                self.apply_transcript(transcript);
            }
            Err(err) => {
                warn!(error = %err, "transcript reload failed");
                self.status_note = Some(err.to_string());
            }
        }
    }

    /// Pushes a freshly loaded transcript into the viewport. In follow mode
    /// a viewport that was pinned to the bottom stays pinned.
    pub fn apply_transcript(&mut self, transcript: Transcript) {
        let pinned = self.follow && self.viewport.is_at_bottom();
        let Transcript {
            lines,
            timestamps,
            skipped,
        } = transcript;
        info!(
            lines = lines.len(),
            timestamps = timestamps.len(),
            skipped,
            "loaded transcript"
        );
        if timestamps.is_empty() {
            self.viewport.set_lines(lines);
        } else {
            self.viewport.set_lines_with_timestamps(lines, timestamps);
        }
        if pinned {
            self.viewport.scroll_to_bottom();
        }
        self.status_note = if skipped > 0 {
            Some(format!("skipped {skipped} malformed record(s)"))
        } else {
            None
        };
    }

    /// Sizes the viewport to the pane interior: one header row, the line
    /// window and the footer row.
    pub fn update_layout(&mut self, area: Rect) {
        let was_pinned = self.follow && self.viewport.is_at_bottom();
        self.viewport.set_size(area.width, area.height);
        if was_pinned {
            self.viewport.scroll_to_bottom();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode {
            InputMode::Search => self.handle_search_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let page = self.viewport.visible_height();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('d') if ctrl => self.viewport.scroll_down((page / 2).max(1)),
            KeyCode::Char('u') if ctrl => self.viewport.scroll_up((page / 2).max(1)),
            KeyCode::Down | KeyCode::Char('j') => self.viewport.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => self.viewport.scroll_up(1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.viewport.scroll_down(page),
            KeyCode::PageUp | KeyCode::Char('b') => self.viewport.scroll_up(page),
            KeyCode::Home | KeyCode::Char('g') => self.viewport.scroll_to_top(),
            KeyCode::End | KeyCode::Char('G') => self.viewport.scroll_to_bottom(),
            KeyCode::Char('/') => {
                self.mode = InputMode::Search;
                self.search_input = self.viewport.search_query().to_string();
            }
            KeyCode::Char('n') => self.viewport.next_search_hit(),
            KeyCode::Char('N') => self.viewport.prev_search_hit(),
            KeyCode::Esc => {
                self.viewport.clear_search();
                self.search_input.clear();
            }
            KeyCode::Char('f') => {
                self.follow = !self.follow;
                if self.follow {
                    self.viewport.scroll_to_bottom();
                }
            }
            KeyCode::Char('r') => {
                self.refresh(true);
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                if self.search_input.is_empty() {
                    self.viewport.clear_search();
                } else {
                    self.follow = false;
                    self.viewport.set_search(&self.search_input);
                }
            }
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.search_input = self.viewport.search_query().to_string();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(ch) => {
                self.search_input.push(ch);
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::ScrollUp => self.viewport.scroll_up(MOUSE_SCROLL_LINES),
            MouseEventKind::ScrollDown => self.viewport.scroll_down(MOUSE_SCROLL_LINES),
            _ => {}
        }
    }

    pub fn title(&self) -> String {
        let mut title = format!(" Transcript: {} ", self.source.label());
        if self.viewport.is_searching() {
            title.push_str(&format!(
                "[{} hit{}] ",
                self.viewport.hit_count(),
                if self.viewport.hit_count() == 1 { "" } else { "s" }
            ));
        }
        title
    }
}
