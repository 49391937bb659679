//! Scrollable, searchable transcript viewport for agent session panes.
//!
//! The [`Viewport`] owns a bounded buffer of transcript lines, keeps the
//! scroll offset inside the visible range, indexes search hits and renders
//! the visible window into styled [`ratatui::text::Text`]. It is a plain
//! state machine: callers push content and commands, then call
//! [`Viewport::render`] on every repaint.

pub mod highlight;
pub mod render;
pub mod search;
pub mod theme;
pub mod viewport;

pub use highlight::HighlightClass;
pub use theme::RenderTheme;
pub use viewport::{Viewport, DEFAULT_HEIGHT, DEFAULT_WIDTH};
