use chrono::{DateTime, Utc};
use std::ops::Range;
use tracing::debug;

pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// Rows reserved for the header and footer around the line window.
const CHROME_ROWS: u16 = 2;

/// Bounded transcript buffer with scroll and search state.
///
/// Every public operation is total: offsets and indices are clamped instead
/// of rejected, so `0 <= scroll_offset <= max_scroll()` holds after any call.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub(crate) lines: Vec<String>,
    pub(crate) timestamps: Vec<DateTime<Utc>>,
    pub(crate) max_lines: usize,
    pub(crate) scroll_offset: usize,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) search_query: String,
    pub(crate) search_hits: Vec<usize>,
    pub(crate) search_index: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            timestamps: Vec::new(),
            max_lines: 0,
            scroll_offset: 0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            search_query: String::new(),
            search_hits: Vec::new(),
            search_index: 0,
        }
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let mut viewport = Self::new();
        viewport.set_size(width, height);
        viewport
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.set_max_lines(max_lines);
        self
    }

    /// Resizes the viewport; the offset is pulled back into range when the
    /// window grows past the end of the buffer.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp_scroll();
    }

    /// Replaces the buffer. Previously stored timestamps no longer line up
    /// with the new content and are dropped.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.store_lines(lines);
        self.timestamps.clear();
        self.after_buffer_change();
    }

    /// Replaces the buffer together with one timestamp per line.
    ///
    /// Timestamps are kept only when they align with the lines: either one
    /// per supplied line (trimmed alongside the lines) or one per retained
    /// line. Anything else stores no timestamps at all.
    pub fn set_lines_with_timestamps(
        &mut self,
        lines: Vec<String>,
        mut timestamps: Vec<DateTime<Utc>>,
    ) {
        let supplied = lines.len();
        let evicted = self.store_lines(lines);
        if timestamps.len() == supplied {
            timestamps.drain(..evicted);
            self.timestamps = timestamps;
        } else if timestamps.len() == self.lines.len() {
            self.timestamps = timestamps;
        } else {
            debug!(
                lines = supplied,
                timestamps = timestamps.len(),
                "discarding misaligned transcript timestamps"
            );
            self.timestamps = Vec::new();
        }
        self.after_buffer_change();
    }

    /// Sets the capacity bound (0 = unbounded) and evicts the oldest lines
    /// right away if the buffer is already over it. The scroll offset moves
    /// up with the surviving content instead of snapping to the top.
    pub fn set_max_lines(&mut self, max_lines: usize) {
        self.max_lines = max_lines;
        if max_lines == 0 || self.lines.len() <= max_lines {
            return;
        }

        let evicted = self.lines.len() - max_lines;
        self.lines.drain(..evicted);
        if !self.timestamps.is_empty() {
            let stale = evicted.min(self.timestamps.len());
            self.timestamps.drain(..stale);
        }
        self.scroll_offset = self.scroll_offset.saturating_sub(evicted);
        debug!(evicted, max_lines, "evicted transcript lines over capacity");
        self.after_buffer_change();
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
        self.clamp_scroll();
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
        self.clamp_scroll();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    /// Moves the window the minimum distance needed to show `index`.
    pub fn scroll_line_into_view(&mut self, index: usize) {
        let visible = self.visible_height();
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if index >= self.scroll_offset.saturating_add(visible) {
            self.scroll_offset = index.saturating_sub(visible - 1);
        }
        self.clamp_scroll();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn visible_height(&self) -> usize {
        self.height.saturating_sub(CHROME_ROWS).max(1) as usize
    }

    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.visible_height())
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_offset >= self.max_scroll()
    }

    /// Indices of the lines currently inside the window.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.scroll_offset.min(self.lines.len());
        let end = (start + self.visible_height()).min(self.lines.len());
        start..end
    }

    /// Applies the capacity bound to incoming lines and returns how many
    /// leading entries were dropped.
    fn store_lines(&mut self, mut lines: Vec<String>) -> usize {
        let evicted = if self.max_lines > 0 && lines.len() > self.max_lines {
            lines.len() - self.max_lines
        } else {
            0
        };
        if evicted > 0 {
            lines.drain(..evicted);
            debug!(evicted, max_lines = self.max_lines, "trimmed incoming transcript");
        }
        self.lines = lines;
        evicted
    }

    fn after_buffer_change(&mut self) {
        self.reindex_search();
        self.clamp_scroll();
    }

    pub(crate) fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|idx| format!("line {idx}")).collect()
    }

    fn ts(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, sec)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn new_viewport_is_empty_with_default_size() {
        let viewport = Viewport::new();
        assert_eq!(viewport.line_count(), 0);
        assert_eq!(viewport.width(), DEFAULT_WIDTH);
        assert_eq!(viewport.height(), DEFAULT_HEIGHT);
        assert_eq!(viewport.visible_height(), 22);
        assert_eq!(viewport.scroll_offset(), 0);
        assert_eq!(viewport.visible_range(), 0..0);
    }

    #[test]
    fn visible_height_never_drops_below_one() {
        let mut viewport = Viewport::with_size(10, 0);
        assert_eq!(viewport.visible_height(), 1);
        viewport.set_size(10, 2);
        assert_eq!(viewport.visible_height(), 1);
        viewport.set_size(10, 3);
        assert_eq!(viewport.visible_height(), 1);
        viewport.set_size(10, 4);
        assert_eq!(viewport.visible_height(), 2);
    }

    #[test]
    fn set_lines_keeps_only_newest_when_bounded() {
        let mut viewport = Viewport::new().with_max_lines(3);
        viewport.set_lines(lines(&["a", "b", "c", "d"]));
        assert_eq!(viewport.lines(), lines(&["b", "c", "d"]).as_slice());
    }

    #[test]
    fn set_lines_preserves_valid_offset_and_clamps_invalid_one() {
        let mut viewport = Viewport::with_size(40, 5);
        viewport.set_lines(numbered(10));
        viewport.scroll_down(4);
        assert_eq!(viewport.scroll_offset(), 4);

        viewport.set_lines(numbered(12));
        assert_eq!(viewport.scroll_offset(), 4);

        viewport.set_lines(numbered(5));
        assert_eq!(viewport.scroll_offset(), 2);

        viewport.set_lines(Vec::new());
        assert_eq!(viewport.scroll_offset(), 0);
    }

    #[test]
    fn set_lines_drops_previous_timestamps() {
        let mut viewport = Viewport::new();
        viewport.set_lines_with_timestamps(lines(&["a", "b"]), vec![ts(1), ts(2)]);
        assert_eq!(viewport.timestamps().len(), 2);

        viewport.set_lines(lines(&["a", "b"]));
        assert!(viewport.timestamps().is_empty());
    }

    #[test]
    fn timestamps_are_trimmed_with_lines() {
        let mut viewport = Viewport::new().with_max_lines(2);
        viewport.set_lines_with_timestamps(lines(&["a", "b", "c"]), vec![ts(1), ts(2), ts(3)]);
        assert_eq!(viewport.lines(), lines(&["b", "c"]).as_slice());
        assert_eq!(viewport.timestamps(), &[ts(2), ts(3)]);
    }

    #[test]
    fn timestamps_matching_retained_lines_are_kept() {
        let mut viewport = Viewport::new().with_max_lines(2);
        viewport.set_lines_with_timestamps(lines(&["a", "b", "c"]), vec![ts(2), ts(3)]);
        assert_eq!(viewport.timestamps(), &[ts(2), ts(3)]);
    }

    #[test]
    fn misaligned_timestamps_are_discarded() {
        let mut viewport = Viewport::new();
        viewport.set_lines_with_timestamps(lines(&["a", "b"]), vec![ts(1)]);
        assert_eq!(viewport.line_count(), 2);
        assert!(viewport.timestamps().is_empty());
    }

    #[test]
    fn set_max_lines_shifts_offset_by_evicted_count() {
        let mut viewport = Viewport::with_size(40, 5);
        viewport.set_lines(numbered(8));
        viewport.scroll_down(4);
        assert_eq!(viewport.scroll_offset(), 4);

        viewport.set_max_lines(5);
        assert_eq!(viewport.line_count(), 5);
        assert_eq!(viewport.lines()[0], "line 3");
        assert_eq!(viewport.scroll_offset(), 1);
    }

    #[test]
    fn set_max_lines_saturates_offset_when_more_evicted_than_scrolled() {
        let mut viewport = Viewport::with_size(40, 4);
        viewport.set_lines(numbered(10));
        viewport.scroll_down(1);

        viewport.set_max_lines(3);
        assert_eq!(viewport.lines(), lines(&["line 7", "line 8", "line 9"]).as_slice());
        assert_eq!(viewport.scroll_offset(), 0);
    }

    #[test]
    fn set_max_lines_zero_is_unbounded() {
        let mut viewport = Viewport::new();
        viewport.set_lines(numbered(50));
        viewport.set_max_lines(0);
        assert_eq!(viewport.line_count(), 50);
        assert_eq!(viewport.max_lines(), 0);
    }

    #[test]
    fn scrolling_clamps_at_both_ends() {
        let mut viewport = Viewport::with_size(40, 5);
        viewport.set_lines(numbered(10));

        viewport.scroll_up(3);
        assert_eq!(viewport.scroll_offset(), 0);

        viewport.scroll_down(usize::MAX);
        assert_eq!(viewport.scroll_offset(), 7);
        assert!(viewport.is_at_bottom());

        viewport.scroll_up(2);
        assert_eq!(viewport.scroll_offset(), 5);

        viewport.scroll_to_top();
        assert_eq!(viewport.scroll_offset(), 0);

        viewport.scroll_to_bottom();
        assert_eq!(viewport.scroll_offset(), 7);
        assert_eq!(viewport.visible_range(), 7..10);
    }

    #[test]
    fn scroll_to_bottom_on_short_buffer_stays_at_zero() {
        let mut viewport = Viewport::with_size(40, 10);
        viewport.set_lines(numbered(3));
        viewport.scroll_to_bottom();
        assert_eq!(viewport.scroll_offset(), 0);
        assert!(viewport.is_at_bottom());
    }

    #[test]
    fn growing_the_window_pulls_offset_back() {
        let mut viewport = Viewport::with_size(40, 5);
        viewport.set_lines(numbered(10));
        viewport.scroll_to_bottom();
        assert_eq!(viewport.scroll_offset(), 7);

        viewport.set_size(40, 10);
        assert_eq!(viewport.scroll_offset(), 2);
    }

    #[test]
    fn scroll_line_into_view_moves_minimally() {
        let mut viewport = Viewport::with_size(40, 5);
        viewport.set_lines(numbered(20));

        viewport.scroll_line_into_view(1);
        assert_eq!(viewport.scroll_offset(), 0);

        viewport.scroll_line_into_view(10);
        assert_eq!(viewport.scroll_offset(), 8);
        assert!(viewport.visible_range().contains(&10));

        viewport.scroll_line_into_view(4);
        assert_eq!(viewport.scroll_offset(), 4);

        viewport.scroll_line_into_view(99);
        assert_eq!(viewport.scroll_offset(), 17);

        viewport.scroll_line_into_view(usize::MAX);
        assert_eq!(viewport.scroll_offset(), 17);
    }

    #[test]
    fn scroll_line_into_view_clamps_huge_targets_from_the_top() {
        let mut viewport = Viewport::with_size(40, 5);
        viewport.set_lines(numbered(10));
        assert_eq!(viewport.scroll_offset(), 0);

        viewport.scroll_line_into_view(usize::MAX);
        assert_eq!(viewport.scroll_offset(), 7);
    }
}
