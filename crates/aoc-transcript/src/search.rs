use crate::viewport::Viewport;
use tracing::debug;

impl Viewport {
    /// Starts a new search. The hit cursor resets to the first match, which
    /// is scrolled into view.
    pub fn set_search(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.search_index = 0;
        self.search_hits = collect_hits(&self.lines, &self.search_query);
        debug!(
            query_len = self.search_query.chars().count(),
            hits = self.search_hits.len(),
            "transcript search updated"
        );
        if let Some(&first) = self.search_hits.first() {
            self.scroll_line_into_view(first);
        }
    }

    /// Drops the query and its hits; the scroll position is left alone.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.search_hits.clear();
        self.search_index = 0;
    }

    pub fn next_search_hit(&mut self) {
        if self.search_hits.is_empty() {
            return;
        }
        self.search_index = (self.search_index + 1) % self.search_hits.len();
        self.focus_current_hit();
    }

    pub fn prev_search_hit(&mut self) {
        if self.search_hits.is_empty() {
            return;
        }
        let count = self.search_hits.len();
        self.search_index = (self.search_index + count - 1) % count;
        self.focus_current_hit();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_searching(&self) -> bool {
        !self.search_query.is_empty()
    }

    pub fn search_hits(&self) -> &[usize] {
        &self.search_hits
    }

    pub fn hit_count(&self) -> usize {
        self.search_hits.len()
    }

    pub fn search_index(&self) -> usize {
        self.search_index
    }

    /// Line index of the selected hit, if any.
    pub fn current_hit(&self) -> Option<usize> {
        self.search_hits.get(self.search_index).copied()
    }

    /// Rebuilds hits for the current query after the buffer changed. The hit
    /// cursor survives unless the new hit list is too short for it.
    pub(crate) fn reindex_search(&mut self) {
        self.search_hits = collect_hits(&self.lines, &self.search_query);
        if self.search_index >= self.search_hits.len() {
            self.search_index = 0;
        }
    }

    fn focus_current_hit(&mut self) {
        if let Some(line) = self.current_hit() {
            debug!(index = self.search_index, line, "focused search hit");
            self.scroll_line_into_view(line);
        }
    }
}

fn collect_hits(lines: &[String], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| find_ignore_case(line, query).is_some())
        .map(|(idx, _)| idx)
        .collect()
}

/// Byte range of the first case-insensitive occurrence of `needle`.
///
/// Both sides are lowercased char by char and matched as whole strings, so
/// chars whose lowercase form expands (`İ` becomes `i̇`) still match. The
/// returned range is widened to whole chars of `haystack`.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let needle = lowercase(needle);
    let mut lowered = String::with_capacity(haystack.len());
    let mut origin = Vec::with_capacity(haystack.len());
    for (start, ch) in haystack.char_indices() {
        let span = (start, start + ch.len_utf8());
        for lower in ch.to_lowercase() {
            lowered.push(lower);
            origin.extend(std::iter::repeat(span).take(lower.len_utf8()));
        }
    }
    let at = lowered.find(&needle)?;
    Some((origin[at].0, origin[at + needle.len() - 1].1))
}

fn lowercase(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}
