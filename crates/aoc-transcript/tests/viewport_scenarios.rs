use aoc_transcript::{RenderTheme, Viewport};
use chrono::{DateTime, TimeZone, Utc};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn ts(sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 23, 12, 0, sec)
        .single()
        .expect("valid timestamp")
}

fn assert_bounded(viewport: &Viewport, step: usize) {
    let max = viewport
        .line_count()
        .saturating_sub(viewport.visible_height());
    assert!(
        viewport.scroll_offset() <= max,
        "step {step}: offset {} exceeds max {max}",
        viewport.scroll_offset()
    );
    if let Some(hit) = viewport.current_hit() {
        assert!(hit < viewport.line_count(), "step {step}: stale hit {hit}");
    }
}

#[test]
fn capacity_set_before_insertion_keeps_newest_lines() {
    let mut viewport = Viewport::new();
    viewport.set_max_lines(3);
    viewport.set_lines(lines(&["one", "two", "three", "four"]));
    assert_eq!(viewport.lines(), lines(&["two", "three", "four"]).as_slice());
}

#[test]
fn shrinking_capacity_keeps_scroll_anchored_to_content() {
    let mut viewport = Viewport::with_size(80, 4);
    assert_eq!(viewport.visible_height(), 2);
    viewport.set_lines(lines(&["a", "b", "c", "d", "e"]));
    viewport.scroll_down(3);
    assert_eq!(viewport.scroll_offset(), 3);

    viewport.set_max_lines(3);
    assert_eq!(viewport.lines(), lines(&["c", "d", "e"]).as_slice());
    assert_eq!(viewport.scroll_offset(), 1);
}

#[test]
fn shrinking_capacity_keeps_timestamps_aligned() {
    let mut viewport = Viewport::new();
    viewport.set_lines_with_timestamps(lines(&["a", "b", "c"]), vec![ts(1), ts(2), ts(3)]);
    viewport.set_max_lines(2);
    assert_eq!(viewport.lines(), lines(&["b", "c"]).as_slice());
    assert_eq!(viewport.timestamps(), &[ts(2), ts(3)]);
}

#[test]
fn mismatched_timestamps_are_dropped() {
    let mut viewport = Viewport::new();
    viewport.set_lines_with_timestamps(lines(&["a", "b"]), vec![ts(1)]);
    assert!(viewport.timestamps().is_empty());
}

#[test]
fn search_hits_and_cyclic_navigation() {
    let mut viewport = Viewport::new();
    viewport.set_lines(lines(&["alpha", "beta", "gamma beta"]));
    viewport.set_search("beta");
    assert_eq!(viewport.search_hits(), &[1, 2]);
    assert_eq!(viewport.hit_count(), 2);

    viewport.next_search_hit();
    assert_eq!(viewport.search_index(), 1);
    viewport.next_search_hit();
    assert_eq!(viewport.search_index(), 0);
}

#[test]
fn repeated_render_is_stable() {
    let theme = RenderTheme::default();
    let mut viewport = Viewport::with_size(30, 5);
    viewport.set_lines(lines(&[
        "$ cargo test",
        "error: could not compile",
        "warning: unused import",
        "[tool] read_file",
        "```",
        "plain output",
    ]));
    viewport.set_search("o");
    viewport.next_search_hit();
    assert_eq!(viewport.render(&theme), viewport.render(&theme));
    assert_eq!(viewport.render_plain(), viewport.render_plain());
}

#[test]
fn scroll_bound_holds_across_operation_sequences() {
    let mut viewport = Viewport::with_size(40, 6);
    let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move |bound: u64| {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed % bound) as usize
    };

    for step in 0..2_000 {
        match next(12) {
            0 => {
                let count = next(40);
                let content = (0..count).map(|idx| format!("entry {idx} beta")).collect();
                viewport.set_lines(content);
            }
            1 => {
                let count = next(30);
                let content: Vec<String> = (0..count).map(|idx| format!("row {idx}")).collect();
                let stamps = (0..next(31)).map(|sec| ts((sec % 60) as u32)).collect();
                viewport.set_lines_with_timestamps(content, stamps);
            }
            2 => viewport.set_max_lines(next(25)),
            3 => viewport.scroll_up(next(50)),
            4 => viewport.scroll_down(next(50)),
            5 => viewport.scroll_to_top(),
            6 => viewport.scroll_to_bottom(),
            7 => viewport.set_search(["beta", "row 1", "", "zzz"][next(4)]),
            8 => viewport.clear_search(),
            9 => viewport.next_search_hit(),
            10 => viewport.prev_search_hit(),
            _ => viewport.set_size(next(100) as u16, next(20) as u16),
        }
        assert_bounded(&viewport, step);
        let stamps = viewport.timestamps().len();
        assert!(stamps == 0 || stamps == viewport.line_count(), "step {step}");
    }
}
