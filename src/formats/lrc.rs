use crate::layout::{segment_lyric_lines, PauseRules};
use crate::timecode::seconds_to_lyric_time;
use crate::transcript::SegmentView;

// @module: Lyric-timed text emitter

/// Renders `[MM:SS.cc]text` lines, each terminated by a newline
pub fn render(views: &[SegmentView<'_>], rules: &PauseRules) -> String {
    let mut content = String::new();

    for view in views {
        if !view.has_word_timing() {
            push_line(&mut content, view.start, view.text.trim());
            continue;
        }

        for line in segment_lyric_lines(view.words, rules) {
            push_line(&mut content, line.start, &line.text());
        }
    }

    content
}

fn push_line(content: &mut String, start: f64, text: &str) {
    content.push_str(&seconds_to_lyric_time(Some(start)));
    content.push_str(text);
    content.push('\n');
}
