use serde::{Deserialize, Serialize};

use crate::layout::grouping::join_hyphenated;
use crate::transcript::Word;

// @module: Pause-driven line breaking for lyric output

/// Line breaking rules for lyric-timed text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PauseRules {
    /// Gap in seconds that starts a new line
    pub pause_threshold: f64,

    /// Words a line may hold before it is flushed
    pub max_words_per_line: usize,
}

impl Default for PauseRules {
    fn default() -> Self {
        Self {
            pause_threshold: 0.25,
            max_words_per_line: 7,
        }
    }
}

/// One lyric line, stamped with its first timed word's start
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    pub start: f64,
    pub words: Vec<Word>,
}

impl LyricLine {
    /// Line text with hyphen continuations joined
    pub fn text(&self) -> String {
        join_hyphenated(&self.words)
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Breaks a segment's words into lyric lines.
///
/// A timed word starts a new line when the pause since the previous timed word exceeds
/// the threshold, or when the open line already holds `max_words_per_line` words.
/// Untimed words join the open line and leave the pause clock alone; with no open line
/// they are dropped.
pub fn segment_lyric_lines(words: &[Word], rules: &PauseRules) -> Vec<LyricLine> {
    let mut lines = Vec::new();
    let mut current: Option<LyricLine> = None;
    let mut previous_end: Option<f64> = None;

    for word in words {
        if word.trimmed().is_empty() {
            continue;
        }

        let Some((start, end)) = word.timing() else {
            if let Some(line) = current.as_mut() {
                line.words.push(word.clone());
            }
            continue;
        };

        let breaks = current.as_ref().is_some_and(|line| {
            let paused = previous_end.is_some_and(|prev| start - prev > rules.pause_threshold);
            paused || line.words.len() >= rules.max_words_per_line
        });

        match current.as_mut() {
            Some(line) if !breaks => line.words.push(word.clone()),
            _ => lines.extend(current.replace(LyricLine { start, words: vec![word.clone()] })),
        }

        previous_end = Some(end);
    }

    lines.extend(current);
    lines
}
