use crate::layout::lines::{balance_lines, char_len, LineBudget};
use crate::transcript::Word;

// @module: Word grouping under character and line budgets

/// Words displayed together as one block
#[derive(Debug, Clone, PartialEq)]
pub struct LineGroup {
    pub words: Vec<Word>,
    /// First timed word's start
    pub start: Option<f64>,
    /// Last timed word's end
    pub end: Option<f64>,
    pub lines: Vec<String>,
}

impl LineGroup {
    fn close(words: Vec<Word>, greedy_lines: Vec<String>, budget: &LineBudget) -> Self {
        let start = words.iter().find_map(|w| w.timing()).map(|(start, _)| start);
        let end = words.iter().rev().find_map(|w| w.timing()).map(|(_, end)| end);

        let text = words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");
        let balanced = balance_lines(&text, budget);
        let lines = if balanced.len() <= budget.max_lines
            && balanced.iter().all(|l| char_len(l) <= budget.max_line_chars)
        {
            balanced
        } else {
            greedy_lines
        };

        Self { words, start, end, lines }
    }

    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    /// Rendered characters, spaces included
    pub fn char_count(&self) -> usize {
        char_len(&self.text())
    }

    pub fn timing(&self) -> Option<(f64, f64)> {
        self.start.zip(self.end)
    }
}

/// Whether a token continues the previous word ("-catrina")
pub fn is_hyphen_continuation(text: &str) -> bool {
    text.starts_with(['-', '\u{2010}'])
}

/// Merges hyphen-continuation tokens into the word before them.
///
/// The merged word keeps the first word's start and takes the continuation's end.
/// A merged word takes no further continuation: `a -b -c` gives `a-b` and `-c`.
/// Blank tokens are dropped and the remaining texts are trimmed.
pub fn join_hyphenated(words: &[Word]) -> Vec<Word> {
    let mut joined: Vec<Word> = Vec::with_capacity(words.len());
    let mut just_merged = false;

    for word in words {
        let text = word.trimmed();
        if text.is_empty() {
            continue;
        }

        match joined.last_mut() {
            Some(previous) if !just_merged && is_hyphen_continuation(text) => {
                previous.text.push_str(text);
                if word.end.is_some() {
                    previous.end = word.end;
                }
                just_merged = true;
            }
            _ => {
                joined.push(Word {
                    text: text.to_string(),
                    start: word.start,
                    end: word.end,
                });
                just_merged = false;
            }
        }
    }

    joined
}

/// Partitions words into display groups.
///
/// A word joins the current line while `line_chars + len + 1 <= max_line_chars`;
/// otherwise it opens a new line, or a new group once the group holds `max_lines`
/// lines. Untimed words ride along without affecting group timing.
pub fn group_words(words: &[Word], budget: &LineBudget) -> Vec<LineGroup> {
    let mut groups = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut lines: Vec<String> = Vec::new();

    for word in join_hyphenated(words) {
        let len = char_len(&word.text);
        let line_chars = lines.last().map_or(0, |l| char_len(l));

        if current.is_empty() {
            lines.push(word.text.clone());
        } else if line_chars + len + 1 <= budget.max_line_chars {
            if let Some(line) = lines.last_mut() {
                line.push(' ');
                line.push_str(&word.text);
            }
        } else if lines.len() < budget.max_lines {
            lines.push(word.text.clone());
        } else {
            let closed = std::mem::take(&mut current);
            let closed_lines = std::mem::replace(&mut lines, vec![word.text.clone()]);
            groups.push(LineGroup::close(closed, closed_lines, budget));
        }

        current.push(word);
    }

    if !current.is_empty() {
        groups.push(LineGroup::close(current, lines, budget));
    }

    groups
}
