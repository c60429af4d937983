use serde::{Deserialize, Serialize};

// @module: Visual line balancing for subtitle blocks

/// Character and line limits for one rendered block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBudget {
    pub max_line_chars: usize,
    pub min_line_chars: usize,
    pub max_lines: usize,
}

impl Default for LineBudget {
    fn default() -> Self {
        Self {
            max_line_chars: 40,
            min_line_chars: 1,
            max_lines: 2,
        }
    }
}

impl LineBudget {
    fn fits(&self, len: usize) -> bool {
        len >= self.min_line_chars && len <= self.max_line_chars
    }
}

/// Display width used for every budget check
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits `text` into at most two visually balanced lines.
///
/// Text that fits the budget stays on one line. Longer text is split at the word
/// boundary with the smallest length difference, preferring splits where both halves
/// respect `[min_line_chars, max_line_chars]`. A single token cannot be split and is
/// returned whole, even when it exceeds the budget.
pub fn balance_lines(text: &str, budget: &LineBudget) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let normalized = words.join(" ");
    if char_len(&normalized) <= budget.max_line_chars {
        return vec![normalized];
    }

    if budget.max_lines >= 2 {
        if let Some(split) = best_split(&words, budget) {
            return vec![words[..split].join(" "), words[split..].join(" ")];
        }
    }

    greedy_wrap(&words, budget.max_line_chars, budget.max_lines.max(1))
}

/// Index of the first word of the second line, if any two-way split exists
fn best_split(words: &[&str], budget: &LineBudget) -> Option<usize> {
    if words.len() < 2 {
        return None;
    }

    let lengths: Vec<usize> = words.iter().map(|w| char_len(w)).collect();
    let total = lengths.iter().sum::<usize>() + words.len() - 1;

    let mut best_fitting: Option<(usize, usize)> = None;
    let mut best_any: Option<(usize, usize)> = None;
    let mut first_len = 0;

    for split in 1..words.len() {
        first_len += lengths[split - 1] + usize::from(split > 1);
        let second_len = total - first_len - 1;
        let diff = first_len.abs_diff(second_len);

        if budget.fits(first_len) && budget.fits(second_len)
            && best_fitting.map_or(true, |(best, _)| diff < best)
        {
            best_fitting = Some((diff, split));
        }
        if best_any.map_or(true, |(best, _)| diff < best) {
            best_any = Some((diff, split));
        }
    }

    best_fitting.or(best_any).map(|(_, split)| split)
}

/// Width-based wrap; lines past `max_lines` are dropped
pub fn greedy_wrap(words: &[&str], width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in words {
        if !current.is_empty() && char_len(&current) + char_len(word) + 1 > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.truncate(max_lines);
    lines
}
