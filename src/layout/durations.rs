/*!
 * Duration balancing for synthesized subtitle blocks.
 *
 * Two strategies exist:
 * - character budget: block durations follow character counts under absolute and
 *   per-character limits, then get rescaled so they fill the parent segment exactly;
 * - word timing: blocks keep the recognizer's word boundaries and only get a minimum
 *   gap enforced between neighbours.
 */

use serde::{Deserialize, Serialize};

/// Minimum gap between consecutive word-timed blocks, in seconds
pub const DEFAULT_MIN_GAP: f64 = 0.01;

/// How block spans are derived inside a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingStrategy {
    /// Spans derived from character counts
    CharacterBudget,
    /// Spans taken from word timestamps
    #[default]
    WordTimingDriven,
}

/// Display duration limits, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationLimits {
    #[serde(default = "default_min_abs")]
    pub min_abs: f64,

    #[serde(default = "default_max_abs")]
    pub max_abs: f64,

    #[serde(default = "default_min_per_char")]
    pub min_per_char: f64,

    #[serde(default = "default_ideal_per_char")]
    pub ideal_per_char: f64,

    #[serde(default = "default_max_per_char")]
    pub max_per_char: f64,
}

impl Default for DurationLimits {
    fn default() -> Self {
        Self {
            min_abs: default_min_abs(),
            max_abs: default_max_abs(),
            min_per_char: default_min_per_char(),
            ideal_per_char: default_ideal_per_char(),
            max_per_char: default_max_per_char(),
        }
    }
}

fn default_min_abs() -> f64 {
    0.7
}

fn default_max_abs() -> f64 {
    5.0
}

fn default_min_per_char() -> f64 {
    0.03
}

fn default_ideal_per_char() -> f64 {
    0.05
}

fn default_max_per_char() -> f64 {
    0.185
}

/// `value` held inside `[low, high]`; never panics on inverted bounds
fn bound(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

impl DurationLimits {
    /// Duration for a block of `chars` characters out of `total_chars` sharing `total` seconds.
    ///
    /// The per-character window is itself held inside `[min_abs, max_abs]`, so the
    /// result always respects the absolute limits.
    pub fn target_duration(&self, chars: usize, total_chars: usize, total: f64) -> f64 {
        let c = chars as f64;
        let proportional = if total_chars == 0 {
            0.0
        } else {
            total * c / total_chars as f64
        };

        let duration = bound((c * self.ideal_per_char).max(proportional), self.min_abs, self.max_abs);
        let low = bound(c * self.min_per_char, self.min_abs, self.max_abs);
        let high = bound(c * self.max_per_char, self.min_abs, self.max_abs);

        bound(duration, low, high)
    }

    /// Target durations before rescaling
    pub fn target_durations(&self, chars: &[usize], total: f64) -> Vec<f64> {
        let total_chars: usize = chars.iter().sum();
        if total_chars == 0 {
            let share = total.max(0.0) / chars.len().max(1) as f64;
            return vec![share; chars.len()];
        }

        chars
            .iter()
            .map(|c| self.target_duration(*c, total_chars, total))
            .collect()
    }

    /// Consecutive spans starting at `start` that together cover exactly `total` seconds
    pub fn balance_spans(&self, start: f64, total: f64, chars: &[usize]) -> Vec<(f64, f64)> {
        if chars.is_empty() {
            return Vec::new();
        }

        let total = total.max(0.0);
        let targets = self.target_durations(chars, total);
        let sum: f64 = targets.iter().sum();
        let scale = if sum > 0.0 { total / sum } else { 0.0 };

        let mut cursor = start;
        let mut spans: Vec<(f64, f64)> = targets
            .iter()
            .map(|d| {
                let span_start = cursor;
                cursor += d * scale;
                (span_start, cursor)
            })
            .collect();

        // Pin the last end so float drift never crosses the segment end
        if let Some(last) = spans.last_mut() {
            last.1 = start + total;
        }

        spans
    }
}

/// Shrinks earlier spans so consecutive spans are at least `gap` apart.
///
/// Only an earlier span's end ever moves; later starts keep the recognizer's timing.
pub fn enforce_min_gap(spans: &mut [(f64, f64)], gap: f64) {
    for i in 1..spans.len() {
        let next_start = spans[i].0;
        let current = &mut spans[i - 1];
        if next_start - current.1 < gap {
            current.1 = current.0.max(next_start - gap);
        }
    }
}
