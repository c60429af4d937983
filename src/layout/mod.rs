/*!
 * Layout engine shared by the subtitle emitters.
 *
 * - `lines`: balancing text over one or two display lines
 * - `grouping`: partitioning words into display groups, hyphen joining
 * - `durations`: block durations and spans inside a segment
 * - `pauses`: pause-driven lyric line breaking
 */

use serde::{Deserialize, Serialize};

pub mod durations;
pub mod grouping;
pub mod lines;
pub mod pauses;

pub use durations::{DurationLimits, TimingStrategy, DEFAULT_MIN_GAP};
pub use grouping::{group_words, join_hyphenated, LineGroup};
pub use lines::{balance_lines, LineBudget};
pub use pauses::{segment_lyric_lines, LyricLine, PauseRules};

/// Layout settings read from the `layout` config section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    // @field: Characters per rendered line
    #[serde(default = "default_max_line_chars")]
    pub max_line_chars: usize,

    // @field: Shortest line a balanced split should produce
    #[serde(default = "default_min_line_chars")]
    pub min_line_chars: usize,

    // @field: Lines per subtitle block
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    // @field: Lyric line break pause, in seconds
    #[serde(default = "default_pause_threshold")]
    pub pause_threshold: f64,

    // @field: Lyric line word cap
    #[serde(default = "default_max_words_per_line")]
    pub max_words_per_line: usize,

    // @field: Subtitle block timing
    #[serde(default)]
    pub strategy: TimingStrategy,

    // @field: Gap kept between word-timed blocks
    #[serde(default = "default_min_gap")]
    pub min_gap: f64,

    #[serde(default)]
    pub durations: DurationLimits,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_line_chars: default_max_line_chars(),
            min_line_chars: default_min_line_chars(),
            max_lines: default_max_lines(),
            pause_threshold: default_pause_threshold(),
            max_words_per_line: default_max_words_per_line(),
            strategy: TimingStrategy::default(),
            min_gap: default_min_gap(),
            durations: DurationLimits::default(),
        }
    }
}

impl LayoutConfig {
    pub fn line_budget(&self) -> LineBudget {
        LineBudget {
            max_line_chars: self.max_line_chars,
            min_line_chars: self.min_line_chars,
            max_lines: self.max_lines,
        }
    }

    pub fn pause_rules(&self) -> PauseRules {
        PauseRules {
            pause_threshold: self.pause_threshold,
            max_words_per_line: self.max_words_per_line,
        }
    }

    /// Checks budgets and duration limits
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_line_chars == 0 || self.max_lines == 0 || self.max_words_per_line == 0 {
            return Err(anyhow::anyhow!("Layout limits must be greater than zero"));
        }
        if self.min_line_chars > self.max_line_chars {
            return Err(anyhow::anyhow!(
                "min_line_chars ({}) exceeds max_line_chars ({})",
                self.min_line_chars,
                self.max_line_chars
            ));
        }
        if !(self.pause_threshold >= 0.0) || !(self.min_gap >= 0.0) {
            return Err(anyhow::anyhow!("Pause threshold and minimum gap must be non-negative"));
        }

        let d = &self.durations;
        let ordered = 0.0 < d.min_abs
            && d.min_abs <= d.max_abs
            && 0.0 < d.min_per_char
            && d.min_per_char <= d.ideal_per_char
            && d.ideal_per_char <= d.max_per_char;
        if !ordered {
            return Err(anyhow::anyhow!(
                "Duration limits must satisfy 0 < min_abs <= max_abs and 0 < min_per_char <= ideal_per_char <= max_per_char"
            ));
        }

        Ok(())
    }
}

fn default_max_line_chars() -> usize {
    40
}

fn default_min_line_chars() -> usize {
    1
}

fn default_max_lines() -> usize {
    2
}

fn default_pause_threshold() -> f64 {
    0.25
}

fn default_max_words_per_line() -> usize {
    7
}

fn default_min_gap() -> f64 {
    DEFAULT_MIN_GAP
}
