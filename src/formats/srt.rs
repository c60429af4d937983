/*!
 * Subtitle block emitter.
 *
 * Timed words are grouped under the line budget, each group becomes one block and
 * block spans come from the configured timing strategy. A segment without timed
 * words becomes a single block covering the whole segment.
 */

use std::fmt;
use log::debug;

use crate::layout::durations::enforce_min_gap;
use crate::layout::{balance_lines, group_words, LayoutConfig, TimingStrategy};
use crate::timecode::seconds_to_subtitle_time;
use crate::transcript::SegmentView;

/// Width given to blocks whose end does not come after their start
const DEGENERATE_WIDTH: f64 = 0.001;

/// One numbered subtitle block
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// 1-based, dense in emission order
    pub sequence: usize,
    pub start: f64,
    pub end: f64,
    pub lines: Vec<String>,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.sequence)?;
        writeln!(
            f,
            "{} --> {}",
            seconds_to_subtitle_time(Some(self.start)),
            seconds_to_subtitle_time(Some(self.end))
        )?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Builds the blocks for all segments
pub fn build_blocks(views: &[SegmentView<'_>], layout: &LayoutConfig) -> Vec<Block> {
    let budget = layout.line_budget();
    let mut blocks = Vec::new();

    for view in views {
        // Gap kept before each block of this segment; character-budget spans stay contiguous
        let mut gap = 0.0;
        let pieces: Vec<((f64, f64), Vec<String>)> = if view.has_word_timing() {
            let groups = group_words(view.words, &budget);
            let word_spans: Option<Vec<(f64, f64)>> = match layout.strategy {
                TimingStrategy::WordTimingDriven => groups.iter().map(|g| g.timing()).collect(),
                TimingStrategy::CharacterBudget => None,
            };

            let spans = match word_spans {
                Some(mut spans) => {
                    enforce_min_gap(&mut spans, layout.min_gap);
                    gap = layout.min_gap;
                    spans
                }
                None => {
                    if layout.strategy == TimingStrategy::WordTimingDriven {
                        debug!("Segment at {:.3}s has untimed groups, using character budget", view.start);
                    }
                    let chars: Vec<usize> = groups.iter().map(|g| g.char_count()).collect();
                    layout.durations.balance_spans(view.start, view.end - view.start, &chars)
                }
            };

            spans.into_iter().zip(groups.into_iter().map(|g| g.lines)).collect()
        } else {
            vec![((view.start, view.end), balance_lines(view.text, &budget))]
        };

        for ((start, end), lines) in pieces {
            if lines.is_empty() {
                continue;
            }
            let start = match blocks.last_mut() {
                Some(previous) => separate(previous, start, gap),
                None => start,
            };
            let end = if end > start { end } else { start + DEGENERATE_WIDTH };
            blocks.push(Block {
                sequence: blocks.len() + 1,
                start,
                end,
                lines,
            });
        }
    }

    blocks
}

/// Start for a block following `previous`, shrinking `previous` so it ends `gap` earlier.
///
/// Only the earlier end moves, and never below the minimal block width. When the later
/// block starts before even that, its start is moved up to the earlier end so the
/// blocks stay ordered and never overlap.
fn separate(previous: &mut Block, start: f64, gap: f64) -> f64 {
    if start - previous.end >= gap {
        return start;
    }

    previous.end = (start - gap).max(previous.start + DEGENERATE_WIDTH);
    start.max(previous.end)
}

/// Renders `n\nstart --> end\nlines\n\n` blocks
pub fn render(views: &[SegmentView<'_>], layout: &LayoutConfig) -> String {
    build_blocks(views, layout)
        .iter()
        .map(|block| block.to_string())
        .collect()
}
