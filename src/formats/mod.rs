/*!
 * Format emitters.
 *
 * Every emitter turns an ordered list of segments into one fully buffered string:
 * - `lrc`: lyric-timed lines from the pause segmenter
 * - `srt`: numbered subtitle blocks from word grouping and duration balancing
 * - `vtt`: one web caption cue per segment
 * - `txt`: plain text, one segment per line
 * - `json`: pretty-printed `{start, end, text}` records
 *
 * `synthesize` is the single entry point used by the controller.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use log::debug;

use crate::errors::SynthesisError;
use crate::layout::LayoutConfig;
use crate::transcript::{Segment, SegmentView, TextSource};

pub mod json;
pub mod lrc;
pub mod srt;
pub mod txt;
pub mod vtt;

pub use srt::Block;

/// Artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lyric-timed text
    #[default]
    Lrc,
    /// Numbered subtitle blocks
    Srt,
    /// Web captions
    Vtt,
    /// Plain text
    Txt,
    /// Structured records
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [Self::Lrc, Self::Srt, Self::Vtt, Self::Txt, Self::Json];

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Lrc => "lrc",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s.trim().trim_start_matches('.')))
            .ok_or_else(|| anyhow::anyhow!("Unsupported output format: {}", s))
    }
}

/// Segments with usable text for `source`; the rest are skipped with a debug log
pub fn usable_views(segments: &[Segment], source: TextSource) -> Vec<SegmentView<'_>> {
    segments
        .iter()
        .enumerate()
        .filter_map(|(index, segment)| match segment.view(index, source) {
            Ok(view) => Some(view),
            Err(e) => {
                debug!("Skipping segment: {}", e);
                None
            }
        })
        .collect()
}

/// Renders segments in the requested format.
///
/// Fails with `NoSegments` when no segment carries text for `source`.
pub fn synthesize(
    segments: &[Segment],
    format: OutputFormat,
    source: TextSource,
    layout: &LayoutConfig,
) -> Result<String, SynthesisError> {
    let views = usable_views(segments, source);
    if views.is_empty() {
        return Err(SynthesisError::NoSegments { format });
    }

    match format {
        OutputFormat::Lrc => Ok(lrc::render(&views, &layout.pause_rules())),
        OutputFormat::Srt => Ok(srt::render(&views, layout)),
        OutputFormat::Vtt => Ok(vtt::render(&views)),
        OutputFormat::Txt => Ok(txt::render(&views)),
        OutputFormat::Json => json::render(&views),
    }
}
