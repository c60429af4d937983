use serde::{Deserialize, Serialize};

use crate::errors::SynthesisError;
use crate::formats::OutputFormat;
use crate::timecode::truncate_to_millis;
use crate::transcript::SegmentView;

// @module: Structured record emitter

/// One exported segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<&SegmentView<'_>> for SegmentRecord {
    fn from(view: &SegmentView<'_>) -> Self {
        Self {
            start: truncate_to_millis(view.start),
            end: truncate_to_millis(view.end),
            text: view.text.trim().to_string(),
        }
    }
}

/// Pretty-printed array of records, two-space indented, non-ASCII kept as is
pub fn render(views: &[SegmentView<'_>]) -> Result<String, SynthesisError> {
    let records: Vec<SegmentRecord> = views.iter().map(SegmentRecord::from).collect();

    serde_json::to_string_pretty(&records).map_err(|e| SynthesisError::Encoding {
        format: OutputFormat::Json,
        message: e.to_string(),
    })
}
