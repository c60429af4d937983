use crate::timecode::seconds_to_caption_time;
use crate::transcript::SegmentView;

// @module: Web caption emitter

/// Header line, written once and followed by a blank line
pub const VTT_HEADER: &str = "WEBVTT";

/// Renders the header and one cue per segment
pub fn render(views: &[SegmentView<'_>]) -> String {
    let mut content = format!("{}\n\n", VTT_HEADER);

    for view in views {
        content.push_str(&format!(
            "{} --> {}\n{}\n\n",
            seconds_to_caption_time(Some(view.start)),
            seconds_to_caption_time(Some(view.end)),
            view.text.trim()
        ));
    }

    content
}
