use crate::transcript::SegmentView;

/// One trimmed segment per line, no trailing newline
pub fn render(views: &[SegmentView<'_>]) -> String {
    views
        .iter()
        .map(|view| view.text.trim())
        .collect::<Vec<_>>()
        .join("\n")
}
