//! # Box Sizer
//!
//! Estimated rendered heights and contextual top margins for every block
//! kind. Single-line kinds get a fixed height; variable-length kinds get a
//! base height plus one line-step for every extra wrapped line, using a
//! kind-specific characters-per-line constant.
//!
//! The payload length passed in is the *undecorated* text — icons and
//! labels the flow engine prepends do not count toward wrapping.

use crate::model::BlockKind;

/// Height added per extra wrapped line.
const LINE_STEP: f64 = 16.0;

/// Extra height for payloads that wrap past one line.
fn extra_lines(chars: usize, chars_per_line: usize) -> f64 {
    let lines = chars.div_ceil(chars_per_line);
    if lines > 1 {
        (lines - 1) as f64 * LINE_STEP
    } else {
        0.0
    }
}

/// Estimated rendered height of a block, given its undecorated payload
/// length in `char`s. Table blocks are sized from their row count via
/// [`table_height`]; shapes carry an explicit height and never come
/// through here.
pub fn block_height(kind: BlockKind, payload_chars: usize) -> f64 {
    match kind {
        BlockKind::HeadingTitle => 66.0,
        BlockKind::HeadingChapter => 42.0,
        BlockKind::HeadingSub => 30.0,
        BlockKind::Step => 44.0 + extra_lines(payload_chars, 35),
        BlockKind::Summary => 50.0 + extra_lines(payload_chars, 35),
        BlockKind::BigQuote => 50.0 + extra_lines(payload_chars, 38),
        BlockKind::ChecklistItem => 24.0,
        BlockKind::Highlight => 36.0 + extra_lines(payload_chars, 38),
        BlockKind::Callout(_) => 34.0 + extra_lines(payload_chars, 40),
        BlockKind::ListItem => 20.0,
        BlockKind::ImagePlaceholder => 100.0,
        BlockKind::Divider => 20.0,
        BlockKind::Paragraph => 20.0 + (payload_chars / 45) as f64 * LINE_STEP,
        BlockKind::Table | BlockKind::Shape => 0.0,
    }
}

/// Composite height of a flushed table: header row, data rows, padding.
pub fn table_height(row_count: usize) -> f64 {
    32.0 + (row_count.saturating_sub(1)) as f64 * 28.0 + 16.0
}

/// Top margin for a block, dependent on what was emitted before it.
/// Consecutive items of the same list-like kind pack tighter; a fresh page
/// (`last == None`) drops the title margin entirely.
pub fn margin_above(kind: BlockKind, last: Option<BlockKind>) -> f64 {
    match kind {
        BlockKind::Divider => 16.0,
        BlockKind::HeadingTitle => {
            if last.is_some() {
                16.0
            } else {
                0.0
            }
        }
        BlockKind::HeadingChapter => {
            if last == Some(BlockKind::HeadingTitle) {
                14.0
            } else {
                18.0
            }
        }
        BlockKind::HeadingSub => 14.0,
        BlockKind::Step => 14.0,
        BlockKind::Summary => 16.0,
        BlockKind::BigQuote => 14.0,
        BlockKind::ChecklistItem => {
            if last == Some(BlockKind::ChecklistItem) {
                4.0
            } else {
                10.0
            }
        }
        BlockKind::Highlight => 12.0,
        BlockKind::Callout(_) => 12.0,
        BlockKind::ListItem => {
            if last == Some(BlockKind::ListItem) {
                4.0
            } else {
                8.0
            }
        }
        BlockKind::ImagePlaceholder => 14.0,
        BlockKind::Table => 14.0,
        BlockKind::Paragraph => {
            if last == Some(BlockKind::Paragraph) {
                6.0
            } else {
                10.0
            }
        }
        BlockKind::Shape => 0.0,
    }
}

/// Vertical advance for a run of consecutive blank lines (applied once).
pub fn blank_spacing(last: Option<BlockKind>) -> f64 {
    if last == Some(BlockKind::Paragraph) {
        16.0
    } else {
        12.0
    }
}
