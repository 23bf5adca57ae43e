//! Layout constants and derived widths for the RFC detail screen.
//!
//! The view and the model both size the document from these, so the row
//! indices the layout engine produces line up with what gets drawn.

// --- Detail screen chrome ---

/// Title, metadata, reviewers and a separator row.
pub const DETAIL_HEADER_HEIGHT: u32 = 4;
/// Help bar plus bottom margin.
pub const HELP_BAR_HEIGHT: u32 = 2;

// --- List screen chrome ---

/// Box border, title row and repo filter row.
pub const LIST_HEADER_HEIGHT: u32 = 3;

// --- Columns ---

/// Line numbers (up to 4 digits), a comment marker and a space.
pub const GUTTER_WIDTH: u32 = 6;
pub const DOC_H_PAD: u32 = 1;
pub const SIDEBAR_WIDTH: u32 = 42;
pub const NARROW_SIDEBAR_WIDTH: u32 = 32;
/// Below this total width the sidebar shrinks.
pub const NARROW_THRESHOLD: u32 = 100;
pub const MIN_DOC_WIDTH: u32 = 20;

// --- Sidebar boxes ---

/// Blank rows between packed boxes.
pub const BOX_GAP: u32 = 1;
/// Text rows shown in a composer or reply box even when empty.
pub const MIN_EDITOR_ROWS: u32 = 3;

/// Width of the comment sidebar for a terminal `total` columns wide.
#[must_use]
pub fn sidebar_width(total: u32) -> u32 {
    let wanted = if total < NARROW_THRESHOLD {
        NARROW_SIDEBAR_WIDTH
    } else {
        SIDEBAR_WIDTH
    };
    wanted.min(total.saturating_sub(GUTTER_WIDTH + MIN_DOC_WIDTH + 1))
}

/// Width available to rendered document text.
#[must_use]
pub fn document_width(total: u32) -> u32 {
    total
        .saturating_sub(GUTTER_WIDTH + sidebar_width(total) + 1 + DOC_H_PAD * 2)
        .max(MIN_DOC_WIDTH)
}

/// Rows available to the document on the detail screen.
#[must_use]
pub fn document_height(total: u32) -> u32 {
    total.saturating_sub(DETAIL_HEADER_HEIGHT + HELP_BAR_HEIGHT).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_fill_the_terminal() {
        for total in [80, 120, 200] {
            let used = GUTTER_WIDTH + document_width(total) + DOC_H_PAD * 2 + 1 + sidebar_width(total);
            assert_eq!(used, total, "width {total}");
        }
    }

    #[test]
    fn narrow_terminals_get_a_smaller_sidebar() {
        assert_eq!(sidebar_width(90), NARROW_SIDEBAR_WIDTH);
        assert_eq!(sidebar_width(140), SIDEBAR_WIDTH);
        assert_eq!(document_width(10), MIN_DOC_WIDTH);
    }
}
