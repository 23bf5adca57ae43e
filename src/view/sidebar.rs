//! Comment sidebar: thread boxes and the composer, at packed positions.
//!
//! Boxes are drawn one row at a time so a box straddling the top or bottom
//! of the viewport is clipped instead of skipped. Every box is measured and
//! its height recorded, visible or not, so the next packing pass knows it.

use std::collections::HashMap;

use opentui::{OptimizedBuffer, Rgba, Style};

use super::components::{Rect, draw_text_truncated};
use super::rfc_detail::draw_layout_row;
use crate::comments::CommentEntry;
use crate::editor::TextArea;
use crate::interaction::{InteractionState, SubmitTarget};
use crate::layout::MIN_EDITOR_ROWS;
use crate::markdown::{LayoutRow, render_comment};
use crate::model::{Focus, Model, RfcView, entry_header};
use crate::packer::BoxKey;
use crate::text::display_width;
use crate::theme::Theme;

/// Border plus one column of padding on each side.
const CHROME: u32 = 4;

enum BoxLine<'a> {
    Header { text: String, pending: bool },
    Body { row: LayoutRow, pending: bool },
    Blank,
    Label(&'static str),
    Editor { area: &'a TextArea, row: usize, focused: bool },
    Hint(&'static str),
}

/// A measured sidebar box, ready to draw.
struct SidebarBox<'a> {
    title: String,
    border: Rgba,
    /// Collapsed threads draw as a single header row without a border.
    collapsed: bool,
    lines: Vec<BoxLine<'a>>,
}

impl SidebarBox<'_> {
    fn height(&self) -> u32 {
        if self.collapsed {
            1
        } else {
            self.lines.len() as u32 + 2
        }
    }
}

pub fn view(
    model: &Model,
    buffer: &mut OptimizedBuffer,
    rfc: &RfcView,
    area: Rect,
    heights: &mut HashMap<BoxKey, u32>,
) {
    if area.width <= CHROME {
        return;
    }
    buffer.fill_rect(area.x, area.y, area.width, area.height, model.theme.background);

    let inner_width = (area.width - CHROME) as usize;
    let mut boxes: HashMap<BoxKey, SidebarBox<'_>> = HashMap::new();
    for (line, entries) in rfc.comments.threads() {
        let built = thread_box(model, rfc, line, &entries, inner_width);
        boxes.insert(BoxKey::Thread(line), built);
    }
    if let Some(line) = rfc.interaction.composer_line() {
        boxes.insert(BoxKey::Composer, composer_box(model, rfc, line));
    }

    for (key, built) in &boxes {
        heights.insert(*key, built.height());
    }

    for placed in &rfc.placements {
        let Some(built) = boxes.get(&placed.key) else {
            continue;
        };
        let top = i64::from(area.y) + placed.final_top - rfc.scroll as i64;
        draw_sidebar_box(&model.theme, buffer, area, top, built);
    }
}

fn thread_box<'a>(
    model: &Model,
    rfc: &'a RfcView,
    line: u32,
    entries: &[&CommentEntry],
    width: usize,
) -> SidebarBox<'a> {
    let theme = &model.theme;
    let interaction = &rfc.interaction;
    let count = entries.len();
    let noun = if count == 1 { "comment" } else { "comments" };
    let title = format!("Line {line} · {count} {noun}");

    let reply_open = interaction.reply_line == Some(line);
    let focused = (model.focus == Focus::Reply && reply_open)
        || (model.focus == Focus::Document && rfc.cursor_line() == Some(line));
    let border = if focused {
        theme.border_focused
    } else {
        theme.markdown.thread_border
    };

    if interaction.is_collapsed(line) && !reply_open {
        return SidebarBox {
            title: format!("▸ {title}"),
            border,
            collapsed: true,
            lines: Vec::new(),
        };
    }

    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            lines.push(BoxLine::Blank);
        }
        let pending = entry.is_pending();
        lines.push(BoxLine::Header {
            text: entry_header(entry),
            pending,
        });
        for row in render_comment(entry.body(), width as u32) {
            lines.push(BoxLine::Body { row, pending });
        }
    }

    if reply_open {
        lines.push(BoxLine::Blank);
        lines.push(BoxLine::Label("Reply"));
        push_editor(
            &mut lines,
            &interaction.reply_text,
            model.focus == Focus::Reply,
        );
        lines.push(BoxLine::Hint(hint(
            rfc,
            SubmitTarget::Reply { line },
            model.focus == Focus::Reply,
        )));
    }

    SidebarBox {
        title,
        border,
        collapsed: false,
        lines,
    }
}

fn composer_box<'a>(model: &Model, rfc: &'a RfcView, line: u32) -> SidebarBox<'a> {
    let focused = model.focus == Focus::Composer;
    let border = if focused {
        model.theme.border_focused
    } else {
        model.theme.markdown.composer_border
    };
    let mut lines = Vec::new();
    push_editor(&mut lines, &rfc.interaction.composer_text, focused);
    lines.push(BoxLine::Hint(hint(
        rfc,
        SubmitTarget::Composer { line },
        focused,
    )));
    SidebarBox {
        title: composer_title(&rfc.interaction, line),
        border,
        collapsed: false,
        lines,
    }
}

fn composer_title(interaction: &InteractionState, line: u32) -> String {
    match &interaction.selected_quote {
        Some(quote) => {
            let rows = quote.lines().count();
            let noun = if rows == 1 { "line" } else { "lines" };
            format!("Quoting {rows} {noun} · line {line}")
        }
        None => format!("New comment · line {line}"),
    }
}

fn push_editor<'a>(lines: &mut Vec<BoxLine<'a>>, area: &'a TextArea, focused: bool) {
    let min = MIN_EDITOR_ROWS as usize;
    let visible = area.lines.len().clamp(min, min * 2);
    for row in area.scroll..area.scroll + visible {
        lines.push(BoxLine::Editor { area, row, focused });
    }
}

fn hint(rfc: &RfcView, target: SubmitTarget, focused: bool) -> &'static str {
    if rfc.interaction.is_submitting(target) {
        "Posting..."
    } else if focused {
        "Ctrl+S send · Esc cancel"
    } else {
        "Draft"
    }
}

fn draw_sidebar_box(
    theme: &Theme,
    buffer: &mut OptimizedBuffer,
    area: Rect,
    top: i64,
    built: &SidebarBox<'_>,
) {
    let visible = |row: i64| row >= i64::from(area.y) && row < i64::from(area.bottom());
    let border_style = Style::fg(built.border);
    let width = area.width as usize;

    if built.collapsed {
        if visible(top) {
            draw_text_truncated(
                buffer,
                area.x,
                top as u32,
                &built.title,
                area.width,
                Style::fg(theme.muted),
            );
        }
        return;
    }

    // Top border with title
    if visible(top) {
        let title = crate::text::truncate(&built.title, width.saturating_sub(6));
        let used = display_width(&title) + 5;
        let top_line = format!("╭─ {title} {}╮", "─".repeat(width.saturating_sub(used)));
        buffer.draw_text(area.x, top as u32, &top_line, border_style);
    }

    let inner_width = area.width - CHROME;
    for (i, line) in built.lines.iter().enumerate() {
        let row = top + 1 + i as i64;
        if !visible(row) {
            continue;
        }
        let y = row as u32;
        buffer.fill_rect(area.x + 1, y, area.width.saturating_sub(2), 1, theme.panel_bg);
        buffer.draw_text(area.x, y, "│", border_style);
        buffer.draw_text(area.x + area.width - 1, y, "│", border_style);
        draw_box_line(theme, buffer, area.x + 2, y, inner_width, line);
    }

    let bottom = top + 1 + built.lines.len() as i64;
    if visible(bottom) {
        let bottom_line = format!("╰{}╯", "─".repeat(width.saturating_sub(2)));
        buffer.draw_text(area.x, bottom as u32, &bottom_line, border_style);
    }
}

fn draw_box_line(
    theme: &Theme,
    buffer: &mut OptimizedBuffer,
    x: u32,
    y: u32,
    width: u32,
    line: &BoxLine<'_>,
) {
    let bg = theme.panel_bg;
    match line {
        BoxLine::Blank => {}
        BoxLine::Header { text, pending } => {
            let color = if *pending {
                theme.markdown.pending
            } else {
                theme.primary
            };
            draw_text_truncated(buffer, x, y, text, width, Style::fg(color).with_bg(bg));
        }
        BoxLine::Body { row, pending: true } => {
            let style = Style::fg(theme.markdown.pending).with_bg(bg);
            draw_text_truncated(buffer, x, y, &row.plain_text(), width, style);
        }
        BoxLine::Body { row, pending: false } => {
            draw_layout_row(theme, buffer, Rect::new(x, y, width, 1), y, row, Some(bg));
        }
        BoxLine::Label(text) => {
            buffer.draw_text(x, y, text, theme.style_muted_on(bg).with_bold());
        }
        BoxLine::Hint(text) => {
            draw_text_truncated(buffer, x, y, text, width, theme.style_muted_on(bg));
        }
        BoxLine::Editor { area, row, focused } => {
            let text_style = theme.style_foreground_on(bg);
            let Some(text) = area.lines.get(*row) else {
                return;
            };
            if *focused && *row == area.cursor_row {
                let cursor_style = Style::fg(bg).with_bg(theme.cursor);
                render_line_with_cursor(
                    buffer,
                    x,
                    y,
                    text,
                    area.cursor_col,
                    width,
                    text_style,
                    cursor_style,
                );
            } else {
                draw_text_truncated(buffer, x, y, text, width, text_style);
            }
        }
    }
}

/// Render a line of text with the cursor shown as an inverted-color block.
///
/// Lines wider than `max_width` scroll horizontally to keep the cursor in view.
#[allow(clippy::too_many_arguments)]
pub fn render_line_with_cursor(
    buffer: &mut OptimizedBuffer,
    x: u32,
    y: u32,
    line: &str,
    cursor_col: usize,
    max_width: u32,
    text_style: Style,
    cursor_style: Style,
) {
    if max_width == 0 {
        return;
    }
    let chars: Vec<char> = line.chars().collect();
    let offset = cursor_col.saturating_sub(max_width as usize - 1);
    let mut col = 0u32;

    for (i, &ch) in chars.iter().enumerate().skip(offset) {
        if col >= max_width {
            break;
        }
        let style = if i == cursor_col { cursor_style } else { text_style };
        buffer.draw_text(x + col, y, &ch.to_string(), style);
        col += 1;
    }

    // If cursor is at end of line, draw cursor block on the space after
    if cursor_col >= chars.len() && col < max_width {
        buffer.draw_text(x + col, y, " ", cursor_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composer_title_names_the_quote() {
        let mut state = InteractionState::default();
        assert!(state.open_composer(4));
        assert_eq!(composer_title(&state, 4), "New comment · line 4");
        assert!(state.open_composer_with_quote(6, "first\nsecond"));
        assert_eq!(composer_title(&state, 6), "Quoting 2 lines · line 6");
    }
}
