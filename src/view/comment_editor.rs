//! General comment editor overlay.
//!
//! Renders a modal over the detail screen:
//! - Dimmed background
//! - Centered panel with title, recent general comments, text area, and status bar

use opentui::{OptimizedBuffer, Style};

use super::sidebar::render_line_with_cursor;
use crate::editor::TextArea;
use crate::interaction::SubmitTarget;
use crate::model::{Focus, Model, RfcView};
use crate::theme::Theme;
use crate::view::components::{Rect, dim_rect, draw_text_truncated};

/// Minimum editor panel height (title + padding + 3 text lines + status).
const MIN_HEIGHT: u32 = 8;
/// Horizontal padding inside the panel.
const H_PAD: u32 = 2;
/// Most recent general comments shown above the text area.
const CONTEXT_COMMENTS: usize = 6;

pub fn view(model: &Model, buffer: &mut OptimizedBuffer) {
    if model.focus != Focus::GeneralComposer {
        return;
    }
    let Some(rfc) = &model.rfc else {
        return;
    };
    if !rfc.interaction.general_open {
        return;
    }

    let screen = Rect::from_size(model.width, model.height);
    dim_rect(buffer, screen, 0.35);

    let context = context_lines(rfc);
    let panel = compute_panel(screen, context.len());
    let theme = &model.theme;

    buffer.fill_rect(panel.x, panel.y, panel.width, panel.height, theme.panel_bg);

    let content_x = panel.x + H_PAD;
    let content_width = panel.width.saturating_sub(H_PAD * 2);

    // --- Title row ---
    let title = format!("General comment on #{}", rfc.key.number);
    draw_text_truncated(
        buffer,
        content_x,
        panel.y,
        &title,
        content_width.saturating_sub(4),
        Style::fg(theme.foreground).with_bg(theme.panel_bg).with_bold(),
    );
    let esc_x = panel.x + panel.width - H_PAD - 3;
    buffer.draw_text(esc_x, panel.y, "esc", theme.style_muted_on(theme.panel_bg));

    // --- Recent general comments (dimmed) ---
    let status_y = panel.y + panel.height - 2;
    let mut y = panel.y + 2;
    for text in &context {
        if y >= status_y.saturating_sub(3) {
            break;
        }
        draw_text_truncated(
            buffer,
            content_x,
            y,
            text,
            content_width,
            theme.style_muted_on(theme.panel_bg),
        );
        y += 1;
    }
    if !context.is_empty() {
        y += 1;
    }

    render_text_area(
        buffer,
        theme,
        &rfc.interaction.general_text,
        content_x,
        content_width,
        y,
        status_y,
    );

    // --- Status bar ---
    buffer.fill_rect(panel.x, status_y, panel.width, 1, theme.panel_bg);
    let status_text = if rfc.interaction.is_submitting(SubmitTarget::General) {
        "Posting..."
    } else {
        "Ctrl+S submit    Esc cancel"
    };
    let status_x = (panel.x + panel.width)
        .saturating_sub(H_PAD + status_text.chars().count() as u32)
        .max(content_x);
    buffer.draw_text(
        status_x,
        status_y,
        status_text,
        theme.style_muted_on(theme.panel_bg),
    );
}

fn context_lines(rfc: &RfcView) -> Vec<String> {
    let general = rfc.comments.general();
    let skip = general.len().saturating_sub(CONTEXT_COMMENTS);
    general
        .iter()
        .skip(skip)
        .map(|entry| {
            let body = entry.body().split_whitespace().collect::<Vec<_>>().join(" ");
            format!("{}: {body}", entry.author())
        })
        .collect()
}

fn compute_panel(screen: Rect, context_count: usize) -> Rect {
    let panel_width = (screen.width * 7 / 10)
        .clamp(40, 80)
        .min(screen.width.saturating_sub(4));
    let panel_x = (screen.width.saturating_sub(panel_width)) / 2;

    let context_rows = if context_count > 0 {
        context_count as u32 + 1
    } else {
        0
    };
    let text_area_height = 8u32;
    let ideal_height = 1 + 1 + context_rows + text_area_height + 1 + 1 + 1;
    let panel_height = ideal_height
        .min(screen.height.saturating_sub(4))
        .max(MIN_HEIGHT)
        .min(screen.height);
    let panel_y = (screen.height.saturating_sub(panel_height)) / 3;

    Rect::new(panel_x, panel_y, panel_width, panel_height)
}

fn render_text_area(
    buffer: &mut OptimizedBuffer,
    theme: &Theme,
    area: &TextArea,
    content_x: u32,
    content_width: u32,
    text_area_top: u32,
    status_y: u32,
) {
    let available_text_rows = status_y.saturating_sub(text_area_top + 1) as usize;
    let bar_style = theme.style_primary_on(theme.panel_bg);
    let text_style = theme.style_foreground_on(theme.panel_bg);
    let cursor_style = Style::fg(theme.panel_bg).with_bg(theme.foreground);

    // Draw left accent bar
    for row in 0..available_text_rows {
        buffer.draw_text(content_x, text_area_top + row as u32, "\u{2503}", bar_style);
    }

    let text_x = content_x + 2;
    let text_width = content_width.saturating_sub(2);

    for (view_row, line_idx) in (area.scroll..area.lines.len())
        .enumerate()
        .take(available_text_rows)
    {
        let line_y = text_area_top + view_row as u32;
        let line = &area.lines[line_idx];
        if line_idx == area.cursor_row {
            render_line_with_cursor(
                buffer,
                text_x,
                line_y,
                line,
                area.cursor_col,
                text_width,
                text_style,
                cursor_style,
            );
        } else {
            draw_text_truncated(buffer, text_x, line_y, line, text_width, text_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_fits_small_screens() {
        let panel = compute_panel(Rect::new(0, 0, 50, 12), 10);
        assert!(panel.x + panel.width <= 50);
        assert!(panel.y + panel.height <= 12);
        assert!(panel.height >= MIN_HEIGHT);
    }

    #[test]
    fn panel_grows_with_context() {
        let screen = Rect::new(0, 0, 120, 50);
        let bare = compute_panel(screen, 0);
        let busy = compute_panel(screen, 3);
        assert_eq!(busy.height, bare.height + 4);
        assert_eq!(bare.width, 80);
    }
}
