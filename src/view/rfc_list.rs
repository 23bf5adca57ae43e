//! RFC list screen rendering

use opentui::{OptimizedBuffer, Style};

use super::components::{
    HotkeyHint, Rect, draw_badge, draw_box, draw_help_bar, draw_text_truncated,
};
use crate::github::{RfcStatus, RfcSummary};
use crate::layout::HELP_BAR_HEIGHT;
use crate::model::{LoadState, Model};
use crate::text::display_width;

const HINTS: &[HotkeyHint] = &[
    HotkeyHint::new("Open", "Enter"),
    HotkeyHint::new("Repo", "Tab"),
    HotkeyHint::new("Refresh", "r"),
    HotkeyHint::new("Theme", "t"),
    HotkeyHint::new("Quit", "q"),
];

/// Render the RFC list screen
pub fn view(model: &Model, buffer: &mut OptimizedBuffer) {
    let theme = &model.theme;
    let screen = Rect::from_size(model.width, model.height);
    let (area, help_area) = screen.split_top(screen.height.saturating_sub(HELP_BAR_HEIGHT));

    draw_box(buffer, area, theme.border, Some("RFCs"), theme.foreground);
    let inner = area.inner();

    draw_filter_row(model, buffer, inner);
    let body = Rect::new(
        inner.x,
        inner.y + 2,
        inner.width,
        inner.height.saturating_sub(2),
    );

    let rfcs = model.filtered_rfcs();
    let placeholder = match &model.list_state {
        LoadState::Failed(error) if rfcs.is_empty() => {
            Some((format!("Failed to load RFCs: {error}"), theme.error))
        }
        LoadState::Idle | LoadState::Loading if rfcs.is_empty() => {
            Some(("Loading RFCs...".to_string(), theme.muted))
        }
        _ if rfcs.is_empty() => Some(("No RFCs found".to_string(), theme.muted)),
        _ => None,
    };

    if let Some((text, color)) = placeholder {
        draw_text_truncated(
            buffer,
            body.x + 2,
            body.y,
            &text,
            body.width.saturating_sub(4),
            Style::fg(color),
        );
    } else {
        draw_rows(model, buffer, body, &rfcs);
    }

    draw_help_bar(
        buffer,
        help_area,
        theme,
        HINTS,
        model.flash_message.as_deref(),
    );
}

fn draw_filter_row(model: &Model, buffer: &mut OptimizedBuffer, inner: Rect) {
    let theme = &model.theme;
    let repo = model
        .repo_filter
        .as_ref()
        .map_or_else(|| "all repositories".to_string(), ToString::to_string);
    let label = format!("Repo: {repo}");
    draw_text_truncated(
        buffer,
        inner.x + 1,
        inner.y,
        &label,
        inner.width.saturating_sub(2),
        theme.style_foreground(),
    );

    let mut right = String::new();
    if matches!(model.list_state, LoadState::Loading) && !model.rfcs.is_empty() {
        right.push_str("refreshing...  ");
    }
    if let Some(user) = &model.current_user {
        right.push('@');
        right.push_str(user);
    }
    let right_width = display_width(&right) as u32;
    let label_end = inner.x + 1 + display_width(&label) as u32;
    if right_width > 0 && label_end + 2 + right_width < inner.x + inner.width {
        buffer.draw_text(
            inner.x + inner.width - right_width - 1,
            inner.y,
            &right,
            theme.style_muted(),
        );
    }
}

const fn group_label(status: RfcStatus) -> &'static str {
    match status {
        RfcStatus::Open => "OPEN",
        RfcStatus::Merged | RfcStatus::Closed => "CLOSED",
    }
}

fn draw_rows(model: &Model, buffer: &mut OptimizedBuffer, body: Rect, rfcs: &[&RfcSummary]) {
    let theme = &model.theme;
    let mut y = body.y;
    let mut group: Option<&'static str> = None;

    for (idx, rfc) in rfcs.iter().enumerate().skip(model.list_scroll) {
        let label = group_label(rfc.status);
        if group != Some(label) {
            if group.is_some() {
                y += 1; // Spacing
            }
            if y >= body.bottom() {
                break;
            }
            buffer.draw_text(body.x + 1, y, label, Style::fg(theme.muted).with_bold());
            y += 1;
            group = Some(label);
        }
        if y >= body.bottom() {
            break;
        }
        draw_rfc_row(model, buffer, body, y, rfc, idx == model.list_index);
        y += 1;
    }
}

fn draw_rfc_row(
    model: &Model,
    buffer: &mut OptimizedBuffer,
    area: Rect,
    y: u32,
    rfc: &RfcSummary,
    selected: bool,
) {
    let theme = &model.theme;
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };

    // Selection indicator and background
    let (prefix, style) = if selected {
        ("▸ ", Style::fg(theme.selection_fg).with_bg(bg))
    } else {
        ("  ", Style::fg(theme.foreground))
    };
    if selected {
        buffer.fill_rect(area.x, y, area.width, 1, bg);
    }

    let right_edge = area.x + area.width;
    let mut x = area.x;
    buffer.draw_text(x, y, prefix, style);
    x += 2;

    // Review requested marker
    let marker = if rfc.review_requested { "● " } else { "  " };
    buffer.draw_text(x, y, marker, Style::fg(theme.warning).with_bg(bg));
    x += 2;

    let number = format!("#{:<5}", rfc.number);
    buffer.draw_text(x, y, &number, theme.style_primary_on(bg));
    x += display_width(&number) as u32 + 1;

    if rfc.status != RfcStatus::Open {
        let color = match rfc.status {
            RfcStatus::Merged => theme.success,
            RfcStatus::Closed | RfcStatus::Open => theme.muted,
        };
        x += draw_badge(buffer, x, y, rfc.status.label(), Style::fg(color).with_bg(bg)) + 1;
    }

    // Right-hand columns: repo, author, comments
    let comments = format!("{} comments", rfc.comment_count);
    let author = format!("@{}", rfc.author);
    let repo = rfc.repo.to_string();
    let tail_width = (display_width(&comments) + 14 + 18 + 3) as u32;

    let remaining = right_edge.saturating_sub(x);
    let title_width = remaining.saturating_sub(tail_width).max(10).min(remaining);
    draw_text_truncated(buffer, x, y, &rfc.title, title_width, style);
    x += title_width + 1;

    for (text, width) in [(&repo, 18u32), (&author, 14u32)] {
        if x + width >= right_edge {
            return;
        }
        draw_text_truncated(buffer, x, y, text, width, theme.style_muted_on(bg));
        x += width + 1;
    }

    if x + display_width(&comments) as u32 <= right_edge {
        let color = if rfc.inline_comment_count > 0 {
            theme.primary
        } else {
            theme.muted
        };
        buffer.draw_text(x, y, &comments, Style::fg(color).with_bg(bg));
    }
}
