//! RFC detail screen rendering

use std::collections::HashMap;

use opentui::{OptimizedBuffer, Rgba, Style};

use super::components::{
    HotkeyHint, Rect, draw_badge, draw_help_bar, draw_hline, draw_text_truncated,
};
use super::sidebar;
use crate::github::RfcStatus;
use crate::layout::{
    DETAIL_HEADER_HEIGHT, DOC_H_PAD, GUTTER_WIDTH, HELP_BAR_HEIGHT, sidebar_width,
};
use crate::markdown::{LayoutRow, RowKind, SpanRole};
use crate::model::{Focus, GeneralLine, GeneralLineKind, LoadState, Model, RfcView};
use crate::text::display_width;
use crate::theme::Theme;

const DOCUMENT_HINTS: &[HotkeyHint] = &[
    HotkeyHint::new("Comment", "c"),
    HotkeyHint::new("Reply", "r"),
    HotkeyHint::new("Collapse", "z"),
    HotkeyHint::new("General", "C"),
    HotkeyHint::new("Next", "n"),
    HotkeyHint::new("Select", "V"),
    HotkeyHint::new("Back", "q"),
];

const VISUAL_HINTS: &[HotkeyHint] = &[
    HotkeyHint::new("Quote", "c"),
    HotkeyHint::new("Cancel", "Esc"),
];

const EDITOR_HINTS: &[HotkeyHint] = &[
    HotkeyHint::new("Submit", "Ctrl+S"),
    HotkeyHint::new("Newline", "Enter"),
    HotkeyHint::new("Cancel", "Esc"),
];

const ERROR_HINTS: &[HotkeyHint] = &[HotkeyHint::new("Back", "q")];

/// Columns of the detail screen body.
#[derive(Debug, Clone, Copy)]
struct Columns {
    gutter: Rect,
    document: Rect,
    separator_x: u32,
    sidebar: Rect,
}

impl Columns {
    fn new(body: Rect, doc_width: u32) -> Self {
        let (gutter, rest) = body.split_left(GUTTER_WIDTH);
        let (_, rest) = rest.split_left(DOC_H_PAD);
        let (document, rest) = rest.split_left(doc_width);
        let (_, rest) = rest.split_left(DOC_H_PAD);
        let (separator, rest) = rest.split_left(1);
        let (sidebar, _) = rest.split_left(sidebar_width(body.width));
        Self {
            gutter,
            document,
            separator_x: separator.x,
            sidebar,
        }
    }
}

/// Render the RFC detail screen
pub fn view(model: &Model, buffer: &mut OptimizedBuffer) {
    let theme = &model.theme;
    let screen = Rect::from_size(model.width, model.height);
    let (header, rest) = screen.split_top(DETAIL_HEADER_HEIGHT);
    let (body, help_area) = rest.split_top(model.document_height() as u32);
    let help_area = Rect::new(help_area.x, help_area.y, help_area.width, HELP_BAR_HEIGHT);

    let Some(rfc) = &model.rfc else {
        draw_placeholder(model, buffer, header, body, help_area);
        return;
    };

    draw_header(model, buffer, header, rfc);

    let columns = Columns::new(body, rfc.layout_width);
    let mut mounted = model.mounted.borrow_mut();
    mounted.clear();
    mounted.container_top = i64::from(body.y);
    mounted.scroll_top = rfc.scroll as i64;
    for (line, row) in &rfc.layout.anchors {
        mounted
            .anchors
            .insert(*line, i64::from(body.y) + *row as i64 - rfc.scroll as i64);
    }

    draw_document(model, buffer, rfc, &columns);

    for row in body.y..body.bottom() {
        buffer.draw_text(columns.separator_x, row, "│", Style::fg(theme.border));
    }
    sidebar::view(model, buffer, rfc, columns.sidebar, &mut mounted.box_heights);

    let hints = match model.focus {
        Focus::Composer | Focus::Reply | Focus::GeneralComposer => EDITOR_HINTS,
        _ if rfc.visual_anchor.is_some() => VISUAL_HINTS,
        _ => DOCUMENT_HINTS,
    };
    draw_help_bar(
        buffer,
        help_area,
        theme,
        hints,
        model.flash_message.as_deref(),
    );
}

fn draw_placeholder(
    model: &Model,
    buffer: &mut OptimizedBuffer,
    header: Rect,
    body: Rect,
    help_area: Rect,
) {
    let theme = &model.theme;
    let key = model
        .active_key
        .as_ref()
        .map_or_else(String::new, ToString::to_string);
    draw_text_truncated(
        buffer,
        header.x + 2,
        header.y,
        &key,
        header.width.saturating_sub(4),
        Style::fg(theme.foreground).with_bold(),
    );
    draw_hline(
        buffer,
        header.x,
        header.y + header.height.saturating_sub(1),
        header.width,
        theme.border,
    );

    let (text, color) = match &model.detail_state {
        LoadState::Failed(error) => (format!("Failed to load RFC: {error}"), theme.error),
        _ => ("Loading RFC...".to_string(), theme.muted),
    };
    draw_text_truncated(
        buffer,
        body.x + 2,
        body.y + 1,
        &text,
        body.width.saturating_sub(4),
        Style::fg(color),
    );
    draw_help_bar(
        buffer,
        help_area,
        theme,
        ERROR_HINTS,
        model.flash_message.as_deref(),
    );
}

fn draw_header(model: &Model, buffer: &mut OptimizedBuffer, area: Rect, rfc: &RfcView) {
    let theme = &model.theme;
    let summary = &rfc.detail.summary;
    let x = area.x + 2;
    let width = area.width.saturating_sub(4);

    // Title row with status badge on the right
    let status = summary.status.label();
    let badge_width = display_width(status) as u32 + 2;
    let status_color = match summary.status {
        RfcStatus::Open => theme.success,
        RfcStatus::Merged => theme.primary,
        RfcStatus::Closed => theme.error,
    };
    let title = format!("#{} {}", summary.number, summary.title);
    draw_text_truncated(
        buffer,
        x,
        area.y,
        &title,
        width.saturating_sub(badge_width + 1),
        Style::fg(theme.foreground).with_bold(),
    );
    if width > badge_width {
        draw_badge(
            buffer,
            x + width - badge_width,
            area.y,
            status,
            Style::fg(status_color).with_bold(),
        );
    }

    // Author, repository, file
    let mut meta = format!(
        "@{} · {} · opened {}",
        summary.author,
        summary.repo,
        summary.created_at.format("%Y-%m-%d")
    );
    if let Some(path) = &rfc.detail.markdown_file_path {
        meta.push_str(" · ");
        meta.push_str(path);
    }
    let pending = rfc.comments.pending_count();
    if pending > 0 {
        meta = format!("{meta} · {pending} posting");
    }
    draw_text_truncated(buffer, x, area.y + 1, &meta, width, theme.style_muted());

    // Reviewers
    let reviewers = if rfc.detail.reviewers.is_empty() {
        "Reviewers: none".to_string()
    } else {
        let names: Vec<String> = rfc
            .detail
            .reviewers
            .iter()
            .map(|r| {
                if r.yet_to_review {
                    format!("{} (pending)", r.login)
                } else {
                    format!("{} ✓", r.login)
                }
            })
            .collect();
        format!("Reviewers: {}", names.join(", "))
    };
    let link = if model.focus == Focus::Document {
        rfc.cursor_link().unwrap_or_default()
    } else {
        String::new()
    };
    let link_width = display_width(&link) as u32;
    draw_text_truncated(
        buffer,
        x,
        area.y + 2,
        &reviewers,
        width.saturating_sub(link_width + 1),
        theme.style_muted(),
    );
    if link_width > 0 && width > link_width {
        buffer.draw_text(x + width - link_width, area.y + 2, &link, Style::fg(theme.primary));
    }

    draw_hline(
        buffer,
        area.x,
        area.y + area.height.saturating_sub(1),
        area.width,
        theme.border,
    );
}

/// Background for a content row, by cursor, selection and open boxes.
fn row_background(model: &Model, rfc: &RfcView, row: usize) -> Option<Rgba> {
    let theme = &model.theme.markdown;
    let in_document = matches!(model.focus, Focus::Document);
    if row == rfc.cursor_row && in_document {
        return Some(theme.cursor_line_bg);
    }
    if let Some((start, end)) = rfc.selection() {
        if (start..=end).contains(&row) {
            return Some(theme.visual_bg);
        }
    }
    let line = rfc.layout.row_line(row)?;
    let interaction = &rfc.interaction;
    let active = interaction.composer_line() == Some(line) || interaction.reply_line == Some(line);
    active.then_some(theme.active_line_bg)
}

fn draw_document(model: &Model, buffer: &mut OptimizedBuffer, rfc: &RfcView, columns: &Columns) {
    let theme = &model.theme;
    let height = columns.document.height as usize;
    let first = rfc.scroll;
    let last = first + height;

    // First row of each visible line, for gutter numbers
    let mut line_starts: HashMap<usize, u32> = HashMap::new();
    for (line, row) in &rfc.layout.anchors {
        if (first..last).contains(row) {
            line_starts.entry(*row).or_insert(*line);
        }
    }
    let commented: Vec<u32> = rfc.comments.commented_lines();
    let general = rfc.general_lines();

    for (screen_row, row) in (first..last).enumerate() {
        let y = columns.document.y + screen_row as u32;
        let bg = row_background(model, rfc, row);
        let row_bg = bg.unwrap_or(theme.background);

        buffer.fill_rect(
            columns.gutter.x,
            y,
            columns.separator_x.saturating_sub(columns.gutter.x),
            1,
            row_bg,
        );

        if let Some(layout_row) = rfc.layout.rows.get(row) {
            if let Some(line) = line_starts.get(&row) {
                draw_gutter(model, buffer, rfc, columns.gutter.x, y, *line, &commented, row_bg);
            }
            draw_layout_row(theme, buffer, columns.document, y, layout_row, bg);
        } else if let Some(line) = general.get(row - rfc.doc_rows()) {
            draw_general_line(theme, buffer, columns.document, y, line, row_bg);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_gutter(
    model: &Model,
    buffer: &mut OptimizedBuffer,
    rfc: &RfcView,
    x: u32,
    y: u32,
    line: u32,
    commented: &[u32],
    bg: Rgba,
) {
    if !rfc.document.is_commentable(line) || rfc.line_offsets.get(line).is_none() {
        return;
    }
    let md = &model.theme.markdown;
    let (style, marker) = if commented.contains(&line) {
        (Style::fg(md.gutter_commented).with_bg(bg), "●")
    } else {
        (md.style_gutter(bg), " ")
    };
    buffer.draw_text(x, y, &format!("{line:>4}"), style);
    buffer.draw_text(x + 4, y, marker, style);
}

pub(super) fn span_style(theme: &Theme, role: SpanRole, highlight: Option<Rgba>, bg: Rgba) -> Style {
    let md = &theme.markdown;
    match role {
        SpanRole::Text => Style::fg(theme.foreground).with_bg(bg),
        SpanRole::Heading | SpanRole::HeadingMarker => Style::fg(md.heading).with_bg(bg).with_bold(),
        SpanRole::Strong | SpanRole::TableHeader => Style::fg(theme.foreground).with_bg(bg).with_bold(),
        SpanRole::Emphasis => Style::fg(md.emphasis).with_bg(bg),
        SpanRole::Strike | SpanRole::Html | SpanRole::Muted => Style::fg(theme.muted).with_bg(bg),
        SpanRole::Link => Style::fg(md.link).with_bg(bg),
        SpanRole::Mention => Style::fg(md.mention).with_bg(bg).with_bold(),
        SpanRole::InlineCode => Style::fg(md.code_fg).with_bg(md.code_bg),
        SpanRole::Code => Style::fg(highlight.unwrap_or(md.code_fg)).with_bg(bg),
        SpanRole::CodeLabel => Style::fg(theme.muted).with_bg(bg),
        SpanRole::QuoteBar => Style::fg(md.quote).with_bg(bg),
        SpanRole::ListMarker => Style::fg(md.list_marker).with_bg(bg),
        SpanRole::TableBorder => Style::fg(md.table_border).with_bg(bg),
        SpanRole::Rule => Style::fg(md.rule).with_bg(bg),
    }
}

pub(super) fn draw_layout_row(
    theme: &Theme,
    buffer: &mut OptimizedBuffer,
    area: Rect,
    y: u32,
    row: &LayoutRow,
    highlight_bg: Option<Rgba>,
) {
    let base_bg = highlight_bg.unwrap_or(theme.background);
    let code_bg = highlight_bg.unwrap_or(theme.markdown.code_bg);
    if row.kind == RowKind::Code {
        buffer.fill_rect(area.x, y, area.width, 1, code_bg);
    }

    let mut x = area.x;
    let right = area.x + area.width;
    for (idx, span) in row.spans.iter().enumerate() {
        if x >= right {
            break;
        }
        let in_code = row.kind == RowKind::Code && idx >= row.content_start;
        let bg = if in_code { code_bg } else { base_bg };
        let style = span_style(theme, span.role, span.highlight, bg);
        let room = (right - x) as usize;
        let width = display_width(&span.text);
        if width <= room {
            buffer.draw_text(x, y, &span.text, style);
            x += width as u32;
        } else {
            let clipped: String = span.text.chars().take(room).collect();
            buffer.draw_text(x, y, &clipped, style);
            x = right;
        }
    }
}

fn draw_general_line(
    theme: &Theme,
    buffer: &mut OptimizedBuffer,
    area: Rect,
    y: u32,
    line: &GeneralLine,
    bg: Rgba,
) {
    if let (Some(row), false) = (&line.row, line.pending) {
        let body = Rect::new(area.x + 2, area.y, area.width.saturating_sub(2), area.height);
        draw_layout_row(theme, buffer, body, y, row, Some(bg));
        return;
    }
    let style = match (line.kind, line.pending) {
        (GeneralLineKind::Blank, _) => return,
        (GeneralLineKind::Heading, _) => Style::fg(theme.markdown.heading).with_bg(bg).with_bold(),
        (_, true) => Style::fg(theme.markdown.pending).with_bg(bg),
        (GeneralLineKind::Author, false) => Style::fg(theme.primary).with_bg(bg),
        (GeneralLineKind::Body, false) => theme.style_foreground_on(bg),
    };
    draw_text_truncated(buffer, area.x, y, &line.text, area.width, style);
}
