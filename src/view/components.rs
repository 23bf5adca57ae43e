//! Reusable UI components

use opentui::buffer::BoxStyle;
use opentui::{OptimizedBuffer, Rgba, Style};

use crate::text::{display_width, truncate};
use crate::theme::Theme;

/// A rectangular area for layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from terminal dimensions
    #[must_use]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width as u32, height as u32)
    }

    /// Inner area after removing border (1 cell on each side)
    #[must_use]
    pub const fn inner(&self) -> Self {
        Self {
            x: self.x + 1,
            y: self.y + 1,
            width: self.width.saturating_sub(2),
            height: self.height.saturating_sub(2),
        }
    }

    /// Split horizontally at a given width from left
    #[must_use]
    pub const fn split_left(&self, width: u32) -> (Self, Self) {
        let width = if width > self.width { self.width } else { width };
        let left = Self {
            x: self.x,
            y: self.y,
            width,
            height: self.height,
        };
        let right = Self {
            x: self.x + width,
            y: self.y,
            width: self.width - width,
            height: self.height,
        };
        (left, right)
    }

    /// Split vertically at a given height from top
    #[must_use]
    pub const fn split_top(&self, height: u32) -> (Self, Self) {
        let height = if height > self.height { self.height } else { height };
        let top = Self {
            x: self.x,
            y: self.y,
            width: self.width,
            height,
        };
        let bottom = Self {
            x: self.x,
            y: self.y + height,
            width: self.width,
            height: self.height - height,
        };
        (top, bottom)
    }

    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Draw a bordered box with optional title
pub fn draw_box(
    buffer: &mut OptimizedBuffer,
    area: Rect,
    border_color: Rgba,
    title: Option<&str>,
    title_color: Rgba,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    buffer.draw_box(
        area.x,
        area.y,
        area.width,
        area.height,
        BoxStyle::rounded(Style::fg(border_color)),
    );

    if let Some(title) = title {
        let title_str = format!(" {title} ");
        draw_text_truncated(
            buffer,
            area.x + 2,
            area.y,
            &title_str,
            area.width.saturating_sub(4),
            Style::fg(title_color).with_bold(),
        );
    }
}

/// Draw text, truncating with an ellipsis if necessary
pub fn draw_text_truncated(
    buffer: &mut OptimizedBuffer,
    x: u32,
    y: u32,
    text: &str,
    max_width: u32,
    style: Style,
) {
    if max_width == 0 {
        return;
    }
    if display_width(text) <= max_width as usize {
        buffer.draw_text(x, y, text, style);
    } else {
        buffer.draw_text(x, y, &truncate(text, max_width as usize), style);
    }
}

/// Draw a horizontal line
pub fn draw_hline(buffer: &mut OptimizedBuffer, x: u32, y: u32, width: u32, color: Rgba) {
    let line = "─".repeat(width as usize);
    buffer.draw_text(x, y, &line, Style::fg(color));
}

/// Draw a status badge (e.g., "[open]", "[merged]"); returns its width.
pub fn draw_badge(buffer: &mut OptimizedBuffer, x: u32, y: u32, text: &str, style: Style) -> u32 {
    let badge = format!("[{text}]");
    buffer.draw_text(x, y, &badge, style);
    display_width(&badge) as u32
}

/// Dim the cells in `area` by scaling both fg and bg colors.
pub fn dim_rect(buffer: &mut OptimizedBuffer, area: Rect, scale: f32) {
    for row in area.y..area.y + area.height {
        for col in area.x..area.x + area.width {
            if let Some(cell) = buffer.get_mut(col, row) {
                cell.fg = Rgba::new(
                    cell.fg.r * scale,
                    cell.fg.g * scale,
                    cell.fg.b * scale,
                    cell.fg.a,
                );
                cell.bg = Rgba::new(
                    cell.bg.r * scale,
                    cell.bg.g * scale,
                    cell.bg.b * scale,
                    cell.bg.a,
                );
            }
        }
    }
}

/// A label + key hint for the help bar.
pub struct HotkeyHint {
    pub label: &'static str,
    pub key: &'static str,
}

impl HotkeyHint {
    #[must_use]
    pub const fn new(label: &'static str, key: &'static str) -> Self {
        Self { label, key }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        display_width(self.label) + 1 + display_width(self.key)
    }
}

/// Draw a right-aligned help bar of `[label key]` pairs within `area`.
///
/// The bar is drawn on the second-to-last row of `area`. The last row
/// is filled with `theme.background` as a bottom margin. A flash message,
/// when present, takes the left side of the bar.
pub fn draw_help_bar(
    buffer: &mut OptimizedBuffer,
    area: Rect,
    theme: &Theme,
    hints: &[HotkeyHint],
    flash: Option<&str>,
) {
    let y = area.y + area.height.saturating_sub(2);
    let bottom_y = area.y + area.height.saturating_sub(1);
    buffer.fill_rect(area.x, bottom_y, area.width, 1, theme.background);
    buffer.fill_rect(area.x, y, area.width, 1, theme.background);

    if area.width == 0 {
        return;
    }

    let padding: u32 = 2;
    let separator = "  ";
    let sep_len = separator.len();
    let total_width: usize = hints.iter().map(HotkeyHint::width).sum::<usize>()
        + hints.len().saturating_sub(1) * sep_len;

    let x_start = if (total_width as u32) + padding <= area.width {
        area.x + area.width - total_width as u32 - padding
    } else {
        area.x + padding.min(area.width)
    };

    if let Some(flash) = flash {
        let room = x_start.saturating_sub(area.x + padding + 2);
        let room = if hints.is_empty() {
            area.width.saturating_sub(padding * 2)
        } else {
            room
        };
        draw_text_truncated(
            buffer,
            area.x + padding,
            y,
            flash,
            room,
            Style::fg(theme.warning),
        );
    }

    let dim = theme.style_muted();
    let bright = theme.style_foreground();

    let mut x = x_start;
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            buffer.draw_text(x, y, separator, dim);
            x += sep_len as u32;
        }
        buffer.draw_text(x, y, hint.label, dim);
        x += display_width(hint.label) as u32;
        buffer.draw_text(x, y, " ", dim);
        x += 1;
        buffer.draw_text(x, y, hint.key, bright);
        x += display_width(hint.key) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_clamp_to_the_area() {
        let area = Rect::new(2, 3, 10, 4);
        let (left, right) = area.split_left(4);
        assert_eq!(left, Rect::new(2, 3, 4, 4));
        assert_eq!(right, Rect::new(6, 3, 6, 4));
        let (top, bottom) = area.split_top(9);
        assert_eq!(top.height, 4);
        assert_eq!(bottom.height, 0);
        assert_eq!(area.inner(), Rect::new(3, 4, 8, 2));
    }

    #[test]
    fn hint_width_counts_label_and_key() {
        assert_eq!(HotkeyHint::new("Quit", "q").width(), 6);
    }
}
