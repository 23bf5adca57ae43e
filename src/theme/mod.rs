//! Theme system for rfc-review-ui
//!
//! Themes are defined by 7 seed colors. All other colors are derived
//! automatically using lerp/blend-over. Individual derived colors can
//! be overridden for fine-tuning.

use std::path::Path;

use opentui::{Rgba, Style};
use palette::blend::Compose;
use palette::{FromColor, LinLuma, Mix, Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};

/// Markdown- and review-specific color tokens
#[derive(Debug, Clone)]
pub struct MarkdownTheme {
    pub heading: Rgba,
    pub link: Rgba,
    pub mention: Rgba,
    pub emphasis: Rgba,
    pub code_fg: Rgba,
    pub code_bg: Rgba,
    pub quote: Rgba,
    pub rule: Rgba,
    pub table_border: Rgba,
    pub list_marker: Rgba,

    /// Gutter line number text color
    pub gutter: Rgba,
    /// Gutter line number for lines that have comments
    pub gutter_commented: Rgba,
    /// Background for the row under the cursor
    pub cursor_line_bg: Rgba,
    /// Background for rows of the line the composer targets
    pub active_line_bg: Rgba,
    /// Background for rows in a visual selection
    pub visual_bg: Rgba,

    /// Border of existing comment threads
    pub thread_border: Rgba,
    /// Border of the composer box
    pub composer_border: Rgba,
    /// Text color for comments still being posted
    pub pending: Rgba,
}

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base colors
    pub background: Rgba,
    pub foreground: Rgba,

    // UI chrome
    pub border: Rgba,
    pub border_focused: Rgba,
    pub panel_bg: Rgba,

    // Selection/highlighting
    pub selection_bg: Rgba,
    pub selection_fg: Rgba,
    pub cursor: Rgba,

    // Semantic colors
    pub primary: Rgba,
    pub success: Rgba,
    pub warning: Rgba,
    pub error: Rgba,
    pub muted: Rgba,

    pub markdown: MarkdownTheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

// ---------------------------------------------------------------------------
// Style token methods
// ---------------------------------------------------------------------------

impl Theme {
    /// `Style::fg(self.muted)`
    #[must_use]
    pub const fn style_muted(&self) -> Style {
        Style::fg(self.muted)
    }

    /// `Style::fg(self.muted).with_bg(bg)`
    #[must_use]
    pub const fn style_muted_on(&self, bg: Rgba) -> Style {
        Style::fg(self.muted).with_bg(bg)
    }

    /// `Style::fg(self.foreground)`
    #[must_use]
    pub const fn style_foreground(&self) -> Style {
        Style::fg(self.foreground)
    }

    /// `Style::fg(self.foreground).with_bg(bg)`
    #[must_use]
    pub const fn style_foreground_on(&self, bg: Rgba) -> Style {
        Style::fg(self.foreground).with_bg(bg)
    }

    /// `Style::fg(self.primary)`
    #[must_use]
    pub const fn style_primary(&self) -> Style {
        Style::fg(self.primary)
    }

    /// `Style::fg(self.primary).with_bg(bg)`
    #[must_use]
    pub const fn style_primary_on(&self, bg: Rgba) -> Style {
        Style::fg(self.primary).with_bg(bg)
    }
}

impl MarkdownTheme {
    /// `Style::fg(self.gutter).with_bg(bg)`
    #[must_use]
    pub const fn style_gutter(&self, bg: Rgba) -> Style {
        Style::fg(self.gutter).with_bg(bg)
    }
}

// ---------------------------------------------------------------------------
// Color math
// ---------------------------------------------------------------------------

fn to_srgba(color: Rgba) -> Srgba {
    Srgba::new(color.r, color.g, color.b, color.a)
}

fn from_srgba(color: Srgba) -> Rgba {
    Rgba::new(color.red, color.green, color.blue, color.alpha)
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
#[must_use]
pub fn color_from_hex(hex: &str) -> Option<Rgba> {
    let hex = hex.trim().trim_start_matches('#');
    let (rgb, alpha) = if hex.len() == 8 && hex.is_ascii() {
        (&hex[..6], u8::from_str_radix(&hex[6..], 16).ok()?)
    } else {
        (hex, u8::MAX)
    };
    let color = rgb.parse::<Srgb<u8>>().ok()?.with_alpha(alpha);
    Some(from_srgba(color.into_format::<f32, f32>()))
}

#[must_use]
pub fn color_lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    from_srgba(to_srgba(a).mix(to_srgba(b), t.clamp(0.0, 1.0)))
}

#[must_use]
pub fn color_with_alpha(color: Rgba, alpha: f32) -> Rgba {
    from_srgba(Srgb::new(color.r, color.g, color.b).with_alpha(alpha.clamp(0.0, 1.0)))
}

/// Porter-Duff `top` over `bottom`.
#[must_use]
pub fn color_blend_over(top: Rgba, bottom: Rgba) -> Rgba {
    from_srgba(to_srgba(top).over(to_srgba(bottom)))
}

/// Relative luminance of the opaque color.
#[must_use]
pub fn color_luminance(color: Rgba) -> f32 {
    LinLuma::from_color(Srgb::new(color.r, color.g, color.b)).luma
}

// ---------------------------------------------------------------------------
// Seed-based theme construction
// ---------------------------------------------------------------------------

/// The 7 seed colors that define a theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSeeds {
    pub background: String,
    pub foreground: String,
    pub primary: String,
    pub muted: String,
    pub success: String,
    pub warning: String,
    pub error: String,
}

/// Optional overrides for any derived color.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOverrides {
    pub panel_bg: Option<String>,
    pub selection_bg: Option<String>,
    pub selection_fg: Option<String>,
    pub border: Option<String>,
    pub border_focused: Option<String>,
    pub cursor: Option<String>,
    // Markdown
    pub markdown_heading: Option<String>,
    pub markdown_link: Option<String>,
    pub markdown_mention: Option<String>,
    pub markdown_code_fg: Option<String>,
    pub markdown_code_bg: Option<String>,
    pub markdown_quote: Option<String>,
    pub markdown_gutter: Option<String>,
    pub markdown_gutter_commented: Option<String>,
    pub markdown_thread_border: Option<String>,
    pub markdown_composer_border: Option<String>,
}

impl Theme {
    /// Build a complete theme from 7 seed colors, deriving everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if any seed or override color string fails to parse.
    #[allow(clippy::similar_names)]
    pub fn from_seeds(
        name: String,
        seeds: &ThemeSeeds,
        overrides: Option<&ThemeOverrides>,
    ) -> anyhow::Result<Self> {
        let bg = parse_color(&seeds.background)?;
        let fg = parse_color(&seeds.foreground)?;
        let primary = parse_color(&seeds.primary)?;
        let muted = parse_color(&seeds.muted)?;
        let success = parse_color(&seeds.success)?;
        let warning = parse_color(&seeds.warning)?;
        let error = parse_color(&seeds.error)?;

        let is_dark = color_luminance(bg) < 0.5;

        // --- Derive UI chrome ---
        let mut panel_bg = color_lerp(bg, fg, 0.05);
        let mut selection_bg = color_blend_over(color_with_alpha(primary, 0.25), bg);
        let mut selection_fg = fg;
        let mut border = color_lerp(bg, fg, 0.15);
        let mut border_focused = primary;
        let mut cursor = fg;

        // --- Derive markdown colors ---
        let mut markdown = MarkdownTheme {
            heading: color_lerp(primary, fg, 0.2),
            link: primary,
            mention: color_lerp(primary, warning, 0.4),
            emphasis: color_lerp(fg, warning, 0.25),
            code_fg: color_lerp(success, fg, 0.3),
            code_bg: color_lerp(bg, fg, if is_dark { 0.06 } else { 0.04 }),
            quote: color_lerp(muted, fg, 0.3),
            rule: border,
            table_border: color_lerp(bg, fg, 0.25),
            list_marker: primary,
            gutter: muted,
            gutter_commented: primary,
            cursor_line_bg: color_blend_over(color_with_alpha(fg, 0.06), bg),
            active_line_bg: color_blend_over(color_with_alpha(primary, 0.12), bg),
            visual_bg: color_blend_over(color_with_alpha(warning, 0.15), bg),
            thread_border: color_lerp(bg, fg, 0.25),
            composer_border: primary,
            pending: muted,
        };

        // --- Apply overrides ---
        if let Some(ov) = overrides {
            apply_override(&mut panel_bg, ov.panel_bg.as_ref())?;
            apply_override(&mut selection_bg, ov.selection_bg.as_ref())?;
            apply_override(&mut selection_fg, ov.selection_fg.as_ref())?;
            apply_override(&mut border, ov.border.as_ref())?;
            apply_override(&mut border_focused, ov.border_focused.as_ref())?;
            apply_override(&mut cursor, ov.cursor.as_ref())?;

            apply_override(&mut markdown.heading, ov.markdown_heading.as_ref())?;
            apply_override(&mut markdown.link, ov.markdown_link.as_ref())?;
            apply_override(&mut markdown.mention, ov.markdown_mention.as_ref())?;
            apply_override(&mut markdown.code_fg, ov.markdown_code_fg.as_ref())?;
            apply_override(&mut markdown.code_bg, ov.markdown_code_bg.as_ref())?;
            apply_override(&mut markdown.quote, ov.markdown_quote.as_ref())?;
            apply_override(&mut markdown.gutter, ov.markdown_gutter.as_ref())?;
            apply_override(
                &mut markdown.gutter_commented,
                ov.markdown_gutter_commented.as_ref(),
            )?;
            apply_override(
                &mut markdown.thread_border,
                ov.markdown_thread_border.as_ref(),
            )?;
            apply_override(
                &mut markdown.composer_border,
                ov.markdown_composer_border.as_ref(),
            )?;
        }

        Ok(Self {
            name,
            background: bg,
            foreground: fg,
            border,
            border_focused,
            panel_bg,
            selection_bg,
            selection_fg,
            cursor,
            primary,
            success,
            warning,
            error,
            muted,
            markdown,
        })
    }

    /// Default dark theme (Tokyo Night inspired).
    ///
    /// # Panics
    ///
    /// Panics if the built-in dark theme seed colors are invalid.
    #[must_use]
    pub fn dark() -> Self {
        Self::from_seeds(
            "dark".to_string(),
            &ThemeSeeds {
                background: "#1a1b26".into(),
                foreground: "#c0caf5".into(),
                primary: "#7aa2f7".into(),
                muted: "#565f89".into(),
                success: "#9ece6a".into(),
                warning: "#e0af68".into(),
                error: "#f7768e".into(),
            },
            None,
        )
        .expect("built-in dark theme seeds are valid")
    }

    /// Light theme variant.
    ///
    /// # Panics
    ///
    /// Panics if the built-in light theme seed colors are invalid.
    #[must_use]
    pub fn light() -> Self {
        Self::from_seeds(
            "light".to_string(),
            &ThemeSeeds {
                background: "#d5d6db".into(),
                foreground: "#343b58".into(),
                primary: "#34548a".into(),
                muted: "#6a6f87".into(),
                success: "#485e30".into(),
                warning: "#8f5e15".into(),
                error: "#8c4351".into(),
            },
            None,
        )
        .expect("built-in light theme seeds are valid")
    }
}

// ---------------------------------------------------------------------------
// JSON theme file format
// ---------------------------------------------------------------------------

/// Seed-based theme file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSeedFile {
    pub name: String,
    #[serde(rename = "syntaxTheme")]
    pub syntax_theme: Option<String>,
    pub seeds: ThemeSeeds,
    #[serde(default)]
    pub overrides: Option<ThemeOverrides>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_color(hex: &str) -> anyhow::Result<Rgba> {
    color_from_hex(hex).ok_or_else(|| anyhow::anyhow!("Invalid hex color: {hex}"))
}

fn apply_override(target: &mut Rgba, source: Option<&String>) -> anyhow::Result<()> {
    if let Some(hex) = source {
        *target = parse_color(hex)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ThemeLoadResult {
    pub theme: Theme,
    pub syntax_theme: Option<String>,
}

const BUILTIN_THEMES: &[(&str, &str)] = &[
    (
        "default-dark",
        include_str!("../../themes/default-dark.json"),
    ),
    (
        "default-light",
        include_str!("../../themes/default-light.json"),
    ),
    ("github-dark", include_str!("../../themes/github-dark.json")),
    (
        "github-light",
        include_str!("../../themes/github-light.json"),
    ),
    ("nord", include_str!("../../themes/nord.json")),
    ("gruvbox", include_str!("../../themes/gruvbox.json")),
];

/// Load a theme from a JSON file on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains invalid theme JSON.
pub fn load_theme_from_path(path: &Path) -> anyhow::Result<ThemeLoadResult> {
    let json = std::fs::read_to_string(path)?;
    load_theme_from_str(&json)
}

/// Parse a seed-format theme from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or contains invalid color values.
pub fn load_theme_from_str(json: &str) -> anyhow::Result<ThemeLoadResult> {
    let seed_file: ThemeSeedFile = serde_json::from_str(json)?;
    let syntax_theme = seed_file.syntax_theme.clone();
    let theme = Theme::from_seeds(
        seed_file.name,
        &seed_file.seeds,
        seed_file.overrides.as_ref(),
    )?;
    Ok(ThemeLoadResult {
        theme,
        syntax_theme,
    })
}

#[must_use]
pub fn load_built_in_theme(name: &str) -> Option<ThemeLoadResult> {
    BUILTIN_THEMES
        .iter()
        .find(|(theme_name, _)| *theme_name == name)
        .and_then(|(_, json)| load_theme_from_str(json).ok())
}

#[must_use]
pub fn built_in_theme_names() -> Vec<&'static str> {
    BUILTIN_THEMES.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_built_in_themes_load() {
        for name in built_in_theme_names() {
            let loaded = load_built_in_theme(name);
            assert!(loaded.is_some(), "theme {name} failed to load");
        }
    }

    #[test]
    fn hex_parsing() {
        let c = color_from_hex("#ff0000").expect("valid");
        assert!((c.r - 1.0).abs() < f32::EPSILON);
        assert!(c.g.abs() < f32::EPSILON);
        assert!(color_from_hex("#12345").is_none());
        assert!(color_from_hex("zzzzzz").is_none());
        let translucent = color_from_hex("00000080").expect("valid");
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn overrides_take_precedence() {
        let loaded = load_built_in_theme("gruvbox").expect("gruvbox");
        let expected = color_from_hex("#fe8019").expect("valid");
        assert_eq!(loaded.theme.markdown.heading, expected);
        assert_eq!(loaded.syntax_theme.as_deref(), Some("base16-eighties.dark"));
    }

    #[test]
    fn bad_seed_is_an_error() {
        let json = r##"{"name":"x","seeds":{"background":"nope","foreground":"#fff","primary":"#fff","muted":"#fff","success":"#fff","warning":"#fff","error":"#fff"}}"##;
        assert!(load_theme_from_str(json).is_err());
    }

    #[test]
    fn color_math_matches_channel_arithmetic() {
        let black = Rgba::new(0.0, 0.0, 0.0, 1.0);
        let white = Rgba::new(1.0, 1.0, 1.0, 1.0);
        let mid = color_lerp(black, white, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6 && (mid.a - 1.0).abs() < 1e-6);
        assert!((color_lerp(black, white, 2.0).g - 1.0).abs() < 1e-6);

        let red = color_from_hex("#f00").expect("short hex");
        assert!((red.r - 1.0).abs() < 1e-6 && red.b.abs() < 1e-6);

        let tinted = color_with_alpha(red, 0.25);
        assert!((tinted.a - 0.25).abs() < 1e-6);
        let over = color_blend_over(tinted, black);
        assert!((over.r - 0.25).abs() < 1e-5);
        assert!((over.a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn luminance_separates_dark_and_light() {
        assert!(color_luminance(Theme::dark().background) < 0.5);
        assert!(color_luminance(Theme::light().background) > 0.5);
    }
}
