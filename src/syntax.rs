//! Syntax highlighting module using syntect
//!
//! Highlights the bodies of fenced code blocks, picking the syntax from the
//! fence's language token (`rust`, `ts`, `yaml`, ...).

use opentui::Rgba;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Theme as SyntectTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Highlighted text span with color information
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSpan {
    pub text: String,
    pub fg: Rgba,
}

/// Syntax highlighter with loaded syntaxes and theme
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: SyntectTheme,
}

impl Highlighter {
    /// Create a new highlighter with the default theme.
    #[must_use]
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Create a highlighter with a specific syntect theme name, falling back
    /// to the default theme when the name is unknown.
    #[must_use]
    pub fn with_theme(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();

        let theme = theme_set
            .themes
            .remove(theme_name)
            .or_else(|| theme_set.themes.remove(DEFAULT_THEME))
            .unwrap_or_default();

        Self { syntax_set, theme }
    }

    /// Find a syntax for a fence language token.
    fn syntax_for_language(&self, lang: &str) -> Option<&SyntaxReference> {
        let token = lang.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }
        let alias = match token.as_str() {
            "ts" | "typescript" | "tsx" => "js",
            "sh" | "shell" | "zsh" | "console" => "bash",
            "yml" => "yaml",
            "py" => "python",
            "rs" => "rust",
            "jsonc" => "json",
            other => other,
        };
        self.syntax_set
            .find_syntax_by_token(alias)
            .or_else(|| self.syntax_set.find_syntax_by_extension(alias))
    }

    /// Create a stateful highlighter for one code block.
    ///
    /// Returns `None` when the language is missing or unknown; callers render
    /// the block in the plain code color.
    #[must_use]
    pub fn for_language(&self, lang: &str) -> Option<CodeHighlighter<'_>> {
        let syntax = self.syntax_for_language(lang)?;
        Some(CodeHighlighter {
            highlighter: HighlightLines::new(syntax, &self.theme),
            syntax_set: &self.syntax_set,
        })
    }

}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateful highlighter for a single code block
///
/// Keeps parse state across lines so multi-line strings and comments
/// are colored correctly.
pub struct CodeHighlighter<'a> {
    highlighter: HighlightLines<'a>,
    syntax_set: &'a SyntaxSet,
}

impl CodeHighlighter<'_> {
    /// Highlight the next line (without its trailing newline).
    pub fn highlight_line(&mut self, line: &str) -> Vec<HighlightSpan> {
        let with_newline = format!("{line}\n");
        self.highlighter
            .highlight_line(&with_newline, self.syntax_set)
            .map_or_else(
                |_| {
                    vec![HighlightSpan {
                        text: line.to_string(),
                        fg: Rgba::WHITE,
                    }]
                },
                |ranges| {
                    ranges
                        .into_iter()
                        .map(|(style, text)| HighlightSpan {
                            text: text.trim_end_matches('\n').to_string(),
                            fg: syntect_color_to_rgba(style.foreground),
                        })
                        .filter(|span| !span.text.is_empty())
                        .collect()
                },
            )
    }
}

/// Convert syntect `Color` to `Rgba`.
fn syntect_color_to_rgba(color: Color) -> Rgba {
    Rgba::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        f32::from(color.a) / 255.0,
    )
}
