//! Per-line classification of the raw markdown source.
//!
//! This is a gutter heuristic only: it decides which line numbers get a
//! comment affordance. It does not need to agree with the markdown parser.

/// How a single source line is treated by the gutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// A normal line; gets a gutter number.
    Content,
    /// Blank line outside any fenced block; no gutter number.
    BlankElided,
    /// Line strictly between an opening fence and its close.
    CodeInterior,
}

impl LineClass {
    /// Whether the gutter shows a number (and comment affordance) for this line.
    #[must_use]
    pub const fn is_commentable(self) -> bool {
        !matches!(self, Self::BlankElided)
    }
}

/// Classify every line of `lines`. Index `i` of the result is line `i + 1`.
///
/// Fence detection is a nesting-free toggle on lines whose trimmed text
/// starts with three backticks or three tildes. Interior lines are only
/// recorded once the closing fence is seen, so an unclosed fence leaves its
/// trailing lines classified by their own content.
#[must_use]
pub fn classify(lines: &[String]) -> Vec<LineClass> {
    let mut classes = Vec::with_capacity(lines.len());
    let mut open_fence: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        let is_fence = trimmed.starts_with("```") || trimmed.starts_with("~~~");

        if is_fence {
            if let Some(start) = open_fence.take() {
                for class in &mut classes[start + 1..idx] {
                    *class = LineClass::CodeInterior;
                }
            } else {
                open_fence = Some(idx);
            }
        }

        let class = if trimmed.is_empty() {
            LineClass::BlankElided
        } else {
            LineClass::Content
        };
        classes.push(class);
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(String::from).collect()
    }

    #[test]
    fn blank_lines_outside_fences_are_elided() {
        let classes = classify(&lines("# Title\n\nBody"));
        assert_eq!(
            classes,
            vec![LineClass::Content, LineClass::BlankElided, LineClass::Content]
        );
    }

    #[test]
    fn fence_interior_keeps_blank_lines() {
        let classes = classify(&lines("```\na\n\nb\n```\n\nafter"));
        assert_eq!(classes[0], LineClass::Content);
        assert_eq!(classes[1], LineClass::CodeInterior);
        assert_eq!(classes[2], LineClass::CodeInterior);
        assert_eq!(classes[3], LineClass::CodeInterior);
        assert_eq!(classes[4], LineClass::Content);
        assert_eq!(classes[5], LineClass::BlankElided);
        assert_eq!(classes[6], LineClass::Content);
    }

    #[test]
    fn blank_inside_fence_is_code_and_line_after_is_content() {
        let input = lines("a\n```\n\nb\n```\nc");
        let classes = classify(&input);
        assert_eq!(classes[2], LineClass::CodeInterior);
        assert_eq!(classes[5], LineClass::Content);
        assert_eq!(classify(&input), classes);
    }

    #[test]
    fn tilde_fences_toggle_too() {
        let classes = classify(&lines("~~~rust\nfn x() {}\n~~~"));
        assert_eq!(
            classes,
            vec![
                LineClass::Content,
                LineClass::CodeInterior,
                LineClass::Content
            ]
        );
    }

    #[test]
    fn unclosed_fence_does_not_mark_trailing_lines() {
        let classes = classify(&lines("```\ncode\n\nmore"));
        assert_eq!(classes[1], LineClass::Content);
        assert_eq!(classes[2], LineClass::BlankElided);
        assert_eq!(classes[3], LineClass::Content);
    }

    #[test]
    fn indented_fence_is_detected_after_trim() {
        let classes = classify(&lines("  ```\n  x\n  ```"));
        assert_eq!(classes[1], LineClass::CodeInterior);
    }

    #[test]
    fn commentable_excludes_only_elided() {
        assert!(LineClass::Content.is_commentable());
        assert!(LineClass::CodeInterior.is_commentable());
        assert!(!LineClass::BlankElided.is_commentable());
    }
}
