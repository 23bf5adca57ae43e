//! Message types for the Elm Architecture

use uuid::Uuid;

use crate::comments::Comment;
use crate::github::{RepoRef, RfcDetail, RfcKey, RfcSummary};
use crate::interaction::SubmitTarget;

/// Everything the RFC list needs from one load.
#[derive(Debug, Clone)]
pub struct RfcListing {
    pub user: String,
    pub repos: Vec<RepoRef>,
    pub rfcs: Vec<RfcSummary>,
}

/// All possible user actions and system events
#[derive(Debug, Clone)]
pub enum Message {
    // === Navigation ===
    /// Open the RFC selected in the list
    OpenSelected,
    /// Open a specific RFC (deep link)
    OpenRfc(RfcKey),
    /// Go back to previous screen
    Back,
    /// Quit application
    Quit,

    // === List Navigation ===
    /// Move selection up in list
    ListUp,
    /// Move selection down in list
    ListDown,
    /// Page up in list
    ListPageUp,
    /// Page down in list
    ListPageDown,
    /// Go to first item
    ListTop,
    /// Go to last item
    ListBottom,
    /// Next repository filter (all repos, then each repo)
    CycleRepo,
    /// Reload the RFC list
    Refresh,

    // === Document ===
    /// Move cursor up one row
    CursorUp,
    /// Move cursor down one row
    CursorDown,
    /// Move cursor to first row
    CursorTop,
    /// Move cursor to last row
    CursorBottom,
    /// Half page up (Ctrl+u)
    HalfPageUp,
    /// Half page down (Ctrl+d)
    HalfPageDown,
    PageUp,
    PageDown,
    /// Jump to the next line that has comments
    NextCommented,
    /// Jump to the previous line that has comments
    PrevCommented,
    /// Move the cursor to a source line
    JumpToLine(u32),
    /// Toggle visual line selection mode (Shift+V)
    VisualToggle,
    /// Open the composer on the cursor's line (quoting a visual selection)
    OpenComposer,
    /// Reply to the thread on the cursor's line
    OpenReply,
    /// Collapse or expand the thread on the cursor's line
    ToggleCollapse,
    /// Open the general (unanchored) comment composer
    OpenGeneralComposer,
    /// Re-fetch the comments of the open RFC
    Reload,
    /// Switch to the next built-in theme
    CycleTheme,

    // === Editor ===
    EditorInsert(char),
    EditorNewline,
    EditorBackspace,
    EditorLeft,
    EditorRight,
    EditorUp,
    EditorDown,
    EditorHome,
    EditorEnd,
    EditorWordLeft,
    EditorWordRight,
    EditorDeleteWord,
    EditorClearLine,
    /// Submit the focused composer
    Submit,
    /// Close the focused composer
    CancelEdit,

    // === Worker results ===
    RfcsLoaded(Result<RfcListing, String>),
    RfcLoaded {
        key: RfcKey,
        result: Result<RfcDetail, String>,
    },
    CommentsReloaded {
        key: RfcKey,
        generation: u64,
        result: Result<Vec<Comment>, String>,
    },
    /// The post succeeded; `reload` is the follow-up comment fetch.
    CommentPosted {
        key: RfcKey,
        local_id: Uuid,
        target: SubmitTarget,
        reload: Result<Vec<Comment>, String>,
    },
    CommentPostFailed {
        key: RfcKey,
        local_id: Uuid,
        target: SubmitTarget,
        error: String,
    },

    // === Terminal ===
    /// Terminal resized
    Resize { width: u16, height: u16 },
    /// No operation
    Noop,
}
