//! rfc-review-ui - terminal review of RFC pull requests with inline comments
//!
//! Uses Elm Architecture (Model/Message/Update/View) with `opentui_rust` rendering.
//! Network work runs on background threads (see [`worker`]) and reports back
//! through messages.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]

pub mod comments;
pub mod config;
pub mod editor;
pub mod github;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod markdown;
pub mod message;
pub mod model;
pub mod packer;
pub mod position;
pub mod syntax;
pub mod telemetry;
pub mod text;
pub mod theme;
pub mod update;
pub mod view;
pub mod worker;

pub use message::Message;
pub use model::{Focus, Model, Screen};
pub use syntax::{HighlightSpan, Highlighter};
pub use theme::Theme;
pub use update::update;
pub use view::view;
pub use worker::Worker;
