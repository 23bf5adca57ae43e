//! State update logic (Elm Architecture)

use log::{debug, info, warn};

use crate::comments::{CommentEntry, PendingComment};
use crate::editor::TextArea;
use crate::interaction::SubmitTarget;
use crate::layout::{BOX_GAP, MIN_EDITOR_ROWS};
use crate::markdown::anchor_id;
use crate::message::{Message, RfcListing};
use crate::model::{Effect, Focus, LoadState, Model, RfcView, Screen};
use crate::packer::{build_boxes, pack};
use crate::position::resolve_line_offsets;
use crate::{config, theme, Highlighter};

pub fn update(model: &mut Model, msg: Message) {
    if is_user_action(&msg) {
        model.flash_message = None;
    }

    match msg {
        // === Navigation ===
        Message::OpenSelected => {
            if let Some(key) = model.selected_rfc().map(crate::github::RfcSummary::key) {
                open_rfc(model, key);
            }
        }

        Message::OpenRfc(key) => open_rfc(model, key),

        Message::Back => match model.screen {
            Screen::RfcDetail => {
                model.screen = Screen::RfcList;
                model.focus = Focus::RfcList;
                model.rfc = None;
                model.active_key = None;
                model.detail_state = LoadState::Idle;
                model.mounted.borrow_mut().clear();
                model.needs_redraw = true;
            }
            Screen::RfcList => {}
        },

        Message::Quit => {
            model.should_quit = true;
        }

        // === List Navigation ===
        Message::ListUp => {
            if model.list_index > 0 {
                model.list_index -= 1;
                if model.list_index < model.list_scroll {
                    model.list_scroll = model.list_index;
                }
            }
            model.needs_redraw = true;
        }

        Message::ListDown => {
            let count = model.filtered_rfcs().len();
            if count > 0 && model.list_index < count - 1 {
                model.list_index += 1;
                let visible = model.list_visible_height().max(1);
                if model.list_index >= model.list_scroll + visible {
                    model.list_scroll = model.list_index - visible + 1;
                }
            }
            model.needs_redraw = true;
        }

        Message::ListPageUp => {
            let visible = model.list_visible_height();
            model.list_index = model.list_index.saturating_sub(visible);
            model.list_scroll = model.list_scroll.saturating_sub(visible);
            model.needs_redraw = true;
        }

        Message::ListPageDown => {
            let count = model.filtered_rfcs().len();
            let visible = model.list_visible_height();
            let max_index = count.saturating_sub(1);
            let max_scroll = count.saturating_sub(visible);

            model.list_index = (model.list_index + visible).min(max_index);
            model.list_scroll = (model.list_scroll + visible).min(max_scroll);
            model.needs_redraw = true;
        }

        Message::ListTop => {
            model.list_index = 0;
            model.list_scroll = 0;
            model.needs_redraw = true;
        }

        Message::ListBottom => {
            let count = model.filtered_rfcs().len();
            if count > 0 {
                model.list_index = count - 1;
                let visible = model.list_visible_height();
                model.list_scroll = count.saturating_sub(visible);
            }
            model.needs_redraw = true;
        }

        Message::CycleRepo => {
            model.repo_filter = next_repo(model);
            model.list_index = 0;
            model.list_scroll = 0;
            model.config.last_repo = model.repo_filter.as_ref().map(ToString::to_string);
            persist_config(model);
            model.needs_redraw = true;
        }

        Message::Refresh => {
            model.list_state = LoadState::Loading;
            model.effects.push(Effect::LoadRfcs);
            model.needs_redraw = true;
        }

        // === Document ===
        Message::CursorUp => move_cursor(model, -1),
        Message::CursorDown => move_cursor(model, 1),
        Message::HalfPageUp => move_cursor(model, -half_page(model)),
        Message::HalfPageDown => move_cursor(model, half_page(model)),
        Message::PageUp => move_cursor(model, -page(model)),
        Message::PageDown => move_cursor(model, page(model)),

        Message::CursorTop => {
            let visible = model.document_height();
            if let Some(view) = model.rfc.as_mut() {
                view.set_cursor(0, visible);
                model.needs_redraw = true;
            }
        }

        Message::CursorBottom => {
            let visible = model.document_height();
            if let Some(view) = model.rfc.as_mut() {
                view.set_cursor(usize::MAX, visible);
                model.needs_redraw = true;
            }
        }

        Message::NextCommented => jump_commented(model, true),
        Message::PrevCommented => jump_commented(model, false),

        Message::JumpToLine(line) => {
            let visible = model.document_height();
            if let Some(view) = model.rfc.as_mut() {
                if let Some(row) = view.row_for_line(line) {
                    view.set_cursor(row, visible);
                    model.needs_redraw = true;
                }
            }
        }

        Message::VisualToggle => {
            if let Some(view) = model.rfc.as_mut() {
                view.visual_anchor = match view.visual_anchor {
                    Some(_) => None,
                    None => Some(view.cursor_row),
                };
                model.needs_redraw = true;
            }
        }

        Message::OpenComposer => open_composer(model),

        Message::OpenReply => {
            let Some(view) = model.rfc.as_mut() else {
                return;
            };
            match view.cursor_line().filter(|line| view.has_thread(*line)) {
                Some(line) => {
                    if view.interaction.open_reply(line) {
                        model.focus = Focus::Reply;
                    } else {
                        model.flash_message = Some("A reply is still being posted".to_string());
                    }
                }
                None => model.flash_message = Some("No thread on this line".to_string()),
            }
            model.needs_redraw = true;
        }

        Message::ToggleCollapse => {
            let Some(view) = model.rfc.as_mut() else {
                return;
            };
            match view.cursor_line().filter(|line| view.has_thread(*line)) {
                Some(line) => view.interaction.toggle_collapsed(line),
                None => model.flash_message = Some("No thread on this line".to_string()),
            }
            model.needs_redraw = true;
        }

        Message::OpenGeneralComposer => {
            if let Some(view) = model.rfc.as_mut() {
                view.interaction.open_general();
                model.focus = Focus::GeneralComposer;
                model.needs_redraw = true;
            }
        }

        Message::Reload => {
            if let Some(view) = model.rfc.as_mut() {
                view.reload_generation += 1;
                model.effects.push(Effect::ReloadComments {
                    key: view.key.clone(),
                    generation: view.reload_generation,
                });
                model.flash_message = Some("Reloading comments...".to_string());
                model.needs_redraw = true;
            }
        }

        Message::CycleTheme => {
            let names = theme::built_in_theme_names();
            let current = names.iter().position(|name| *name == model.theme.name);
            let next = current.map_or(0, |idx| (idx + 1) % names.len());
            if let Some(name) = names.get(next) {
                if apply_theme(model, name) {
                    model.config.theme = Some((*name).to_string());
                    persist_config(model);
                    model.flash_message = Some(format!("Theme: {name}"));
                }
            }
            model.needs_redraw = true;
        }

        // === Editor ===
        Message::EditorInsert(c) => edit(model, |text| text.insert_char(c)),
        Message::EditorNewline => edit(model, TextArea::newline),
        Message::EditorBackspace => edit(model, TextArea::backspace),
        Message::EditorLeft => edit(model, TextArea::cursor_left),
        Message::EditorRight => edit(model, TextArea::cursor_right),
        Message::EditorUp => edit(model, TextArea::cursor_up),
        Message::EditorDown => edit(model, TextArea::cursor_down),
        Message::EditorHome => edit(model, TextArea::home),
        Message::EditorEnd => edit(model, TextArea::end),
        Message::EditorWordLeft => edit(model, TextArea::word_left),
        Message::EditorWordRight => edit(model, TextArea::word_right),
        Message::EditorDeleteWord => edit(model, TextArea::delete_word),
        Message::EditorClearLine => edit(model, TextArea::clear_line),

        Message::Submit => submit(model),

        Message::CancelEdit => {
            if let Some(view) = model.rfc.as_mut() {
                match model.focus {
                    Focus::Composer => view.interaction.cancel_composer(),
                    Focus::Reply => view.interaction.cancel_reply(),
                    Focus::GeneralComposer => view.interaction.cancel_general(),
                    Focus::Document | Focus::RfcList => {}
                }
            }
            if model.screen == Screen::RfcDetail {
                model.focus = Focus::Document;
            }
            model.needs_redraw = true;
        }

        // === Worker results ===
        Message::RfcsLoaded(result) => match result {
            Ok(listing) => rfcs_loaded(model, listing),
            Err(error) => {
                warn!("Failed to load RFCs: {error}");
                model.flash_message = Some(format!("Failed to load RFCs: {error}"));
                model.list_state = LoadState::Failed(error);
                model.needs_redraw = true;
            }
        },

        Message::RfcLoaded { key, result } => {
            if model.active_key.as_ref() != Some(&key) {
                debug!("Discarding stale detail for {key}");
                return;
            }
            match result {
                Ok(detail) => {
                    let mut view = RfcView::new(detail, model.document_width(), Some(&model.highlighter));
                    if let Some(line) = model.pending_line.take() {
                        if let Some(row) = view.row_for_line(line) {
                            view.set_cursor(row, model.document_height());
                        }
                    }
                    info!("Opened {key} ({} comments)", view.comments.entries().len());
                    model.rfc = Some(view);
                    model.detail_state = LoadState::Loaded;
                }
                Err(error) => {
                    warn!("Failed to load {key}: {error}");
                    model.rfc = None;
                    model.detail_state = LoadState::Failed(error);
                }
            }
            model.mounted.borrow_mut().clear();
            model.needs_redraw = true;
        }

        Message::CommentsReloaded {
            key,
            generation,
            result,
        } => {
            let Some(view) = model.rfc.as_mut().filter(|view| view.key == key) else {
                debug!("Discarding stale comments for {key}");
                return;
            };
            if generation <= view.synced_generation {
                debug!("Discarding comments for {key} fetched before the last post");
                return;
            }
            match result {
                Ok(fresh) => {
                    let in_flight = view.posting.and_then(|id| {
                        view.comments.entries().iter().find_map(|entry| match entry {
                            CommentEntry::Pending(p) if p.local_id == id => Some(p.clone()),
                            _ => None,
                        })
                    });
                    view.comments.reconcile(fresh);
                    if let Some(pending) = in_flight {
                        view.comments.add_pending(pending);
                    }
                    model.flash_message = None;
                }
                Err(error) => {
                    warn!("Failed to reload comments for {key}: {error}");
                    model.flash_message = Some(format!("Failed to reload comments: {error}"));
                }
            }
            model.needs_redraw = true;
        }

        Message::CommentPosted {
            key,
            local_id,
            target,
            reload,
        } => {
            let Some(view) = model.rfc.as_mut().filter(|view| view.key == key) else {
                debug!("Discarding post result for {key}");
                return;
            };
            if view.posting == Some(local_id) {
                view.posting = None;
            }
            view.synced_generation = view.reload_generation;
            view.interaction.finish_submit(target, true);
            match reload {
                Ok(fresh) => view.comments.reconcile(fresh),
                Err(error) => {
                    warn!("Posted comment on {key} but reload failed: {error}");
                    model.flash_message =
                        Some(format!("Comment posted, but reloading failed: {error}"));
                }
            }
            if focus_matches(model.focus, target) {
                model.focus = Focus::Document;
            }
            model.needs_redraw = true;
        }

        Message::CommentPostFailed {
            key,
            local_id,
            target,
            error,
        } => {
            let Some(view) = model.rfc.as_mut().filter(|view| view.key == key) else {
                debug!("Discarding post failure for {key}");
                return;
            };
            if view.posting == Some(local_id) {
                view.posting = None;
            }
            view.comments.rollback(local_id);
            view.interaction.finish_submit(target, false);
            model.flash_message = Some(format!("Failed to post comment: {error}"));
            model.needs_redraw = true;
        }

        // === Terminal ===
        Message::Resize { width, height } => {
            model.resize(width, height);
        }

        Message::Noop => {}
    }
}

/// Fold the positions captured by the last render back into the open RFC.
///
/// Resolves line offsets from the mounted anchors, then packs the sidebar
/// boxes with the heights they were drawn at. Returns `true` when offsets or
/// placements changed, meaning another frame is needed to settle.
pub fn after_render(model: &mut Model) -> bool {
    let Some(view) = model.rfc.as_mut() else {
        return false;
    };
    let mounted = model.mounted.borrow();
    let offsets = resolve_line_offsets(&*mounted, view.document.line_count());
    let boxes = build_boxes(
        view.thread_lines(),
        view.interaction.composer_line(),
        &offsets,
        &mounted.box_heights,
    );
    let placements = pack(&boxes, BOX_GAP);
    let changed = offsets != view.line_offsets || placements != view.placements;
    if changed {
        for line in view.thread_lines() {
            if offsets.get(line).is_none() {
                debug!("{} is not mounted; its thread sits at offset 0", anchor_id(line));
            }
        }
    }
    view.line_offsets = offsets;
    view.placements = placements;
    changed
}

/// Messages that come from the keyboard, as opposed to workers or the terminal.
const fn is_user_action(msg: &Message) -> bool {
    !matches!(
        msg,
        Message::Noop
            | Message::Resize { .. }
            | Message::RfcsLoaded(_)
            | Message::RfcLoaded { .. }
            | Message::CommentsReloaded { .. }
            | Message::CommentPosted { .. }
            | Message::CommentPostFailed { .. }
    )
}

fn open_rfc(model: &mut Model, key: crate::github::RfcKey) {
    info!("Opening {key}");
    model.screen = Screen::RfcDetail;
    model.focus = Focus::Document;
    model.rfc = None;
    model.detail_state = LoadState::Loading;
    model.active_key = Some(key.clone());
    model.mounted.borrow_mut().clear();
    model.effects.push(Effect::LoadRfc { key });
    model.needs_redraw = true;
}

fn rfcs_loaded(model: &mut Model, listing: RfcListing) {
    info!(
        "Loaded {} RFCs from {} repositories",
        listing.rfcs.len(),
        listing.repos.len()
    );
    model.current_user = Some(listing.user);
    model.repos = listing.repos;
    model.rfcs = listing.rfcs;
    model.list_state = LoadState::Loaded;
    if model
        .repo_filter
        .as_ref()
        .is_some_and(|repo| !model.repos.contains(repo))
    {
        model.repo_filter = None;
    }
    let count = model.filtered_rfcs().len();
    model.list_index = model.list_index.min(count.saturating_sub(1));
    model.list_scroll = model.list_scroll.min(model.list_index);

    if let Some(number) = model.pending_rfc.take() {
        let key = model
            .filtered_rfcs()
            .into_iter()
            .find(|rfc| rfc.number == number)
            .map(crate::github::RfcSummary::key);
        match key {
            Some(key) => open_rfc(model, key),
            None => model.flash_message = Some(format!("RFC #{number} not found")),
        }
    }
    model.needs_redraw = true;
}

/// All repositories, then each repository in turn.
fn next_repo(model: &Model) -> Option<crate::github::RepoRef> {
    match &model.repo_filter {
        None => model.repos.first().cloned(),
        Some(current) => model
            .repos
            .iter()
            .position(|repo| repo == current)
            .and_then(|idx| model.repos.get(idx + 1))
            .cloned(),
    }
}

fn half_page(model: &Model) -> isize {
    (model.document_height() / 2).max(1) as isize
}

fn page(model: &Model) -> isize {
    model.document_height().max(1) as isize
}

fn move_cursor(model: &mut Model, delta: isize) {
    let visible = model.document_height();
    if let Some(view) = model.rfc.as_mut() {
        view.move_cursor(delta, visible);
        model.needs_redraw = true;
    }
}

fn jump_commented(model: &mut Model, forward: bool) {
    let visible = model.document_height();
    let Some(view) = model.rfc.as_mut() else {
        return;
    };
    let target = if forward {
        view.next_commented_row()
    } else {
        view.prev_commented_row()
    };
    match target {
        Some(row) => view.set_cursor(row, visible),
        None => model.flash_message = Some("No more comments".to_string()),
    }
    model.needs_redraw = true;
}

fn open_composer(model: &mut Model) {
    let Some(view) = model.rfc.as_mut() else {
        return;
    };
    model.needs_redraw = true;

    if view.visual_anchor.is_some() {
        let selection = view.selection_text().unwrap_or_default();
        let line = view.selection_line();
        view.visual_anchor = None;
        if let Some(line) = line {
            if view.interaction.open_composer_with_quote(line, &selection) {
                model.focus = Focus::Composer;
            }
        }
        return;
    }

    let Some(line) = view.cursor_line() else {
        model.flash_message = Some("Move the cursor onto the document to comment".to_string());
        return;
    };
    if !view.document.is_commentable(line) {
        model.flash_message = Some(format!("Line {line} cannot be commented on"));
        return;
    }
    if view.interaction.open_composer(line) {
        model.focus = Focus::Composer;
    } else {
        model.flash_message = Some("A comment is still being posted".to_string());
    }
}

/// Apply `f` to the text box that has focus.
fn edit(model: &mut Model, f: impl FnOnce(&mut TextArea)) {
    let Some(view) = model.rfc.as_mut() else {
        return;
    };
    let interaction = &mut view.interaction;
    let text = match model.focus {
        Focus::Composer if interaction.composer_line().is_some() => &mut interaction.composer_text,
        Focus::Reply if interaction.reply_line.is_some() => &mut interaction.reply_text,
        Focus::GeneralComposer if interaction.general_open => &mut interaction.general_text,
        _ => return,
    };
    f(text);
    text.ensure_visible(MIN_EDITOR_ROWS as usize * 2);
    model.needs_redraw = true;
}

fn submit(model: &mut Model) {
    let author = model
        .current_user
        .clone()
        .unwrap_or_else(|| "you".to_string());
    let Some(view) = model.rfc.as_mut() else {
        return;
    };
    let target = match model.focus {
        Focus::Composer => view
            .interaction
            .composer_line()
            .map(|line| SubmitTarget::Composer { line }),
        Focus::Reply => view
            .interaction
            .reply_line
            .map(|line| SubmitTarget::Reply { line }),
        Focus::GeneralComposer => Some(SubmitTarget::General),
        Focus::Document | Focus::RfcList => None,
    };
    let Some(target) = target else {
        return;
    };
    if view.interaction.submitting.is_some() {
        model.flash_message = Some("A comment is already being posted".to_string());
        return;
    }
    let Some(submission) = view.interaction.begin_submit(target) else {
        return;
    };

    let pending = PendingComment::new(&author, &submission.body, submission.line);
    let local_id = pending.local_id;
    view.comments.add_pending(pending);
    view.posting = Some(local_id);
    let path = submission
        .line
        .and(view.detail.markdown_file_path.clone());
    model.effects.push(Effect::PostComment {
        key: view.key.clone(),
        local_id,
        target,
        body: submission.body,
        path,
        line: submission.line,
    });
    model.needs_redraw = true;
}

const fn focus_matches(focus: Focus, target: SubmitTarget) -> bool {
    matches!(
        (focus, target),
        (Focus::Composer, SubmitTarget::Composer { .. })
            | (Focus::Reply, SubmitTarget::Reply { .. })
            | (Focus::GeneralComposer, SubmitTarget::General)
    )
}

/// Swap in a built-in theme and re-highlight the open document.
fn apply_theme(model: &mut Model, name: &str) -> bool {
    let Some(loaded) = theme::load_built_in_theme(name) else {
        return false;
    };
    model.theme = loaded.theme;
    model.highlighter = match loaded.syntax_theme {
        Some(syntax) => Highlighter::with_theme(&syntax),
        None if name.contains("light") => Highlighter::with_theme("base16-ocean.light"),
        None => Highlighter::new(),
    };
    if let Some(view) = model.rfc.as_mut() {
        let width = view.layout_width;
        view.relayout(width, Some(&model.highlighter));
    }
    true
}

fn persist_config(model: &mut Model) {
    if let Err(error) = config::save_ui_config(&model.config) {
        warn!("Failed to save config: {error:#}");
        model.flash_message = Some(format!("Failed to save config: {error}"));
    }
}
