use std::time::Duration;

use super::actions::filtered_palette_indices;
use super::actions::FolioAction;
use super::actions::PaletteCommand;
use super::actions::RuntimeAction;
use super::actions::UserAction;
use super::actions::PALETTE_ITEMS;
use super::files;
use super::persistence::Preferences;
use super::reveal::RevealTask;
use super::state::ChatMessage;
use super::state::ChatRole;
use super::state::Focus;
use super::state::FolioState;
use super::state::Notification;
use super::state::NotificationKind;
use super::state::Overlay;
use super::state::PanelTab;
use super::state::UiTheme;
use super::state::MANUAL_SYNC;
use super::state::TERMINAL_MAX_HEIGHT;
use super::state::TERMINAL_MIN_HEIGHT;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolioEffect {
    RequestFrame,
    SubmitChat {
        prompt: String,
        history: Vec<ChatMessage>,
        context: String,
    },
    CopyToClipboard {
        text: String,
        label: String,
    },
    PersistPreferences(Preferences),
    Exit,
}

pub fn reduce(state: &mut FolioState, action: FolioAction) -> Vec<FolioEffect> {
    match action {
        FolioAction::User(user) => reduce_user(state, user),
        FolioAction::Runtime(runtime) => reduce_runtime(state, runtime),
    }
}

fn reduce_user(state: &mut FolioState, action: UserAction) -> Vec<FolioEffect> {
    match action {
        UserAction::ToggleActionPalette => {
            state.interaction.overlay = match state.interaction.overlay {
                Overlay::ActionPalette { .. } => Overlay::None,
                _ => Overlay::ActionPalette {
                    selected: 0,
                    query: String::new(),
                },
            };
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ShowHelp => {
            state.interaction.overlay = Overlay::Help;
            vec![FolioEffect::RequestFrame]
        }
        UserAction::CloseOverlay => {
            state.interaction.overlay = Overlay::None;
            vec![FolioEffect::RequestFrame]
        }
        UserAction::OverlayMoveUp => {
            if let Overlay::ActionPalette { selected, query } = &mut state.interaction.overlay {
                let filtered = filtered_palette_indices(query);
                if !filtered.is_empty() {
                    if *selected == 0 {
                        *selected = filtered.len().saturating_sub(1);
                    } else {
                        *selected -= 1;
                    }
                }
                return vec![FolioEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::OverlayMoveDown => {
            if let Overlay::ActionPalette { selected, query } = &mut state.interaction.overlay {
                let filtered = filtered_palette_indices(query);
                if !filtered.is_empty() {
                    *selected = (*selected + 1) % filtered.len();
                }
                return vec![FolioEffect::RequestFrame];
            }
            Vec::new()
        }
        UserAction::OverlayQueryInput(ch) => edit_palette_query(state, |query| query.push(ch)),
        UserAction::OverlayQueryBackspace => edit_palette_query(state, |query| {
            query.pop();
        }),
        UserAction::OverlayQueryPaste(text) => {
            edit_palette_query(state, |query| query.push_str(&text))
        }
        UserAction::OverlaySubmit => {
            let (selected, query) = match &state.interaction.overlay {
                Overlay::ActionPalette { selected, query } => (*selected, query.clone()),
                _ => return Vec::new(),
            };

            let filtered = filtered_palette_indices(&query);
            let Some(palette_idx) = filtered.get(selected).copied() else {
                return Vec::new();
            };
            let command = PALETTE_ITEMS[palette_idx].command;
            state.interaction.overlay = Overlay::None;
            let mut effects = command_to_effects(state, command);
            effects.push(FolioEffect::RequestFrame);
            effects
        }

        UserAction::SetFocus(focus) => {
            if focus_available(state, focus) {
                state.interaction.focus = focus;
            }
            vec![FolioEffect::RequestFrame]
        }
        UserAction::CycleFocus => {
            let order = [Focus::Explorer, Focus::Editor, Focus::Terminal, Focus::Chat];
            let start = order
                .iter()
                .position(|focus| *focus == state.interaction.focus)
                .unwrap_or(0);
            for step in 1..=order.len() {
                let candidate = order[(start + step) % order.len()];
                if focus_available(state, candidate) {
                    state.interaction.focus = candidate;
                    break;
                }
            }
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ToggleSidebar => {
            toggle_sidebar(state);
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ToggleTerminal => {
            toggle_terminal(state);
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ToggleTerminalMaximized => {
            toggle_maximized(state);
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ToggleChat => {
            toggle_chat(state);
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ResizeTerminal(delta) => {
            let next = i32::from(state.layout.terminal_height) + i32::from(delta);
            state.layout.terminal_height = next.clamp(
                i32::from(TERMINAL_MIN_HEIGHT),
                i32::from(TERMINAL_MAX_HEIGHT),
            ) as u16;
            vec![FolioEffect::RequestFrame]
        }
        UserAction::NextPanelTab => {
            state.layout.panel_tab = state.layout.panel_tab.next();
            vec![FolioEffect::RequestFrame]
        }
        UserAction::SetTheme(theme) => set_theme(state, theme),
        UserAction::CycleTheme => {
            let next = state.customization.theme.next();
            set_theme(state, next)
        }

        UserAction::ExplorerMoveUp => {
            let len = files::FILES.len();
            let current = state.editor.explorer_selected.min(len - 1);
            state.editor.explorer_selected = (current + len - 1) % len;
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ExplorerMoveDown => {
            let len = files::FILES.len();
            state.editor.explorer_selected = (state.editor.explorer_selected + 1) % len;
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ExplorerOpenSelected => {
            let Some(file) = files::FILES.get(state.editor.explorer_selected) else {
                return Vec::new();
            };
            let effects = open_file(state, file.id);
            if !effects.is_empty() {
                state.interaction.focus = Focus::Editor;
            }
            effects
        }
        UserAction::OpenFile(id) => open_file(state, &id),
        UserAction::CloseFile(id) => close_file(state, &id),
        UserAction::CloseActiveFile => close_active_file(state),
        UserAction::NextFile => {
            state.editor.cycle(1);
            with_persist(state)
        }
        UserAction::PrevFile => {
            state.editor.cycle(-1);
            with_persist(state)
        }
        UserAction::TogglePreview => toggle_preview(state),
        UserAction::CopyActiveFile => copy_active_file(state),

        UserAction::NewTerminal => new_terminal(state),
        UserAction::CloseTerminal(id) => {
            if state.terminal.close_session(id) {
                vec![FolioEffect::RequestFrame]
            } else {
                Vec::new()
            }
        }
        UserAction::CloseActiveTerminal => {
            if state.terminal.close_active() {
                vec![FolioEffect::RequestFrame]
            } else {
                Vec::new()
            }
        }
        UserAction::SelectTerminal(id) => {
            if state.terminal.select_session(id) {
                vec![FolioEffect::RequestFrame]
            } else {
                Vec::new()
            }
        }
        UserAction::NextTerminal => {
            state.terminal.next_session();
            vec![FolioEffect::RequestFrame]
        }
        UserAction::PrevTerminal => {
            state.terminal.prev_session();
            vec![FolioEffect::RequestFrame]
        }
        UserAction::TerminalInput(_)
        | UserAction::TerminalPaste(_)
        | UserAction::TerminalBackspace
        | UserAction::TerminalSubmit
            if !terminal_tab_visible(state) =>
        {
            Vec::new()
        }
        UserAction::TerminalInput(ch) => {
            state.terminal.push_input(ch);
            vec![FolioEffect::RequestFrame]
        }
        UserAction::TerminalPaste(text) => {
            // Multi-line pastes collapse onto one command line.
            let flattened = text.replace(['\r', '\n'], " ");
            state.terminal.push_input_str(&flattened);
            vec![FolioEffect::RequestFrame]
        }
        UserAction::TerminalBackspace => {
            state.terminal.pop_input();
            vec![FolioEffect::RequestFrame]
        }
        UserAction::TerminalSubmit => match state.terminal.submit_active() {
            Some(_) => vec![FolioEffect::RequestFrame],
            None => Vec::new(),
        },

        UserAction::ChatInput(ch) => {
            state.chat.input.push(ch);
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ChatPaste(text) => {
            state.chat.input.push_str(&text);
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ChatBackspace => {
            state.chat.input.pop();
            vec![FolioEffect::RequestFrame]
        }
        UserAction::ChatSubmit => submit_chat(state),

        UserAction::CycleBranch => {
            state.status.next_branch();
            tracing::debug!(branch = state.status.branch, "branch switched");
            vec![FolioEffect::RequestFrame]
        }
        UserAction::SyncRepository => {
            state.status.start_sync(MANUAL_SYNC);
            vec![FolioEffect::RequestFrame]
        }

        UserAction::DismissNotification => {
            if state.interaction.notification.take().is_some() {
                vec![FolioEffect::RequestFrame]
            } else {
                Vec::new()
            }
        }
        UserAction::Quit => vec![FolioEffect::Exit],
    }
}

fn reduce_runtime(state: &mut FolioState, action: RuntimeAction) -> Vec<FolioEffect> {
    match action {
        RuntimeAction::ChatReply { text, at } => {
            state.chat.is_loading = false;
            let message = ChatMessage::new(ChatRole::Assistant, text.as_str());
            state.chat.messages.push(message);
            if !state.layout.show_chat {
                state.chat.reveal = None;
            } else if let Some(task) = state.chat.reveal.as_mut() {
                task.retarget(&text, at);
            } else {
                state.chat.reveal = Some(RevealTask::start(text, state.chat.cadence, at));
            }
            tracing::debug!(messages = state.chat.messages.len(), "chat reply received");
            vec![FolioEffect::RequestFrame]
        }
        RuntimeAction::Tick(now) => {
            let mut changed = false;
            if let Some(task) = state.chat.reveal.as_mut() {
                changed |= task.poll(now);
                if task.is_complete() {
                    state.chat.reveal = None;
                }
            }
            let expired = match state.interaction.notification.as_mut() {
                Some(notification) => match notification.shown_at {
                    Some(shown_at) => now.saturating_duration_since(shown_at) >= NOTIFICATION_TTL,
                    None => {
                        notification.shown_at = Some(now);
                        false
                    }
                },
                None => false,
            };
            if expired {
                state.interaction.notification = None;
                changed = true;
            }
            changed |= state.status.poll_sync(now);
            if changed {
                vec![FolioEffect::RequestFrame]
            } else {
                Vec::new()
            }
        }
        RuntimeAction::Notify { message, kind } => {
            notify(state, message, kind);
            vec![FolioEffect::RequestFrame]
        }
    }
}

fn edit_palette_query(state: &mut FolioState, edit: impl FnOnce(&mut String)) -> Vec<FolioEffect> {
    if let Overlay::ActionPalette { selected, query } = &mut state.interaction.overlay {
        edit(query);
        *selected = 0;
        return vec![FolioEffect::RequestFrame];
    }
    Vec::new()
}

fn command_to_effects(state: &mut FolioState, command: PaletteCommand) -> Vec<FolioEffect> {
    match command {
        PaletteCommand::NewTerminal => new_terminal(state),
        PaletteCommand::ToggleTerminal => {
            toggle_terminal(state);
            Vec::new()
        }
        PaletteCommand::ToggleSidebar => {
            toggle_sidebar(state);
            Vec::new()
        }
        PaletteCommand::ToggleChat => {
            toggle_chat(state);
            Vec::new()
        }
        PaletteCommand::MaximizeTerminal => {
            toggle_maximized(state);
            Vec::new()
        }
        PaletteCommand::SetTheme(theme) => set_theme(state, theme),
        PaletteCommand::CycleTheme => {
            let next = state.customization.theme.next();
            set_theme(state, next)
        }
        PaletteCommand::TogglePreview => toggle_preview(state),
        PaletteCommand::CopyFile => copy_active_file(state),
        PaletteCommand::CloseFile => close_active_file(state),
        PaletteCommand::SwitchBranch => {
            state.status.next_branch();
            Vec::new()
        }
        PaletteCommand::SyncRepository => {
            state.status.start_sync(MANUAL_SYNC);
            Vec::new()
        }
        PaletteCommand::ShowHelp => {
            state.interaction.overlay = Overlay::Help;
            Vec::new()
        }
        PaletteCommand::Quit => vec![FolioEffect::Exit],
    }
}

fn focus_available(state: &FolioState, focus: Focus) -> bool {
    match focus {
        Focus::Explorer => state.layout.show_sidebar,
        Focus::Editor => !(state.layout.show_terminal && state.layout.terminal_maximized),
        Focus::Terminal => state.layout.show_terminal,
        Focus::Chat => state.layout.show_chat,
    }
}

fn settle_focus(state: &mut FolioState) {
    if !focus_available(state, state.interaction.focus) {
        state.interaction.focus = if focus_available(state, Focus::Editor) {
            Focus::Editor
        } else {
            Focus::Terminal
        };
    }
}

fn toggle_sidebar(state: &mut FolioState) {
    state.layout.show_sidebar = !state.layout.show_sidebar;
    settle_focus(state);
}

fn toggle_terminal(state: &mut FolioState) {
    state.layout.show_terminal = !state.layout.show_terminal;
    if state.layout.show_terminal {
        state.interaction.focus = Focus::Terminal;
    } else {
        state.layout.terminal_maximized = false;
    }
    settle_focus(state);
}

fn toggle_maximized(state: &mut FolioState) {
    if !state.layout.show_terminal {
        state.layout.show_terminal = true;
        state.layout.terminal_maximized = true;
    } else {
        state.layout.terminal_maximized = !state.layout.terminal_maximized;
    }
    if state.layout.terminal_maximized {
        state.interaction.focus = Focus::Terminal;
    }
    settle_focus(state);
}

/// Terminal input only lands while the terminal tab is on screen.
fn terminal_tab_visible(state: &FolioState) -> bool {
    state.layout.show_terminal && state.layout.panel_tab == PanelTab::Terminal
}

fn toggle_chat(state: &mut FolioState) {
    state.layout.show_chat = !state.layout.show_chat;
    if state.layout.show_chat {
        state.interaction.focus = Focus::Chat;
    } else {
        // A hidden pane keeps no reveal timer running.
        if let Some(task) = state.chat.reveal.as_mut() {
            task.cancel();
        }
        state.chat.reveal = None;
    }
    settle_focus(state);
}

fn set_theme(state: &mut FolioState, theme: UiTheme) -> Vec<FolioEffect> {
    if state.customization.theme == theme {
        return vec![FolioEffect::RequestFrame];
    }
    state.customization.theme = theme;
    tracing::info!(theme = theme.label(), "theme changed");
    with_persist(state)
}

fn with_persist(state: &FolioState) -> Vec<FolioEffect> {
    vec![
        FolioEffect::PersistPreferences(state.preferences()),
        FolioEffect::RequestFrame,
    ]
}

fn open_file(state: &mut FolioState, id: &str) -> Vec<FolioEffect> {
    if !state.editor.open(id) {
        tracing::warn!(file = id, "ignoring request to open unknown file");
        return Vec::new();
    }
    with_persist(state)
}

fn close_file(state: &mut FolioState, id: &str) -> Vec<FolioEffect> {
    if !state.editor.close(id) {
        return Vec::new();
    }
    with_persist(state)
}

fn close_active_file(state: &mut FolioState) -> Vec<FolioEffect> {
    match state.editor.active_file.clone() {
        Some(id) => close_file(state, &id),
        None => Vec::new(),
    }
}

fn toggle_preview(state: &mut FolioState) -> Vec<FolioEffect> {
    match state.editor.active_file.clone() {
        Some(id) if state.editor.toggle_preview(&id) => vec![FolioEffect::RequestFrame],
        _ => Vec::new(),
    }
}

fn copy_active_file(state: &mut FolioState) -> Vec<FolioEffect> {
    match state.editor.active() {
        Some(file) => vec![FolioEffect::CopyToClipboard {
            text: file.content.to_string(),
            label: file.name.to_string(),
        }],
        None => {
            notify(state, "No file open to copy", NotificationKind::Info);
            vec![FolioEffect::RequestFrame]
        }
    }
}

fn new_terminal(state: &mut FolioState) -> Vec<FolioEffect> {
    match state.terminal.create_session() {
        Ok(_) => {
            state.layout.show_terminal = true;
            state.layout.panel_tab = PanelTab::Terminal;
            state.interaction.focus = Focus::Terminal;
            settle_focus(state);
        }
        Err(err) => notify(state, err.to_string(), NotificationKind::Error),
    }
    vec![FolioEffect::RequestFrame]
}

fn submit_chat(state: &mut FolioState) -> Vec<FolioEffect> {
    let prompt = state.chat.input.trim().to_string();
    if prompt.is_empty() || state.chat.is_loading {
        return Vec::new();
    }
    let history = state.chat.messages.clone();
    state
        .chat
        .messages
        .push(ChatMessage::new(ChatRole::User, prompt.as_str()));
    state.chat.input.clear();
    state.chat.is_loading = true;
    tracing::debug!(turns = history.len(), "submitting chat prompt");
    vec![
        FolioEffect::SubmitChat {
            prompt,
            history,
            context: files::portfolio_context(),
        },
        FolioEffect::RequestFrame,
    ]
}

fn notify(state: &mut FolioState, message: impl Into<String>, kind: NotificationKind) {
    let message: String = message.into();
    state.interaction.notification = Some(Notification {
        message: message.into(),
        kind,
        shown_at: None,
    });
}

#[cfg(test)]
mod tests;
