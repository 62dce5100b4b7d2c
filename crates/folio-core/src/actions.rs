use std::time::Instant;

use super::state::Focus;
use super::state::NotificationKind;
use super::state::UiTheme;
use super::terminal::SessionId;

#[derive(Debug, Clone)]
pub enum FolioAction {
    User(UserAction),
    Runtime(RuntimeAction),
}

#[derive(Debug, Clone)]
pub enum UserAction {
    ToggleActionPalette,
    ShowHelp,
    CloseOverlay,
    OverlayMoveUp,
    OverlayMoveDown,
    OverlayQueryInput(char),
    OverlayQueryBackspace,
    OverlayQueryPaste(String),
    OverlaySubmit,

    SetFocus(Focus),
    CycleFocus,
    ToggleSidebar,
    ToggleTerminal,
    ToggleTerminalMaximized,
    ToggleChat,
    ResizeTerminal(i16),
    NextPanelTab,
    SetTheme(UiTheme),
    CycleTheme,

    ExplorerMoveUp,
    ExplorerMoveDown,
    ExplorerOpenSelected,
    OpenFile(String),
    CloseFile(String),
    CloseActiveFile,
    NextFile,
    PrevFile,
    TogglePreview,
    CopyActiveFile,

    NewTerminal,
    CloseTerminal(SessionId),
    CloseActiveTerminal,
    SelectTerminal(SessionId),
    NextTerminal,
    PrevTerminal,
    TerminalInput(char),
    TerminalPaste(String),
    TerminalBackspace,
    TerminalSubmit,

    ChatInput(char),
    ChatPaste(String),
    ChatBackspace,
    ChatSubmit,

    CycleBranch,
    SyncRepository,

    DismissNotification,
    Quit,
}

#[derive(Debug, Clone)]
pub enum RuntimeAction {
    /// Reply text (or a displayable failure) for the in-flight chat request.
    ChatReply { text: String, at: Instant },
    Tick(Instant),
    Notify {
        message: String,
        kind: NotificationKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteCommand {
    NewTerminal,
    ToggleTerminal,
    ToggleSidebar,
    ToggleChat,
    MaximizeTerminal,
    SetTheme(UiTheme),
    CycleTheme,
    TogglePreview,
    CopyFile,
    CloseFile,
    SwitchBranch,
    SyncRepository,
    ShowHelp,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteItem {
    pub label: &'static str,
    pub command: PaletteCommand,
}

pub const PALETTE_ITEMS: [PaletteItem; 16] = [
    PaletteItem {
        label: "New Terminal",
        command: PaletteCommand::NewTerminal,
    },
    PaletteItem {
        label: "Toggle Terminal",
        command: PaletteCommand::ToggleTerminal,
    },
    PaletteItem {
        label: "Toggle Sidebar",
        command: PaletteCommand::ToggleSidebar,
    },
    PaletteItem {
        label: "Toggle Chat",
        command: PaletteCommand::ToggleChat,
    },
    PaletteItem {
        label: "Maximize Terminal",
        command: PaletteCommand::MaximizeTerminal,
    },
    PaletteItem {
        label: "Theme: Dark (Default)",
        command: PaletteCommand::SetTheme(UiTheme::Dark),
    },
    PaletteItem {
        label: "Theme: Light",
        command: PaletteCommand::SetTheme(UiTheme::Light),
    },
    PaletteItem {
        label: "Theme: Monokai",
        command: PaletteCommand::SetTheme(UiTheme::Monokai),
    },
    PaletteItem {
        label: "Switch theme",
        command: PaletteCommand::CycleTheme,
    },
    PaletteItem {
        label: "Toggle Preview",
        command: PaletteCommand::TogglePreview,
    },
    PaletteItem {
        label: "Copy File",
        command: PaletteCommand::CopyFile,
    },
    PaletteItem {
        label: "Close File",
        command: PaletteCommand::CloseFile,
    },
    PaletteItem {
        label: "Git: Switch Branch",
        command: PaletteCommand::SwitchBranch,
    },
    PaletteItem {
        label: "Git: Sync",
        command: PaletteCommand::SyncRepository,
    },
    PaletteItem {
        label: "Keyboard Shortcuts",
        command: PaletteCommand::ShowHelp,
    },
    PaletteItem {
        label: "Quit",
        command: PaletteCommand::Quit,
    },
];

pub fn filtered_palette_indices(query: &str) -> Vec<usize> {
    let query = query.trim().to_ascii_lowercase();
    if query.is_empty() {
        return (0..PALETTE_ITEMS.len()).collect();
    }

    PALETTE_ITEMS
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            if item.label.to_ascii_lowercase().contains(&query) {
                Some(idx)
            } else {
                None
            }
        })
        .collect()
}
