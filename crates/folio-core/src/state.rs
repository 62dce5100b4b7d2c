use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use chrono::DateTime;
use chrono::Local;
use serde::Deserialize;
use serde::Serialize;

use super::config::Config;
use super::files;
use super::persistence::Preferences;
use super::reveal::RevealCadence;
use super::reveal::RevealTask;
use super::terminal::TerminalState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiTheme {
    #[default]
    Dark,
    Light,
    Monokai,
}

impl UiTheme {
    pub const ALL: [UiTheme; 3] = [UiTheme::Dark, UiTheme::Light, UiTheme::Monokai];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Monokai => "monokai",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Monokai,
            Self::Monokai => Self::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Explorer,
    Editor,
    Terminal,
    Chat,
}

impl Focus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Explorer => "Explorer",
            Self::Editor => "Editor",
            Self::Terminal => "Terminal",
            Self::Chat => "Chat",
        }
    }
}

/// Tabs of the bottom panel that hosts the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTab {
    Problems,
    Output,
    Terminal,
    DebugConsole,
}

impl PanelTab {
    pub const ALL: [PanelTab; 4] = [
        PanelTab::Problems,
        PanelTab::Output,
        PanelTab::Terminal,
        PanelTab::DebugConsole,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Problems => "PROBLEMS",
            Self::Output => "OUTPUT",
            Self::Terminal => "TERMINAL",
            Self::DebugConsole => "DEBUG CONSOLE",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Problems => Self::Output,
            Self::Output => Self::Terminal,
            Self::Terminal => Self::DebugConsole,
            Self::DebugConsole => Self::Problems,
        }
    }

    /// Fixed content shown by the non-terminal tabs.
    pub fn static_lines(self) -> &'static [&'static str] {
        match self {
            Self::Problems => &[
                "No problems found in workspace.",
                "• TypeScript: No errors",
                "• ESLint: No warnings",
                "• Build: Successful",
            ],
            Self::Output => &[
                "[INFO] Starting development server...",
                "[BUILD] Compiling TypeScript...",
                "[SUCCESS] Compiled successfully in 1.2s",
                "[HMR] Hot Module Replacement enabled",
                "[INFO] Local development server running on http://localhost:5173",
            ],
            Self::DebugConsole => &[
                "[DEBUG] Initializing portfolio data...",
                "[DEBUG] Loading projects from projects.json",
                "[DEBUG] Loading skills from skills.ts",
                "[DEBUG] Loading experience from experience.log",
                "[DEBUG] Assistant initialized",
                "[DEBUG] All components loaded successfully",
            ],
            Self::Terminal => &[],
        }
    }
}

pub const TERMINAL_MIN_HEIGHT: u16 = 6;
pub const TERMINAL_MAX_HEIGHT: u16 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutState {
    pub show_sidebar: bool,
    pub show_terminal: bool,
    pub terminal_maximized: bool,
    pub show_chat: bool,
    pub terminal_height: u16,
    pub panel_tab: PanelTab,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            show_sidebar: true,
            show_terminal: true,
            terminal_maximized: false,
            show_chat: false,
            terminal_height: 12,
            panel_tab: PanelTab::Terminal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub open_files: Vec<String>,
    pub active_file: Option<String>,
    pub preview: BTreeSet<String>,
    pub explorer_selected: usize,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::from_preferences(&Preferences::default())
    }
}

impl EditorState {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        let mut preview = BTreeSet::new();
        preview.insert(files::PROJECTS_ID.to_string());
        Self {
            open_files: prefs.open_files.clone(),
            active_file: prefs.active_file_id.clone(),
            preview,
            explorer_selected: 0,
        }
    }

    pub fn active(&self) -> Option<&'static files::PortfolioFile> {
        self.active_file.as_deref().and_then(files::find)
    }

    pub fn is_previewing(&self, id: &str) -> bool {
        self.preview.contains(id)
    }

    /// Activates a file, appending it to the open tabs if needed.
    pub fn open(&mut self, id: &str) -> bool {
        if files::find(id).is_none() {
            return false;
        }
        if !self.open_files.iter().any(|open| open == id) {
            self.open_files.push(id.to_string());
        }
        self.active_file = Some(id.to_string());
        true
    }

    /// Closes a tab. The last remaining tab becomes active, or none.
    pub fn close(&mut self, id: &str) -> bool {
        let before = self.open_files.len();
        self.open_files.retain(|open| open != id);
        if self.open_files.len() == before {
            return false;
        }
        if self.open_files.is_empty() {
            self.active_file = None;
        } else if self.active_file.as_deref() == Some(id) {
            self.active_file = self.open_files.last().cloned();
        }
        true
    }

    pub fn cycle(&mut self, step: isize) {
        let len = self.open_files.len();
        if len == 0 {
            return;
        }
        let current = self
            .active_file
            .as_deref()
            .and_then(|active| self.open_files.iter().position(|open| open == active))
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(len as isize) as usize;
        self.active_file = Some(self.open_files[next].clone());
    }

    pub fn toggle_preview(&mut self, id: &str) -> bool {
        let Some(file) = files::find(id) else {
            return false;
        };
        if !file.file_type.supports_preview() {
            return false;
        }
        if !self.preview.remove(id) {
            self.preview.insert(id.to_string());
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: Arc<str>,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<Arc<str>>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub is_loading: bool,
    pub reveal: Option<RevealTask>,
    pub cadence: RevealCadence,
    pub assistant_name: String,
}

impl ChatState {
    pub fn new(assistant_name: &str, cadence: RevealCadence) -> Self {
        Self {
            messages: vec![ChatMessage::new(
                ChatRole::Assistant,
                format!("Hello! I'm {assistant_name}. How can I help you today?"),
            )],
            input: String::new(),
            is_loading: false,
            reveal: None,
            cadence,
            assistant_name: assistant_name.to_string(),
        }
    }

    /// Text to draw for message `idx`, honoring an in-flight reveal.
    pub fn displayed_text(&self, idx: usize) -> Option<&str> {
        let message = self.messages.get(idx)?;
        let is_last = idx + 1 == self.messages.len();
        match &self.reveal {
            Some(task)
                if is_last
                    && message.role == ChatRole::Assistant
                    && task.is_active()
                    && task.content() == message.text.as_ref() =>
            {
                Some(task.visible())
            }
            _ => Some(&message.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: Arc<str>,
    pub kind: NotificationKind,
    pub shown_at: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    ActionPalette { selected: usize, query: String },
    Help,
}

#[derive(Debug, Clone)]
pub struct Interaction {
    pub focus: Focus,
    pub overlay: Overlay,
    pub notification: Option<Notification>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            focus: Focus::Terminal,
            overlay: Overlay::None,
            notification: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Customization {
    pub theme: UiTheme,
}

pub const BRANCHES: [&str; 3] = ["main", "dev", "feature/ui"];

pub const STARTUP_SYNC: Duration = Duration::from_millis(3000);
pub const MANUAL_SYNC: Duration = Duration::from_millis(2000);
pub const BRANCH_SYNC: Duration = Duration::from_millis(1500);

/// A simulated repository sync. The start is stamped on the first tick after it begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTimer {
    pub duration: Duration,
    pub started_at: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct StatusBar {
    pub branch: &'static str,
    pub sync: Option<SyncTimer>,
}

impl Default for StatusBar {
    fn default() -> Self {
        let mut status = Self {
            branch: BRANCHES[0],
            sync: None,
        };
        status.start_sync(STARTUP_SYNC);
        status
    }
}

impl StatusBar {
    pub fn is_syncing(&self) -> bool {
        self.sync.is_some()
    }

    pub fn start_sync(&mut self, duration: Duration) {
        self.sync = Some(SyncTimer {
            duration,
            started_at: None,
        });
    }

    /// Moves to the next branch and syncs it.
    pub fn next_branch(&mut self) {
        let current = BRANCHES
            .iter()
            .position(|branch| *branch == self.branch)
            .unwrap_or(0);
        self.branch = BRANCHES[(current + 1) % BRANCHES.len()];
        self.start_sync(BRANCH_SYNC);
    }

    /// Stamps or expires the running sync. Returns `true` when it finished.
    pub fn poll_sync(&mut self, now: Instant) -> bool {
        let finished = match self.sync.as_mut() {
            Some(timer) => match timer.started_at {
                Some(started_at) => now.saturating_duration_since(started_at) >= timer.duration,
                None => {
                    timer.started_at = Some(now);
                    false
                }
            },
            None => false,
        };
        if finished {
            self.sync = None;
        }
        finished
    }
}

#[derive(Debug, Clone)]
pub struct FolioState {
    pub terminal: TerminalState,
    pub layout: LayoutState,
    pub editor: EditorState,
    pub chat: ChatState,
    pub customization: Customization,
    pub interaction: Interaction,
    pub status: StatusBar,
}

impl FolioState {
    pub fn new(config: &Config, prefs: &Preferences) -> Self {
        Self {
            terminal: TerminalState::with_welcome_session(
                config.terminal.identity(),
                config.terminal.max_sessions,
            ),
            layout: LayoutState::default(),
            editor: EditorState::from_preferences(prefs),
            chat: ChatState::new(&config.chat.assistant_name, config.reveal.cadence()),
            customization: Customization { theme: prefs.theme },
            interaction: Interaction::default(),
            status: StatusBar::default(),
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            active_file_id: self.editor.active_file.clone(),
            open_files: self.editor.open_files.clone(),
            theme: self.customization.theme,
        }
    }
}
