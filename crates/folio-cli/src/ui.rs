use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Terminal;

use folio_chat::spawn_chat;
use folio_chat::ChatBackend;
use folio_chat::ChatEvent;
use folio_chat::ChatRequest;
use folio_chat::ChatTurn;
use folio_core::actions::{filtered_palette_indices, FolioAction, RuntimeAction, UserAction};
use folio_core::actions::PALETTE_ITEMS;
use folio_core::files;
use folio_core::persistence::PreferenceStore;
use folio_core::preview::{self, MarkdownBlock, Preview};
use folio_core::reducer::{reduce, FolioEffect};
use folio_core::state::{
    ChatMessage, ChatRole, Focus, FolioState, NotificationKind, Overlay, PanelTab, UiTheme,
};
use folio_core::terminal::history::{classify_line, LineKind};

use crate::highlight::HighlightCache;

struct TuiGuard;

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );
    }
}

pub struct App {
    pub state: FolioState,
    pub store: Option<PreferenceStore>,
    pub backend: Arc<dyn ChatBackend>,
    highlights: HighlightCache,
}

impl App {
    pub fn new(
        state: FolioState,
        store: Option<PreferenceStore>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            state,
            store,
            backend,
            highlights: HighlightCache::default(),
        }
    }
}

pub fn run(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        crossterm::cursor::Hide
    )?;
    let _guard = TuiGuard; // Ensures terminal is restored on exit or panic

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    run_app(&mut terminal, &mut app).map_err(|e| e.into())
}

enum UiEvent {
    Chat(ChatEvent),
}

fn to_turn(message: &ChatMessage) -> ChatTurn {
    let role = match message.role {
        ChatRole::User => folio_chat::ChatRole::User,
        ChatRole::Assistant => folio_chat::ChatRole::Assistant,
    };
    ChatTurn::new(role, message.text.as_ref())
}

fn copy_to_clipboard(text: String) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)
}

/// Performs reducer effects. Returns `true` when the app should exit.
fn apply_effects(app: &mut App, effects: Vec<FolioEffect>, tx: &mpsc::Sender<UiEvent>) -> bool {
    let mut exit = false;
    let mut follow_up = Vec::new();
    for effect in effects {
        match effect {
            FolioEffect::RequestFrame => {}
            FolioEffect::SubmitChat {
                prompt,
                history,
                context,
            } => {
                let request = ChatRequest {
                    prompt,
                    history: history.iter().map(to_turn).collect(),
                    context,
                };
                let tx_clone = tx.clone();
                spawn_chat(Arc::clone(&app.backend), request, move |event| {
                    let _ = tx_clone.send(UiEvent::Chat(event));
                });
            }
            FolioEffect::CopyToClipboard { text, label } => {
                let action = match copy_to_clipboard(text) {
                    Ok(()) => RuntimeAction::Notify {
                        message: format!("Copied {label} to clipboard"),
                        kind: NotificationKind::Success,
                    },
                    Err(err) => {
                        tracing::warn!(%err, file = %label, "clipboard copy failed");
                        RuntimeAction::Notify {
                            message: format!("Failed to copy {label}"),
                            kind: NotificationKind::Error,
                        }
                    }
                };
                follow_up.push(action);
            }
            FolioEffect::PersistPreferences(prefs) => {
                if let Some(store) = &app.store {
                    if let Err(err) = store.save(&prefs) {
                        tracing::warn!(%err, path = %store.path().display(), "failed to save preferences");
                        follow_up.push(RuntimeAction::Notify {
                            message: "Could not save preferences".to_string(),
                            kind: NotificationKind::Error,
                        });
                    }
                }
            }
            FolioEffect::Exit => exit = true,
        }
    }
    for action in follow_up {
        reduce(&mut app.state, FolioAction::Runtime(action));
    }
    exit
}

enum KeyHandlerResult {
    Continue(Vec<FolioEffect>),
    Exit,
}

fn user(state: &mut FolioState, action: UserAction) -> Vec<FolioEffect> {
    reduce(state, FolioAction::User(action))
}

fn handle_help_keys(key: event::KeyEvent, state: &mut FolioState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(1) => user(state, UserAction::CloseOverlay),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_action_palette_keys(key: event::KeyEvent, state: &mut FolioState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Esc => user(state, UserAction::CloseOverlay),
        KeyCode::Up => user(state, UserAction::OverlayMoveUp),
        KeyCode::Down => user(state, UserAction::OverlayMoveDown),
        KeyCode::Enter => user(state, UserAction::OverlaySubmit),
        KeyCode::Backspace => user(state, UserAction::OverlayQueryBackspace),
        KeyCode::Char(c) => user(state, UserAction::OverlayQueryInput(c)),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

/// Control chords that work regardless of focus.
fn handle_control_keys(key: event::KeyEvent, state: &mut FolioState) -> Option<Vec<FolioEffect>> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::F(1) => Some(user(state, UserAction::ShowHelp)),
            KeyCode::Tab => Some(user(state, UserAction::CycleFocus)),
            KeyCode::Esc if state.interaction.notification.is_some() => {
                Some(user(state, UserAction::DismissNotification))
            }
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Char('p') => UserAction::ToggleActionPalette,
        KeyCode::Char('b') => UserAction::ToggleSidebar,
        KeyCode::Char('j') => UserAction::ToggleTerminal,
        KeyCode::Char('u') => UserAction::ToggleTerminalMaximized,
        KeyCode::Char('l') => UserAction::ToggleChat,
        KeyCode::Char('w') => UserAction::CloseActiveFile,
        KeyCode::Char('n') => UserAction::NewTerminal,
        KeyCode::Char('x') => UserAction::CloseActiveTerminal,
        KeyCode::Char('t') => UserAction::CycleTheme,
        KeyCode::Char('e') => UserAction::TogglePreview,
        KeyCode::Char('y') => UserAction::CopyActiveFile,
        KeyCode::Char('g') => UserAction::CycleBranch,
        KeyCode::Up => UserAction::ResizeTerminal(1),
        KeyCode::Down => UserAction::ResizeTerminal(-1),
        KeyCode::Left => UserAction::PrevTerminal,
        KeyCode::Right => UserAction::NextTerminal,
        KeyCode::PageUp => UserAction::PrevFile,
        KeyCode::PageDown => UserAction::NextFile,
        _ => return None,
    };
    Some(user(state, action))
}

fn handle_focus_keys(key: event::KeyEvent, state: &mut FolioState) -> Vec<FolioEffect> {
    match state.interaction.focus {
        Focus::Explorer => match key.code {
            KeyCode::Up | KeyCode::Char('k') => user(state, UserAction::ExplorerMoveUp),
            KeyCode::Down | KeyCode::Char('j') => user(state, UserAction::ExplorerMoveDown),
            KeyCode::Enter => user(state, UserAction::ExplorerOpenSelected),
            _ => Vec::new(),
        },
        Focus::Editor => match key.code {
            KeyCode::Left => user(state, UserAction::PrevFile),
            KeyCode::Right => user(state, UserAction::NextFile),
            KeyCode::Char('p') => user(state, UserAction::TogglePreview),
            KeyCode::Char('c') => user(state, UserAction::CopyActiveFile),
            _ => Vec::new(),
        },
        Focus::Terminal => match key.code {
            KeyCode::Enter => user(state, UserAction::TerminalSubmit),
            KeyCode::Backspace => user(state, UserAction::TerminalBackspace),
            KeyCode::BackTab => user(state, UserAction::NextPanelTab),
            KeyCode::Char(c) => user(state, UserAction::TerminalInput(c)),
            _ => Vec::new(),
        },
        Focus::Chat => match key.code {
            KeyCode::Enter => user(state, UserAction::ChatSubmit),
            KeyCode::Backspace => user(state, UserAction::ChatBackspace),
            KeyCode::Char(c) => user(state, UserAction::ChatInput(c)),
            _ => Vec::new(),
        },
    }
}

fn handle_key_event(key: event::KeyEvent, state: &mut FolioState) -> KeyHandlerResult {
    if key.kind == KeyEventKind::Release {
        return KeyHandlerResult::Continue(Vec::new());
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return KeyHandlerResult::Exit;
    }

    match state.interaction.overlay {
        Overlay::Help => handle_help_keys(key, state),
        Overlay::ActionPalette { .. } => handle_action_palette_keys(key, state),
        Overlay::None => match handle_control_keys(key, state) {
            Some(effects) => KeyHandlerResult::Continue(effects),
            None => KeyHandlerResult::Continue(handle_focus_keys(key, state)),
        },
    }
}

fn handle_paste(text: String, state: &mut FolioState) -> Vec<FolioEffect> {
    if matches!(state.interaction.overlay, Overlay::ActionPalette { .. }) {
        return user(state, UserAction::OverlayQueryPaste(text));
    }
    match state.interaction.focus {
        Focus::Terminal => user(state, UserAction::TerminalPaste(text)),
        Focus::Chat => user(state, UserAction::ChatPaste(text)),
        Focus::Explorer | Focus::Editor => Vec::new(),
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();

    loop {
        // Process background events (chat responses)
        while let Ok(event) = rx.try_recv() {
            match event {
                UiEvent::Chat(ChatEvent::Reply(text)) | UiEvent::Chat(ChatEvent::Failed(text)) => {
                    let effects = reduce(
                        &mut app.state,
                        FolioAction::Runtime(RuntimeAction::ChatReply {
                            text,
                            at: Instant::now(),
                        }),
                    );
                    if apply_effects(app, effects, &tx) {
                        return Ok(());
                    }
                }
            }
        }

        reduce(
            &mut app.state,
            FolioAction::Runtime(RuntimeAction::Tick(Instant::now())),
        );

        terminal.draw(|f| ui(f, &app.state, &mut app.highlights))?;

        if event::poll(Duration::from_millis(16))? {
            let effects = match event::read()? {
                Event::Key(key) => match handle_key_event(key, &mut app.state) {
                    KeyHandlerResult::Continue(effects) => effects,
                    KeyHandlerResult::Exit => return Ok(()),
                },
                Event::Paste(text) => handle_paste(text, &mut app.state),
                _ => Vec::new(),
            };
            if apply_effects(app, effects, &tx) {
                return Ok(());
            }
        }
    }
}

#[derive(Clone, Copy)]
struct UiPalette {
    accent: Color,
    accent_alt: Color,
    success: Color,
    warning: Color,
    danger: Color,
    muted: Color,
    border: Color,
    text: Color,
    panel_bg: Color,
    selected_bg: Color,
    status_bg: Color,
}

fn palette_for(theme: UiTheme) -> UiPalette {
    match theme {
        UiTheme::Dark => UiPalette {
            accent: Color::Rgb(78, 201, 176),
            accent_alt: Color::Rgb(86, 156, 214),
            success: Color::Rgb(106, 153, 85),
            warning: Color::Rgb(220, 220, 170),
            danger: Color::Rgb(244, 71, 71),
            muted: Color::Rgb(133, 133, 133),
            border: Color::Rgb(60, 60, 60),
            text: Color::Rgb(212, 212, 212),
            panel_bg: Color::Rgb(30, 30, 30),
            selected_bg: Color::Rgb(55, 55, 61),
            status_bg: Color::Rgb(0, 122, 204),
        },
        UiTheme::Light => UiPalette {
            accent: Color::Rgb(0, 112, 193),
            accent_alt: Color::Rgb(38, 127, 153),
            success: Color::Rgb(22, 130, 93),
            warning: Color::Rgb(191, 136, 3),
            danger: Color::Rgb(205, 49, 49),
            muted: Color::Rgb(110, 110, 110),
            border: Color::Rgb(200, 200, 200),
            text: Color::Rgb(51, 51, 51),
            panel_bg: Color::Rgb(255, 255, 255),
            selected_bg: Color::Rgb(228, 230, 241),
            status_bg: Color::Rgb(0, 122, 204),
        },
        UiTheme::Monokai => UiPalette {
            accent: Color::Rgb(166, 226, 46),
            accent_alt: Color::Rgb(102, 217, 239),
            success: Color::Rgb(166, 226, 46),
            warning: Color::Rgb(230, 219, 116),
            danger: Color::Rgb(249, 38, 114),
            muted: Color::Rgb(117, 113, 94),
            border: Color::Rgb(73, 72, 62),
            text: Color::Rgb(248, 248, 242),
            panel_bg: Color::Rgb(39, 40, 34),
            selected_bg: Color::Rgb(62, 61, 50),
            status_bg: Color::Rgb(65, 67, 57),
        },
    }
}

fn line_kind_style(kind: LineKind, palette: UiPalette) -> Style {
    match kind {
        LineKind::Info => Style::default().fg(palette.accent_alt),
        LineKind::Success => Style::default().fg(palette.success),
        LineKind::Prompt => Style::default().fg(palette.accent),
        LineKind::Error => Style::default().fg(palette.danger),
        LineKind::Plain => Style::default().fg(palette.text),
    }
}

fn panel_block(title: &str, focused: bool, palette: UiPalette) -> Block<'static> {
    let border = if focused {
        palette.accent_alt
    } else {
        palette.border
    };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.panel_bg).fg(palette.text))
        .border_style(Style::default().fg(border))
}

fn get_spinner() -> &'static str {
    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    frames[(millis / 100) as usize % frames.len()]
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split(' ') {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            while current.chars().count() > width {
                let split_at = current
                    .char_indices()
                    .nth(width)
                    .map(|(idx, _)| idx)
                    .unwrap_or(current.len());
                let rest = current.split_off(split_at);
                out.push(std::mem::replace(&mut current, rest));
            }
        }
        out.push(current);
    }
    out
}

fn ui(f: &mut ratatui::Frame, state: &FolioState, highlights: &mut HighlightCache) {
    let palette = palette_for(state.customization.theme);
    f.render_widget(
        Block::default().style(Style::default().bg(palette.panel_bg).fg(palette.text)),
        f.area(),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_title_bar(f, rows[0], state, palette);
    render_status_bar(f, rows[2], state, palette);

    let mut columns = Vec::new();
    if state.layout.show_sidebar {
        columns.push(Constraint::Length(26));
    }
    columns.push(Constraint::Min(20));
    if state.layout.show_chat {
        columns.push(Constraint::Length(44));
    }
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(columns)
        .split(rows[1]);

    let mut next = 0;
    if state.layout.show_sidebar {
        render_explorer(f, body[next], state, palette);
        next += 1;
    }
    let main_area = body[next];
    next += 1;
    if state.layout.show_chat {
        render_chat(f, body[next], state, palette);
    }

    if state.layout.show_terminal && state.layout.terminal_maximized {
        render_panel(f, main_area, state, palette);
    } else if state.layout.show_terminal {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(state.layout.terminal_height),
            ])
            .split(main_area);
        render_editor(f, split[0], state, palette, highlights);
        render_panel(f, split[1], state, palette);
    } else {
        render_editor(f, main_area, state, palette, highlights);
    }

    render_notification(f, state, palette);

    if state.interaction.overlay == Overlay::Help {
        render_help(f, palette);
    }

    if let Overlay::ActionPalette { selected, query } = &state.interaction.overlay {
        let area = centered_rect(60, 40, f.area());
        f.render_widget(Clear, area);

        let block = Block::default()
            .title("Command Palette")
            .borders(Borders::ALL)
            .style(Style::default().bg(palette.panel_bg))
            .border_style(Style::default().fg(palette.border));
        f.render_widget(block.clone(), area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(1), Constraint::Min(0)].as_ref())
            .split(block.inner(area));

        let input =
            Paragraph::new(format!("> {}", query)).style(Style::default().fg(palette.accent));
        f.render_widget(input, layout[0]);

        let filtered_indices = filtered_palette_indices(query);
        let items: Vec<ListItem> = filtered_indices
            .iter()
            .enumerate()
            .map(|(i, &idx)| {
                let item = &PALETTE_ITEMS[idx];
                let style = if i == *selected {
                    Style::default().fg(palette.panel_bg).bg(palette.accent)
                } else {
                    Style::default().fg(palette.text)
                };
                ListItem::new(item.label).style(style)
            })
            .collect();
        f.render_widget(List::new(items), layout[1]);
    }
}

fn render_title_bar(f: &mut ratatui::Frame, area: Rect, state: &FolioState, palette: UiPalette) {
    let title = match state.editor.active() {
        Some(file) => format!("{} - portfolio", file.name),
        None => "portfolio".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(" ◆ folio ", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
        Span::styled(
            " File  Edit  View  Terminal  Help ",
            Style::default().fg(palette.muted),
        ),
    ]);
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(palette.selected_bg)),
        area,
    );
    f.render_widget(
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.text)),
        area,
    );
}

fn render_status_bar(f: &mut ratatui::Frame, area: Rect, state: &FolioState, palette: UiPalette) {
    let file_type = state
        .editor
        .active()
        .map(|file| file.file_type.label())
        .unwrap_or("Plain Text");
    let assistant = if state.chat.is_loading {
        format!("{} {} thinking", get_spinner(), state.chat.assistant_name)
    } else {
        format!("✦ {}", state.chat.assistant_name)
    };
    let sync = if state.status.is_syncing() {
        "⟳ Syncing..."
    } else {
        "✓ Synced"
    };
    let left = format!(
        "  ⎇ {}*  {}  ⊗ 0 ⚠ 0  ▣ {} terminal{}  ",
        state.status.branch,
        sync,
        state.terminal.len(),
        if state.terminal.len() == 1 { "" } else { "s" }
    );
    let right = format!(
        "{}  UTF-8  {}  {}  {}  ",
        state.interaction.focus.label(),
        file_type,
        state.customization.theme.label(),
        assistant
    );
    let style = Style::default().bg(palette.status_bg).fg(Color::White);
    f.render_widget(Paragraph::new(left).style(style), area);
    f.render_widget(
        Paragraph::new(right).alignment(Alignment::Right).style(style),
        area,
    );
}

fn render_explorer(f: &mut ratatui::Frame, area: Rect, state: &FolioState, palette: UiPalette) {
    let focused = state.interaction.focus == Focus::Explorer;
    let block = panel_block(" EXPLORER ", focused, palette);
    let items: Vec<ListItem> = files::FILES
        .iter()
        .enumerate()
        .map(|(idx, file)| {
            let is_active = state.editor.active_file.as_deref() == Some(file.id);
            let mut style = Style::default().fg(palette.text);
            if is_active {
                style = style.fg(palette.accent);
            }
            if focused && idx == state.editor.explorer_selected {
                style = style.bg(palette.selected_bg);
            }
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", file.file_type.extension()),
                    Style::default().fg(palette.accent_alt),
                ),
                Span::styled(file.name, style),
            ]))
        })
        .collect();
    let mut lines = vec![ListItem::new(Span::styled(
        "▾ PORTFOLIO",
        Style::default().fg(palette.muted).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(items);
    f.render_widget(List::new(lines).block(block), area);
}

fn render_editor(
    f: &mut ratatui::Frame,
    area: Rect,
    state: &FolioState,
    palette: UiPalette,
    highlights: &mut HighlightCache,
) {
    let focused = state.interaction.focus == Focus::Editor;
    let block = panel_block("", focused, palette);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let titles: Vec<Line> = state
        .editor
        .open_files
        .iter()
        .filter_map(|id| files::find(id))
        .map(|file| Line::from(format!(" {} ✕ ", file.name)))
        .collect();
    let selected = state
        .editor
        .active_file
        .as_deref()
        .and_then(|active| state.editor.open_files.iter().position(|id| id == active));
    f.render_widget(
        Tabs::new(titles)
            .select(selected.unwrap_or(0))
            .style(Style::default().fg(palette.muted))
            .highlight_style(
                Style::default()
                    .fg(palette.text)
                    .bg(palette.selected_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(""),
        split[0],
    );

    let Some(file) = state.editor.active() else {
        let welcome = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No file open",
                Style::default().fg(palette.muted).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Open a file from the explorer (Ctrl+B) or the command palette (Ctrl+P)."),
        ];
        f.render_widget(
            Paragraph::new(welcome)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            split[1],
        );
        return;
    };

    if state.editor.is_previewing(file.id) {
        let lines = match preview::preview_for(file) {
            Ok(preview) => preview_lines(&preview, palette),
            Err(err) => vec![Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(palette.danger),
            ))],
        };
        f.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            split[1],
        );
        return;
    }

    let code = highlights.lines(file, state.customization.theme);
    let gutter = code.len().to_string().len();
    let lines: Vec<Line> = code
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let mut spans = vec![Span::styled(
                format!("{:>gutter$}  ", idx + 1),
                Style::default().fg(palette.muted),
            )];
            spans.extend(line.spans.iter().cloned());
            Line::from(spans)
        })
        .collect();
    f.render_widget(Paragraph::new(lines), split[1]);
}

fn preview_lines(preview: &Preview, palette: UiPalette) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    match preview {
        Preview::Markdown(blocks) => {
            for block in blocks {
                out.push(match block {
                    MarkdownBlock::Heading { level, text } => {
                        let color = if *level == 1 {
                            palette.accent
                        } else {
                            palette.accent_alt
                        };
                        Line::from(Span::styled(
                            text.clone(),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ))
                    }
                    MarkdownBlock::Bullet(text) => Line::from(vec![
                        Span::styled("  • ", Style::default().fg(palette.accent)),
                        Span::raw(text.clone()),
                    ]),
                    MarkdownBlock::Quote(text) => Line::from(Span::styled(
                        format!("  “{text}”"),
                        Style::default()
                            .fg(palette.muted)
                            .add_modifier(Modifier::ITALIC),
                    )),
                    MarkdownBlock::Text(text) => Line::from(text.clone()),
                    MarkdownBlock::Blank => Line::from(""),
                });
            }
        }
        Preview::Projects(projects) => {
            for project in projects {
                out.push(Line::from(vec![
                    Span::styled(
                        project.name.clone(),
                        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  [{}]", project.status),
                        Style::default().fg(palette.success),
                    ),
                ]));
                out.push(Line::from(project.description.clone()));
                out.push(Line::from(Span::styled(
                    format!("Tech: {}", project.tech.join(", ")),
                    Style::default().fg(palette.accent_alt),
                )));
                for (label, url) in [("Demo", &project.demo_url), ("Video", &project.video_url)] {
                    if let Some(url) = url {
                        out.push(Line::from(Span::styled(
                            format!("{label}: {url}"),
                            Style::default()
                                .fg(palette.muted)
                                .add_modifier(Modifier::UNDERLINED),
                        )));
                    }
                }
                out.push(Line::from(""));
            }
        }
        Preview::Certifications(certs) => {
            for cert in certs {
                out.push(Line::from(Span::styled(
                    cert.name.clone(),
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                )));
                out.push(Line::from(format!("{} · {}", cert.issuer, cert.date)));
                if let Some(url) = &cert.credential_url {
                    out.push(Line::from(Span::styled(
                        url.clone(),
                        Style::default()
                            .fg(palette.muted)
                            .add_modifier(Modifier::UNDERLINED),
                    )));
                }
                out.push(Line::from(""));
            }
        }
    }
    out
}

fn render_panel(f: &mut ratatui::Frame, area: Rect, state: &FolioState, palette: UiPalette) {
    let focused = state.interaction.focus == Focus::Terminal;
    let block = panel_block("", focused, palette);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let titles: Vec<Line> = PanelTab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.label())))
        .collect();
    let selected = PanelTab::ALL
        .iter()
        .position(|tab| *tab == state.layout.panel_tab)
        .unwrap_or(0);
    f.render_widget(
        Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(palette.muted))
            .highlight_style(
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
        split[0],
    );

    if state.layout.panel_tab != PanelTab::Terminal {
        let lines: Vec<Line> = state
            .layout
            .panel_tab
            .static_lines()
            .iter()
            .map(|line| Line::from(*line))
            .collect();
        f.render_widget(Paragraph::new(lines), split[1]);
        return;
    }

    render_terminal(f, split[1], state, palette, focused);
}

fn render_terminal(
    f: &mut ratatui::Frame,
    area: Rect,
    state: &FolioState,
    palette: UiPalette,
    focused: bool,
) {
    let Some(session) = state.terminal.active() else {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No terminals open",
                Style::default().fg(palette.muted),
            )),
            Line::from(Span::styled(
                "[ + New Terminal ]  Ctrl+N",
                Style::default().fg(palette.accent),
            )),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
        return;
    };

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(18)])
        .split(area);

    let marker = state.terminal.identity().marker();
    let last = session.history.len().saturating_sub(1);
    let mut lines: Vec<Line> = session
        .history
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let style = line_kind_style(classify_line(raw, &marker), palette);
            if idx == last {
                let mut spans = vec![
                    Span::styled(raw.clone(), style),
                    Span::styled(session.pending_input.clone(), Style::default().fg(palette.text)),
                ];
                if focused {
                    spans.push(Span::styled(
                        "█",
                        Style::default().fg(palette.text),
                    ));
                }
                Line::from(spans)
            } else {
                Line::from(Span::styled(raw.clone(), style))
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    let height = split[0].height as usize;
    let scroll = lines.len().saturating_sub(height) as u16;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), split[0]);

    let items: Vec<ListItem> = state
        .terminal
        .sessions()
        .iter()
        .map(|s| {
            let style = if Some(s.id) == state.terminal.active_id() {
                Style::default().fg(palette.text).bg(palette.selected_bg)
            } else {
                Style::default().fg(palette.muted)
            };
            ListItem::new(format!(" ▸ {}", s.name)).style(style)
        })
        .collect();
    f.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(palette.border)),
        ),
        split[1],
    );
}

fn render_chat(f: &mut ratatui::Frame, area: Rect, state: &FolioState, palette: UiPalette) {
    let focused = state.interaction.focus == Focus::Chat;
    let title = format!(" {} ", state.chat.assistant_name.to_uppercase());
    let block = panel_block(&title, focused, palette);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(inner);

    let width = split[0].width.saturating_sub(1) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (idx, message) in state.chat.messages.iter().enumerate() {
        let (who, color) = match message.role {
            ChatRole::User => ("You".to_string(), palette.accent_alt),
            ChatRole::Assistant => (state.chat.assistant_name.clone(), palette.accent),
        };
        lines.push(Line::from(vec![
            Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {}", message.timestamp.format("%H:%M")),
                Style::default().fg(palette.muted),
            ),
        ]));
        let text = state.chat.displayed_text(idx).unwrap_or_default();
        for wrapped in wrap_text(text, width) {
            lines.push(Line::from(wrapped));
        }
        lines.push(Line::from(""));
    }
    if state.chat.is_loading {
        lines.push(Line::from(Span::styled(
            format!("{} Thinking...", get_spinner()),
            Style::default().fg(palette.muted),
        )));
    }
    let height = split[0].height as usize;
    let scroll = lines.len().saturating_sub(height) as u16;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), split[0]);

    let cursor = if focused { "█" } else { "" };
    let input = if state.chat.input.is_empty() && !focused {
        Span::styled(
            format!("Ask {} anything...", state.chat.assistant_name),
            Style::default().fg(palette.muted),
        )
    } else {
        Span::raw(format!("{}{}", state.chat.input, cursor))
    };
    f.render_widget(
        Paragraph::new(Line::from(input))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(palette.border)),
            ),
        split[1],
    );
}

fn render_notification(f: &mut ratatui::Frame, state: &FolioState, palette: UiPalette) {
    let Some(notification) = &state.interaction.notification else {
        return;
    };
    let (icon, color) = match notification.kind {
        NotificationKind::Success => ("✓", palette.success),
        NotificationKind::Error => ("✕", palette.danger),
        NotificationKind::Info => ("ℹ", palette.accent_alt),
    };
    let screen = f.area();
    let width = (notification.message.chars().count() as u16 + 6).min(screen.width);
    let area = Rect {
        x: screen.width.saturating_sub(width + 1),
        y: screen.height.saturating_sub(5),
        width,
        height: 3.min(screen.height),
    };
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(format!("{icon} {}", notification.message)).block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(palette.panel_bg).fg(palette.text))
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}

fn render_help(f: &mut ratatui::Frame, palette: UiPalette) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title("Keyboard Shortcuts")
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.panel_bg))
        .border_style(Style::default().fg(palette.border));

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)))
    };
    let help_text = vec![
        heading("Layout"),
        Line::from("  Ctrl+B   Toggle sidebar"),
        Line::from("  Ctrl+J   Toggle terminal"),
        Line::from("  Ctrl+U   Maximize terminal"),
        Line::from("  Ctrl+L   Toggle chat"),
        Line::from("  Ctrl+Up/Down  Resize terminal"),
        Line::from("  Tab      Cycle focus"),
        Line::from("  Ctrl+T   Switch theme"),
        Line::from(""),
        heading("Files"),
        Line::from("  Enter    Open selected file (explorer)"),
        Line::from("  Ctrl+W   Close active file"),
        Line::from("  Ctrl+PgUp/PgDn  Previous/next file"),
        Line::from("  Ctrl+E   Toggle preview"),
        Line::from("  Ctrl+Y   Copy file contents"),
        Line::from(""),
        heading("Terminal"),
        Line::from("  Ctrl+N   New terminal"),
        Line::from("  Ctrl+X   Close terminal"),
        Line::from("  Ctrl+Left/Right  Switch terminal"),
        Line::from("  Shift+Tab  Next panel tab"),
        Line::from(""),
        heading("General"),
        Line::from("  Ctrl+P   Command palette"),
        Line::from("  Ctrl+G   Switch branch"),
        Line::from("  Ctrl+Q   Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to close",
            Style::default().fg(palette.warning),
        )),
    ];

    let text = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(text, area);
}

fn centered_rect(
    percent_x: u16,
    percent_y: u16,
    r: ratatui::layout::Rect,
) -> ratatui::layout::Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_chat::ChatError;
    use folio_core::config::Config;
    use folio_core::persistence::Preferences;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    struct OfflineBackend;

    impl ChatBackend for OfflineBackend {
        fn complete(&self, _request: &ChatRequest) -> Result<String, ChatError> {
            Err(ChatError::Network("offline".to_string()))
        }
    }

    fn app() -> App {
        App::new(
            FolioState::new(&Config::default(), &Preferences::default()),
            None,
            Arc::new(OfflineBackend),
        )
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
        terminal
            .draw(|f| ui(f, &app.state, &mut app.highlights))
            .expect("draw");
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> event::KeyEvent {
        event::KeyEvent::new(code, modifiers)
    }

    #[test]
    fn wrap_text_breaks_on_words_and_long_runs() {
        assert_eq!(wrap_text("hello big world", 9), vec!["hello big", "world"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn renders_editor_terminal_and_status() {
        let mut app = app();
        let text = screen_text(&mut app);
        assert!(text.contains("EXPLORER"));
        assert!(text.contains("about.md"));
        assert!(text.contains("DONE compiled successfully"));
        assert!(text.contains("Terminal 1"));
    }

    #[test]
    fn empty_terminal_store_shows_call_to_action() {
        let mut app = app();
        user(&mut app.state, UserAction::CloseActiveTerminal);
        let text = screen_text(&mut app);
        assert!(text.contains("No terminals open"));
        assert!(text.contains("New Terminal"));
    }

    #[test]
    fn control_chords_route_to_layout_actions() {
        let mut app = app();
        let result = handle_key_event(key(KeyCode::Char('b'), KeyModifiers::CONTROL), &mut app.state);
        assert!(matches!(result, KeyHandlerResult::Continue(_)));
        assert!(!app.state.layout.show_sidebar);

        handle_key_event(key(KeyCode::Char('n'), KeyModifiers::CONTROL), &mut app.state);
        assert_eq!(app.state.terminal.len(), 2);

        assert!(matches!(
            handle_key_event(key(KeyCode::Char('q'), KeyModifiers::CONTROL), &mut app.state),
            KeyHandlerResult::Exit
        ));
    }

    #[test]
    fn typing_in_terminal_focus_runs_commands() {
        let mut app = app();
        for ch in "pwd".chars() {
            handle_key_event(key(KeyCode::Char(ch), KeyModifiers::NONE), &mut app.state);
        }
        handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE), &mut app.state);
        let session = app.state.terminal.active().expect("active");
        assert!(session
            .history
            .iter()
            .any(|line| line == "/home/visitor/portfolio"));
    }

    #[test]
    fn typing_with_another_panel_tab_runs_nothing() {
        let mut app = app();
        handle_key_event(key(KeyCode::BackTab, KeyModifiers::SHIFT), &mut app.state);
        assert_eq!(app.state.layout.panel_tab, PanelTab::DebugConsole);

        for ch in "clear".chars() {
            handle_key_event(key(KeyCode::Char(ch), KeyModifiers::NONE), &mut app.state);
        }
        handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE), &mut app.state);
        let session = app.state.terminal.active().expect("active");
        assert!(session.pending_input.is_empty());
        assert!(session.history.len() > 1);
    }

    #[test]
    fn status_bar_shows_branch_and_sync() {
        let mut app = app();
        handle_key_event(key(KeyCode::Char('g'), KeyModifiers::CONTROL), &mut app.state);
        let text = screen_text(&mut app);
        assert!(text.contains("dev*"));
        assert!(text.contains("Syncing..."));
    }

    #[test]
    fn paste_goes_to_focused_input() {
        let mut app = app();
        handle_paste("echo hi".to_string(), &mut app.state);
        assert_eq!(
            app.state.terminal.active().expect("active").pending_input,
            "echo hi"
        );
    }

    #[test]
    fn chat_failure_arrives_as_display_text() {
        let mut app = app();
        let (tx, rx) = mpsc::channel();
        user(&mut app.state, UserAction::ToggleChat);
        for ch in "hi".chars() {
            user(&mut app.state, UserAction::ChatInput(ch));
        }
        let effects = user(&mut app.state, UserAction::ChatSubmit);
        assert!(!apply_effects(&mut app, effects, &tx));

        let event = rx.recv_timeout(Duration::from_secs(5)).expect("chat event");
        let UiEvent::Chat(ChatEvent::Failed(text)) = event else {
            panic!("expected failure event");
        };
        assert_eq!(
            text,
            "❌ Network error. Please check your internet connection and try again."
        );
    }

    #[test]
    fn exit_effect_stops_the_loop() {
        let mut app = app();
        let (tx, _rx) = mpsc::channel();
        assert!(apply_effects(&mut app, vec![FolioEffect::Exit], &tx));
    }
}
