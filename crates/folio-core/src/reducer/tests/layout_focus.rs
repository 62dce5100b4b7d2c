use super::*;
use crate::state::PanelTab;
use crate::state::TERMINAL_MAX_HEIGHT;
use crate::state::TERMINAL_MIN_HEIGHT;
use pretty_assertions::assert_eq;

#[test]
fn hiding_focused_pane_moves_focus_to_editor() {
    let mut state = state();
    run_user(&mut state, UserAction::SetFocus(Focus::Explorer));
    run_user(&mut state, UserAction::ToggleSidebar);
    assert!(!state.layout.show_sidebar);
    assert_eq!(state.interaction.focus, Focus::Editor);
}

#[test]
fn focus_cycle_skips_hidden_panes() {
    let mut state = state();
    assert_eq!(state.interaction.focus, Focus::Terminal);
    run_user(&mut state, UserAction::CycleFocus);
    assert_eq!(state.interaction.focus, Focus::Explorer);
    run_user(&mut state, UserAction::CycleFocus);
    assert_eq!(state.interaction.focus, Focus::Editor);
    run_user(&mut state, UserAction::CycleFocus);
    assert_eq!(state.interaction.focus, Focus::Terminal);
}

#[test]
fn set_focus_on_hidden_pane_is_ignored() {
    let mut state = state();
    run_user(&mut state, UserAction::SetFocus(Focus::Chat));
    assert_eq!(state.interaction.focus, Focus::Terminal);
}

#[test]
fn maximize_reopens_hidden_terminal() {
    let mut state = state();
    run_user(&mut state, UserAction::ToggleTerminal);
    run_user(&mut state, UserAction::ToggleTerminalMaximized);
    assert!(state.layout.show_terminal);
    assert!(state.layout.terminal_maximized);

    run_user(&mut state, UserAction::ToggleTerminal);
    assert!(!state.layout.terminal_maximized);
}

#[test]
fn terminal_height_is_clamped() {
    let mut state = state();
    run_user(&mut state, UserAction::ResizeTerminal(-100));
    assert_eq!(state.layout.terminal_height, TERMINAL_MIN_HEIGHT);
    run_user(&mut state, UserAction::ResizeTerminal(i16::MAX));
    assert_eq!(state.layout.terminal_height, TERMINAL_MAX_HEIGHT);
}

#[test]
fn panel_tabs_cycle() {
    let mut state = state();
    assert_eq!(state.layout.panel_tab, PanelTab::Terminal);
    run_user(&mut state, UserAction::NextPanelTab);
    assert_eq!(state.layout.panel_tab, PanelTab::DebugConsole);
    run_user(&mut state, UserAction::NextPanelTab);
    assert_eq!(state.layout.panel_tab, PanelTab::Problems);
}
