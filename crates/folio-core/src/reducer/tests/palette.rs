use super::*;
use pretty_assertions::assert_eq;

fn open_palette_with(state: &mut FolioState, query: &str) {
    run_user(state, UserAction::ToggleActionPalette);
    run_user(state, UserAction::OverlayQueryPaste(query.to_string()));
}

#[test]
fn toggle_action_palette_opens_and_closes_overlay() {
    let mut state = state();

    let effects = run_user(&mut state, UserAction::ToggleActionPalette);
    assert!(matches!(
        state.interaction.overlay,
        Overlay::ActionPalette { .. }
    ));
    assert!(matches!(effects.as_slice(), [FolioEffect::RequestFrame]));

    let effects = run_user(&mut state, UserAction::ToggleActionPalette);
    assert!(matches!(state.interaction.overlay, Overlay::None));
    assert!(matches!(effects.as_slice(), [FolioEffect::RequestFrame]));
}

#[test]
fn palette_new_terminal_uses_the_same_creation_path() {
    let mut state = state();
    run_user(&mut state, UserAction::ToggleTerminal);
    open_palette_with(&mut state, "new term");
    run_user(&mut state, UserAction::OverlaySubmit);

    assert_eq!(state.interaction.overlay, Overlay::None);
    assert!(state.layout.show_terminal);
    assert_eq!(state.terminal.len(), 2);
    assert_eq!(state.terminal.active_id(), Some(SessionId(2)));
}

#[test]
fn selection_wraps_within_filtered_items() {
    let mut state = state();
    open_palette_with(&mut state, "theme");
    run_user(&mut state, UserAction::OverlayMoveUp);
    match &state.interaction.overlay {
        Overlay::ActionPalette { selected, .. } => assert_eq!(*selected, 3),
        other => panic!("unexpected overlay: {other:?}"),
    }
    run_user(&mut state, UserAction::OverlayMoveDown);
    match &state.interaction.overlay {
        Overlay::ActionPalette { selected, .. } => assert_eq!(*selected, 0),
        other => panic!("unexpected overlay: {other:?}"),
    }
}

#[test]
fn theme_entry_sets_and_persists_theme() {
    let mut state = state();
    open_palette_with(&mut state, "monokai");
    let effects = run_user(&mut state, UserAction::OverlaySubmit);
    assert_eq!(state.customization.theme, UiTheme::Monokai);
    assert!(persisted(&effects).is_some());
}

#[test]
fn quit_entry_requests_exit() {
    let mut state = state();
    open_palette_with(&mut state, "quit");
    let effects = run_user(&mut state, UserAction::OverlaySubmit);
    assert!(effects.contains(&FolioEffect::Exit));
}

#[test]
fn submit_with_no_match_keeps_palette_open() {
    let mut state = state();
    open_palette_with(&mut state, "zzz");
    assert!(run_user(&mut state, UserAction::OverlaySubmit).is_empty());
    assert!(matches!(
        state.interaction.overlay,
        Overlay::ActionPalette { .. }
    ));
}
