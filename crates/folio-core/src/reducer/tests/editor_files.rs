use super::*;
use pretty_assertions::assert_eq;

#[test]
fn opening_a_file_persists_preferences() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::OpenFile("skills.ts".to_string()));
    let prefs = persisted(&effects).expect("persist effect");
    assert_eq!(prefs.active_file_id.as_deref(), Some("skills.ts"));
    assert_eq!(
        prefs.open_files,
        vec!["about.md".to_string(), "skills.ts".to_string()]
    );
}

#[test]
fn unknown_file_is_ignored() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::OpenFile("nope.md".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.editor.active_file.as_deref(), Some("about.md"));
}

#[test]
fn close_active_falls_back_to_last_open() {
    let mut state = state();
    run_user(&mut state, UserAction::OpenFile("projects.json".to_string()));
    run_user(&mut state, UserAction::OpenFile("experience.log".to_string()));
    run_user(&mut state, UserAction::OpenFile("about.md".to_string()));

    let effects = run_user(&mut state, UserAction::CloseActiveFile);
    assert!(persisted(&effects).is_some());
    assert_eq!(state.editor.active_file.as_deref(), Some("experience.log"));
}

#[test]
fn closing_last_file_leaves_no_active_file() {
    let mut state = state();
    run_user(&mut state, UserAction::CloseActiveFile);
    assert_eq!(state.editor.active_file, None);
    assert!(run_user(&mut state, UserAction::CloseActiveFile).is_empty());
}

#[test]
fn explorer_wraps_and_opens_selection() {
    let mut state = state();
    run_user(&mut state, UserAction::ExplorerMoveUp);
    assert_eq!(state.editor.explorer_selected, crate::files::FILES.len() - 1);
    run_user(&mut state, UserAction::ExplorerMoveDown);
    run_user(&mut state, UserAction::ExplorerMoveDown);
    run_user(&mut state, UserAction::ExplorerOpenSelected);
    assert_eq!(state.editor.active_file.as_deref(), Some("projects.json"));
    assert_eq!(state.interaction.focus, Focus::Editor);
}

#[test]
fn copy_emits_clipboard_effect_with_file_content() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::CopyActiveFile);
    match effects.as_slice() {
        [FolioEffect::CopyToClipboard { text, label }] => {
            assert_eq!(label, "about.md");
            assert!(text.starts_with("# "));
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn copy_without_file_notifies() {
    let mut state = state();
    run_user(&mut state, UserAction::CloseActiveFile);
    run_user(&mut state, UserAction::CopyActiveFile);
    assert_eq!(
        state.interaction.notification.as_ref().map(|n| n.kind),
        Some(NotificationKind::Info)
    );
}

#[test]
fn preview_toggle_applies_to_active_file() {
    let mut state = state();
    run_user(&mut state, UserAction::OpenFile("projects.json".to_string()));
    assert!(state.editor.is_previewing("projects.json"));
    run_user(&mut state, UserAction::TogglePreview);
    assert!(!state.editor.is_previewing("projects.json"));

    run_user(&mut state, UserAction::OpenFile("skills.ts".to_string()));
    assert!(run_user(&mut state, UserAction::TogglePreview).is_empty());
}

#[test]
fn theme_change_is_persisted_once() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::SetTheme(UiTheme::Monokai));
    assert_eq!(
        persisted(&effects).map(|prefs| prefs.theme),
        Some(UiTheme::Monokai)
    );

    let effects = run_user(&mut state, UserAction::SetTheme(UiTheme::Monokai));
    assert!(persisted(&effects).is_none());
}
