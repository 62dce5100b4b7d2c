pub(super) use super::reduce;
pub(super) use crate::actions::FolioAction;
pub(super) use crate::actions::RuntimeAction;
pub(super) use crate::actions::UserAction;
pub(super) use crate::config::Config;
pub(super) use crate::persistence::Preferences;
pub(super) use crate::reducer::FolioEffect;
pub(super) use crate::state::ChatRole;
pub(super) use crate::state::Focus;
pub(super) use crate::state::FolioState;
pub(super) use crate::state::NotificationKind;
pub(super) use crate::state::Overlay;
pub(super) use crate::state::UiTheme;
pub(super) use crate::terminal::SessionId;

mod editor_files;
mod layout_focus;
mod palette;
mod status_bar;

fn state() -> FolioState {
    FolioState::new(&Config::default(), &Preferences::default())
}

fn state_with_cap(max_sessions: usize) -> FolioState {
    let mut config = Config::default();
    config.terminal.max_sessions = Some(max_sessions);
    FolioState::new(&config, &Preferences::default())
}

fn run_user(state: &mut FolioState, action: UserAction) -> Vec<FolioEffect> {
    reduce(state, FolioAction::User(action))
}

fn run_runtime(state: &mut FolioState, action: RuntimeAction) -> Vec<FolioEffect> {
    reduce(state, FolioAction::Runtime(action))
}

fn type_terminal(state: &mut FolioState, line: &str) {
    for ch in line.chars() {
        run_user(state, UserAction::TerminalInput(ch));
    }
    run_user(state, UserAction::TerminalSubmit);
}

fn persisted(effects: &[FolioEffect]) -> Option<&Preferences> {
    effects.iter().find_map(|effect| match effect {
        FolioEffect::PersistPreferences(prefs) => Some(prefs),
        _ => None,
    })
}
