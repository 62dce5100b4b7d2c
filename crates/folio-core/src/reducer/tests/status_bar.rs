use std::time::Instant;

use super::*;
use crate::state::BRANCHES;
use crate::state::BRANCH_SYNC;
use crate::state::STARTUP_SYNC;
use pretty_assertions::assert_eq;

#[test]
fn startup_sync_finishes_after_its_duration() {
    let mut state = state();
    assert!(state.status.is_syncing());

    let t0 = Instant::now();
    run_runtime(&mut state, RuntimeAction::Tick(t0));
    assert!(state.status.is_syncing());

    let effects = run_runtime(&mut state, RuntimeAction::Tick(t0 + STARTUP_SYNC));
    assert!(!state.status.is_syncing());
    assert_eq!(effects, vec![FolioEffect::RequestFrame]);
}

#[test]
fn switching_branch_cycles_and_resyncs() {
    let mut state = state();
    let t0 = Instant::now();
    run_runtime(&mut state, RuntimeAction::Tick(t0));
    run_runtime(&mut state, RuntimeAction::Tick(t0 + STARTUP_SYNC));
    assert_eq!(state.status.branch, "main");

    run_user(&mut state, UserAction::ToggleActionPalette);
    run_user(&mut state, UserAction::OverlayQueryPaste("switch branch".to_string()));
    run_user(&mut state, UserAction::OverlaySubmit);
    assert_eq!(state.status.branch, "dev");
    assert!(state.status.is_syncing());

    let t1 = t0 + STARTUP_SYNC;
    run_runtime(&mut state, RuntimeAction::Tick(t1));
    run_runtime(&mut state, RuntimeAction::Tick(t1 + BRANCH_SYNC));
    assert!(!state.status.is_syncing());

    for _ in 0..BRANCHES.len() - 1 {
        run_user(&mut state, UserAction::CycleBranch);
    }
    assert_eq!(state.status.branch, "main");
}

#[test]
fn manual_sync_restarts_indicator() {
    let mut state = state();
    state.status.sync = None;
    run_user(&mut state, UserAction::SyncRepository);
    assert!(state.status.is_syncing());
}
