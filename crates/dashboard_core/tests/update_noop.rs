use dashboard_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn noop_does_not_request_a_redraw() {
    let (mut next, _) = update(AppState::new(), Msg::NoOp);
    assert!(!next.consume_dirty());

    let (mut next, _) = update(next, Msg::RunClicked);
    assert!(next.consume_dirty());
    let (mut next, _) = update(next, Msg::NoOp);
    assert!(!next.consume_dirty());
}
