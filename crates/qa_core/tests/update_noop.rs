use qa_core::{update, AppState, Mode, Msg};

#[test]
fn update_is_noop() {
    for mode in [Mode::Chat, Mode::Site] {
        let state = AppState::new(mode);
        let (next, effects) = update(state.clone(), Msg::NoOp);

        assert_eq!(state, next);
        assert!(effects.is_empty());
    }
}

#[test]
fn tick_is_quiet_when_idle() {
    let mut state = AppState::new(Mode::Chat);
    assert!(!state.consume_dirty());

    let (mut next, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(next.view().spinner_frame, 0);
}
