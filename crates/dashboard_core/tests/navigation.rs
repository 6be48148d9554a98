use dashboard_core::{update, AppState, Effect, Msg, RunStatus, Screen, ServiceKey, TestResult};

#[test]
fn leaving_run_screen_stops_the_active_poll() {
    let (state, _) = update(AppState::new(), Msg::RunClicked);
    let attempt = state.current_attempt().unwrap();

    let (state, effects) = update(state, Msg::Navigate(Screen::Integrations));

    assert_eq!(effects, vec![Effect::StopPolling { attempt }]);
    assert_eq!(state.screen(), Screen::Integrations);
    assert_eq!(state.current_attempt(), None);
    assert_eq!(state.run_status(), RunStatus::Idle);
}

#[test]
fn returning_to_run_screen_starts_fresh() {
    let (state, _) = update(AppState::new(), Msg::TemplatePicked("template.md".into()));
    let (state, _) = update(state, Msg::RunClicked);
    let attempt = state.current_attempt().unwrap();

    let (state, _) = update(state, Msg::Navigate(Screen::Integrations));
    let (state, effects) = update(state, Msg::Navigate(Screen::Run));
    assert!(effects.is_empty());

    let view = state.view().run;
    assert_eq!(view.badge.text, "Never Run");
    assert_eq!(view.template, None);

    // Late completion of the discarded attempt is dropped.
    let (state, effects) = update(
        state,
        Msg::RunFinished {
            attempt,
            outcome: dashboard_core::RunOutcome::Failed {
                message: "late".into(),
            },
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.run_status(), RunStatus::Idle);

    // Attempt ids keep increasing across pages.
    let (state, _) = update(state, Msg::RunClicked);
    assert_eq!(state.current_attempt(), Some(attempt + 1));
}

#[test]
fn navigating_to_same_screen_is_noop() {
    let (mut state, _) = update(AppState::new(), Msg::RunClicked);
    assert!(state.consume_dirty());
    let before = state.clone();

    let (state, effects) = update(state, Msg::Navigate(Screen::Run));
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn test_results_do_not_survive_navigation() {
    let (state, _) = update(AppState::new(), Msg::Navigate(Screen::Integrations));
    let old_page = state.page();
    let (state, _) = update(state, Msg::TestClicked(ServiceKey::Luma));

    let (state, _) = update(state, Msg::Navigate(Screen::Run));
    let (state, _) = update(state, Msg::Navigate(Screen::Integrations));
    assert_ne!(state.page(), old_page);

    let (state, _) = update(
        state,
        Msg::TestCompleted {
            page: old_page,
            service: ServiceKey::Luma,
            result: Some(TestResult {
                ok: true,
                message: "Connected".into(),
            }),
        },
    );
    assert_eq!(state.test_result(ServiceKey::Luma), None);
    assert_eq!(state.testing(), None);
}
