use crate::{AppState, Effect, Msg, Screen};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(screen) => {
            if state.screen() == screen {
                return (state, Vec::new());
            }
            // Leaving the Run screen tears its poll down with it.
            let effects = state
                .polling_attempt()
                .map(|attempt| Effect::StopPolling { attempt })
                .into_iter()
                .collect();
            state.navigate(screen);
            effects
        }
        Msg::TemplatePicked(raw) => {
            if state.screen() != Screen::Run {
                return (state, Vec::new());
            }
            state.pick_template(&raw);
            Vec::new()
        }
        Msg::RunClicked => {
            if state.screen() != Screen::Run || state.run_status().is_busy() {
                return (state, Vec::new());
            }
            let attempt = state.begin_run();
            let template = state.template().map(ToOwned::to_owned);
            vec![
                Effect::StartPolling { attempt },
                Effect::SubmitRun { attempt, template },
            ]
        }
        Msg::StatusPolled {
            attempt,
            status,
            step,
            error,
        } => {
            if !state.is_polling(attempt) {
                return (state, Vec::new());
            }
            state.apply_polled(status, step, error);
            if status.is_terminal() {
                vec![Effect::StopPolling { attempt }]
            } else {
                Vec::new()
            }
        }
        Msg::RunFinished { attempt, outcome } => {
            if state.current_attempt() != Some(attempt) {
                return (state, Vec::new());
            }
            state.finish_run(outcome);
            vec![Effect::StopPolling { attempt }]
        }
        Msg::TestClicked(service) => {
            if state.screen() != Screen::Integrations || state.testing() == Some(service) {
                return (state, Vec::new());
            }
            state.begin_test(service);
            vec![Effect::TestConnection {
                page: state.page(),
                service,
            }]
        }
        Msg::TestCompleted {
            page,
            service,
            result,
        } => {
            if page != state.page() {
                return (state, Vec::new());
            }
            state.complete_test(service, result);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
