use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dashboard_core::{Msg, Screen};

/// What a key press means, before UI-local state (selection, input buffer) is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Dispatch(Msg),
    Quit,
    SelectPrevious,
    SelectNext,
    TestSelected,
    BeginTemplateEdit,
    InputChar(char),
    InputBackspace,
    CommitTemplate,
    CancelEdit,
    Ignore,
}

pub fn map_key(screen: Screen, editing: bool, key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    if editing {
        return match key.code {
            KeyCode::Enter => KeyAction::CommitTemplate,
            KeyCode::Esc => KeyAction::CancelEdit,
            KeyCode::Backspace => KeyAction::InputBackspace,
            KeyCode::Char(c) => KeyAction::InputChar(c),
            _ => KeyAction::Ignore,
        };
    }

    match (screen, key.code) {
        (_, KeyCode::Char('q')) => KeyAction::Quit,
        (Screen::Run, KeyCode::Tab) => KeyAction::Dispatch(Msg::Navigate(Screen::Integrations)),
        (Screen::Integrations, KeyCode::Tab) => KeyAction::Dispatch(Msg::Navigate(Screen::Run)),
        (Screen::Run, KeyCode::Char('r') | KeyCode::Enter) => KeyAction::Dispatch(Msg::RunClicked),
        (Screen::Run, KeyCode::Char('t')) => KeyAction::BeginTemplateEdit,
        (Screen::Run, KeyCode::Char('i')) => {
            KeyAction::Dispatch(Msg::Navigate(Screen::Integrations))
        }
        (Screen::Integrations, KeyCode::Up | KeyCode::Char('k')) => KeyAction::SelectPrevious,
        (Screen::Integrations, KeyCode::Down | KeyCode::Char('j')) => KeyAction::SelectNext,
        (Screen::Integrations, KeyCode::Enter | KeyCode::Char('t')) => KeyAction::TestSelected,
        (Screen::Integrations, KeyCode::Char('a') | KeyCode::Esc) => {
            KeyAction::Dispatch(Msg::Navigate(Screen::Run))
        }
        _ => KeyAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn run_screen_bindings() {
        assert_eq!(
            map_key(Screen::Run, false, press(KeyCode::Char('r'))),
            KeyAction::Dispatch(Msg::RunClicked)
        );
        assert_eq!(
            map_key(Screen::Run, false, press(KeyCode::Enter)),
            KeyAction::Dispatch(Msg::RunClicked)
        );
        assert_eq!(
            map_key(Screen::Run, false, press(KeyCode::Char('t'))),
            KeyAction::BeginTemplateEdit
        );
        assert_eq!(
            map_key(Screen::Run, false, press(KeyCode::Char('i'))),
            KeyAction::Dispatch(Msg::Navigate(Screen::Integrations))
        );
        assert_eq!(
            map_key(Screen::Run, false, press(KeyCode::Char('j'))),
            KeyAction::Ignore
        );
    }

    #[test]
    fn integrations_bindings() {
        assert_eq!(
            map_key(Screen::Integrations, false, press(KeyCode::Down)),
            KeyAction::SelectNext
        );
        assert_eq!(
            map_key(Screen::Integrations, false, press(KeyCode::Char('k'))),
            KeyAction::SelectPrevious
        );
        assert_eq!(
            map_key(Screen::Integrations, false, press(KeyCode::Enter)),
            KeyAction::TestSelected
        );
        assert_eq!(
            map_key(Screen::Integrations, false, press(KeyCode::Esc)),
            KeyAction::Dispatch(Msg::Navigate(Screen::Run))
        );
        assert_eq!(
            map_key(Screen::Integrations, false, press(KeyCode::Char('r'))),
            KeyAction::Ignore
        );
    }

    #[test]
    fn editing_captures_text_keys() {
        assert_eq!(
            map_key(Screen::Run, true, press(KeyCode::Char('q'))),
            KeyAction::InputChar('q')
        );
        assert_eq!(
            map_key(Screen::Run, true, press(KeyCode::Enter)),
            KeyAction::CommitTemplate
        );
        assert_eq!(
            map_key(Screen::Run, true, press(KeyCode::Esc)),
            KeyAction::CancelEdit
        );
        assert_eq!(
            map_key(Screen::Run, true, press(KeyCode::Tab)),
            KeyAction::Ignore
        );
    }

    #[test]
    fn ctrl_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(Screen::Run, true, ctrl_c), KeyAction::Quit);
        assert_eq!(map_key(Screen::Integrations, false, ctrl_c), KeyAction::Quit);
        assert_eq!(
            map_key(Screen::Run, false, press(KeyCode::Char('q'))),
            KeyAction::Quit
        );
    }
}
