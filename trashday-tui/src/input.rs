use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.trash_day_for_address`(...) for the typed address
    LookupAddress,
    /// Run `service.trash_day_at`(...) for the configured location
    LookupLocation,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Enter, Esc, Left, Tab};

    // Global quit shortcut
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::AddressEntry => match key.code {
            Char(character)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                app.address_input.push(character);
            }
            Backspace => {
                app.address_input.pop();
            }
            Enter => {
                action = Action::LookupAddress;
            }
            Tab => {
                action = Action::LookupLocation;
            }
            Esc => {
                action = Action::Quit;
            }
            _ => {}
        },

        Screen::Report => match key.code {
            Left | Esc | Char('b') => {
                app.screen = Screen::AddressEntry;
            }
            Char('l') => {
                action = Action::LookupLocation;
            }
            Char('q') => {
                action = Action::Quit;
            }
            _ => {}
        },
    }
    action
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyEvent;
    use trashday_core::{plugin::PluginRegistry, service::TrashDayService};

    use super::*;

    fn app() -> App {
        let service = TrashDayService::new(Arc::new(PluginRegistry::new(Vec::new())));
        App::new(Arc::new(service), None, None)
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    #[test]
    fn typing_edits_the_address() {
        let mut app = app();
        for character in "12 Main".chars() {
            press(&mut app, KeyCode::Char(character));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.address_input, "12 Mai", "typed text");
        let enter = press(&mut app, KeyCode::Enter);
        assert!(matches!(enter, Action::LookupAddress), "enter");
        let tab = press(&mut app, KeyCode::Tab);
        assert!(matches!(tab, Action::LookupLocation), "tab");
    }

    #[test]
    fn q_is_text_on_the_entry_screen() {
        let mut app = app();
        let typed = press(&mut app, KeyCode::Char('q'));
        assert!(matches!(typed, Action::None), "q types");
        assert_eq!(app.address_input, "q", "q was typed");
    }

    #[test]
    fn report_screen_navigation() {
        let mut app = app();
        app.screen = Screen::Report;
        let location = press(&mut app, KeyCode::Char('l'));
        assert!(matches!(location, Action::LookupLocation), "l");
        let quit = press(&mut app, KeyCode::Char('q'));
        assert!(matches!(quit, Action::Quit), "q quits");
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.screen, Screen::AddressEntry), "esc goes back");
    }

    #[test]
    fn modified_characters_are_not_typed() {
        let mut app = app();
        let alt = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        let action = handle_key_event(alt, &mut app);
        assert!(matches!(action, Action::None), "alt-x");
        let ctrl = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        let action = handle_key_event(ctrl, &mut app);
        assert!(matches!(action, Action::None), "ctrl-a");
        assert!(app.address_input.is_empty(), "nothing typed");
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let mut app = app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let action = handle_key_event(key, &mut app);
        assert!(matches!(action, Action::Quit), "ctrl-c");
        assert!(app.address_input.is_empty(), "nothing typed");
    }
}
