use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::actions::TagChoice;
use crate::model::{ParticleId, Tag, TagId};
use crate::tui_shell::input::Input;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn text_modal(action: TextInputAction) -> Modal {
    Modal {
        title: "t".to_string(),
        lines: Vec::new(),
        scroll: 0,
        kind: ModalKind::TextInput {
            action,
            prompt: "> ".to_string(),
        },
        input: Input::default(),
    }
}

fn choice_modal(n: usize) -> Modal {
    let tag = Tag {
        id: TagId(1),
        name: "rust".to_string(),
        color: None,
        user_id: None,
    };
    Modal {
        title: "t".to_string(),
        lines: Vec::new(),
        scroll: 0,
        kind: ModalKind::Choice {
            action: ChoiceAction::Tag {
                particle: ParticleId("p-1".to_string()),
                choices: vec![TagChoice::Apply(tag); n],
            },
            options: (0..n).map(|i| format!("option {}", i)).collect(),
            selected: 0,
        },
        input: Input::default(),
    }
}

#[test]
fn optional_fields_submit_empty_but_required_ones_do_not() {
    let mut title = text_modal(TextInputAction::CreateTitle);
    match map_modal_key(&mut title, key(KeyCode::Enter)) {
        ModalAction::SubmitTextInput { value, .. } => assert_eq!(value, ""),
        _ => panic!("expected submit"),
    }

    let mut content = text_modal(TextInputAction::CreateContent);
    assert!(matches!(
        map_modal_key(&mut content, key(KeyCode::Enter)),
        ModalAction::None
    ));
    assert_eq!(content.lines, vec!["error: value required".to_string()]);
}

#[test]
fn passwords_are_not_trimmed_and_other_input_is() {
    let mut pw = text_modal(TextInputAction::LoginPassword);
    pw.input.set(" secret ".to_string());
    match map_modal_key(&mut pw, key(KeyCode::Enter)) {
        ModalAction::SubmitTextInput { value, .. } => assert_eq!(value, " secret "),
        _ => panic!("expected submit"),
    }

    let mut code = text_modal(TextInputAction::OtpCode);
    code.input.set(" 123456 ".to_string());
    match map_modal_key(&mut code, key(KeyCode::Enter)) {
        ModalAction::SubmitTextInput { value, .. } => assert_eq!(value, "123456"),
        _ => panic!("expected submit"),
    }
}

#[test]
fn repeated_errors_replace_each_other() {
    let mut m = text_modal(TextInputAction::OtpEmail);
    m.input.set("nope".to_string());
    map_modal_key(&mut m, key(KeyCode::Enter));
    map_modal_key(&mut m, key(KeyCode::Enter));
    assert_eq!(m.lines.len(), 1);
}

#[test]
fn choice_moves_within_bounds_and_digits_pick_directly() {
    let mut m = choice_modal(2);
    map_modal_key(&mut m, key(KeyCode::Up));
    map_modal_key(&mut m, key(KeyCode::Down));
    map_modal_key(&mut m, key(KeyCode::Down));
    match map_modal_key(&mut m, key(KeyCode::Enter)) {
        ModalAction::Choose { index, .. } => assert_eq!(index, 1),
        _ => panic!("expected choice"),
    }

    let mut m = choice_modal(3);
    match map_modal_key(&mut m, key(KeyCode::Char('3'))) {
        ModalAction::Choose { index, .. } => assert_eq!(index, 2),
        _ => panic!("expected choice"),
    }
    assert!(matches!(
        map_modal_key(&mut m, key(KeyCode::Char('9'))),
        ModalAction::None
    ));
}

#[test]
fn confirm_accepts_enter_or_y() {
    let mut m = Modal {
        title: "Logout".to_string(),
        lines: vec!["sure?".to_string()],
        scroll: 0,
        kind: ModalKind::ConfirmAction {
            action: PendingAction::Logout,
        },
        input: Input::default(),
    };
    assert!(matches!(
        map_modal_key(&mut m, key(KeyCode::Char('y'))),
        ModalAction::Confirm(PendingAction::Logout)
    ));
    assert!(matches!(
        map_modal_key(&mut m, key(KeyCode::Esc)),
        ModalAction::Close
    ));
}
