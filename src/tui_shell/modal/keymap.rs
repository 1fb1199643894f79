use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::{ChoiceAction, Modal, ModalKind, PendingAction, TextInputAction};

pub(super) enum ModalAction {
    None,
    Close,
    Confirm(PendingAction),
    SubmitTextInput {
        action: TextInputAction,
        value: String,
    },
    Choose {
        action: ChoiceAction,
        index: usize,
    },
}

fn allow_empty_text_input(action: &TextInputAction) -> bool {
    matches!(
        action,
        TextInputAction::TagName { .. }
            | TextInputAction::CreateTitle
            | TextInputAction::CreateDescription
    )
}

fn validate_text_input(action: &TextInputAction, raw: &str) -> Result<(), String> {
    match action {
        TextInputAction::LoginEmail | TextInputAction::OtpEmail => {
            if raw.contains('@') && !raw.contains(char::is_whitespace) {
                Ok(())
            } else {
                Err("enter an email address".to_string())
            }
        }
        TextInputAction::OtpCode => {
            if raw.chars().all(|c| c.is_ascii_alphanumeric()) {
                Ok(())
            } else {
                Err("the code is letters and digits only".to_string())
            }
        }
        _ => Ok(()),
    }
}

pub(super) fn map_modal_key(modal: &mut Modal, key: KeyEvent) -> ModalAction {
    match &mut modal.kind {
        ModalKind::Viewer => handle_viewer_like_key(modal, key),

        ModalKind::TextInput { action, .. } => match key.code {
            KeyCode::Esc => ModalAction::Close,
            KeyCode::Enter => {
                // Passwords are taken verbatim.
                let raw = if matches!(action, TextInputAction::LoginPassword) {
                    modal.input.buf.clone()
                } else {
                    modal.input.buf.trim().to_string()
                };
                if raw.is_empty() && !allow_empty_text_input(action) {
                    append_modal_error(modal, "value required".to_string());
                    return ModalAction::None;
                }

                match validate_text_input(action, &raw) {
                    Ok(()) => ModalAction::SubmitTextInput {
                        action: action.clone(),
                        value: raw,
                    },
                    Err(msg) => {
                        append_modal_error(modal, msg);
                        ModalAction::None
                    }
                }
            }
            _ => {
                apply_input_edit_key(modal, key);
                ModalAction::None
            }
        },

        ModalKind::ConfirmAction { action } => match key.code {
            KeyCode::Esc => ModalAction::Close,
            KeyCode::Enter | KeyCode::Char('y') => ModalAction::Confirm(action.clone()),
            KeyCode::Char('n') => ModalAction::Close,
            _ => handle_viewer_like_key(modal, key),
        },

        ModalKind::Choice {
            action,
            options,
            selected,
        } => match key.code {
            KeyCode::Esc => ModalAction::Close,
            KeyCode::Up => {
                *selected = selected.saturating_sub(1);
                ModalAction::None
            }
            KeyCode::Down => {
                if *selected + 1 < options.len() {
                    *selected += 1;
                }
                ModalAction::None
            }
            KeyCode::Enter if !options.is_empty() => ModalAction::Choose {
                action: action.clone(),
                index: (*selected).min(options.len() - 1),
            },
            KeyCode::Char(c) => match c.to_digit(10) {
                Some(n) if n >= 1 && (n as usize) <= options.len() => ModalAction::Choose {
                    action: action.clone(),
                    index: n as usize - 1,
                },
                _ => ModalAction::None,
            },
            _ => ModalAction::None,
        },
    }
}

fn handle_viewer_like_key(modal: &mut Modal, key: KeyEvent) -> ModalAction {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => ModalAction::Close,
        KeyCode::Up => {
            modal.scroll = modal.scroll.saturating_sub(1);
            ModalAction::None
        }
        KeyCode::Down => {
            if modal.scroll < modal.lines.len().saturating_sub(1) {
                modal.scroll += 1;
            }
            ModalAction::None
        }
        KeyCode::PageUp => {
            modal.scroll = modal.scroll.saturating_sub(10);
            ModalAction::None
        }
        KeyCode::PageDown => {
            modal.scroll = (modal.scroll + 10).min(modal.lines.len().saturating_sub(1));
            ModalAction::None
        }
        _ => ModalAction::None,
    }
}

fn apply_input_edit_key(modal: &mut Modal, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => modal.input.backspace(),
        KeyCode::Delete => modal.input.delete(),
        KeyCode::Left => modal.input.move_left(),
        KeyCode::Right => modal.input.move_right(),
        KeyCode::Home => modal.input.home(),
        KeyCode::End => modal.input.end(),
        KeyCode::Char(c) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT)
            {
                modal.input.insert_char(c);
            }
        }
        _ => {}
    }
}

fn append_modal_error(modal: &mut Modal, msg: String) {
    modal.lines.retain(|l| !l.starts_with("error:"));
    modal.lines.push(format!("error: {}", msg));
}

#[cfg(test)]
#[path = "../../tests/tui_shell/modal_keymap_tests.rs"]
mod tests;
