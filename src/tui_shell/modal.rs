use crossterm::event::KeyEvent;

mod draw;
mod keymap;

pub(super) use draw::draw_modal;
use keymap::{ModalAction, map_modal_key};

pub(super) fn handle_modal_key(app: &mut super::App, key: KeyEvent) {
    let action = {
        let Some(m) = app.modal_mut() else {
            return;
        };
        map_modal_key(m, key)
    };

    match action {
        ModalAction::None => {}
        ModalAction::Close => app.cancel_modal(),
        ModalAction::Confirm(pending) => {
            app.close_modal();
            app.run_pending_action(pending);
        }
        ModalAction::SubmitTextInput { action, value } => {
            app.close_modal();
            app.submit_text_input(action, value);
        }
        ModalAction::Choose { action, index } => {
            app.close_modal();
            app.submit_choice(action, index);
        }
    }
}
