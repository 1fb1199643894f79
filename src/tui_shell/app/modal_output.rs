use super::*;

impl App {
    pub(super) fn open_modal(&mut self, title: impl Into<String>, lines: Vec<String>) {
        self.modal = Some(Modal {
            title: title.into(),
            lines,
            scroll: 0,
            kind: ModalKind::Viewer,
            input: Input::default(),
        });
    }

    pub(super) fn open_confirm_modal(
        &mut self,
        prompt: &crate::host::ConfirmPrompt,
        action: PendingAction,
    ) {
        self.modal = Some(Modal {
            title: prompt.title.clone(),
            lines: vec![
                prompt.message.clone(),
                String::new(),
                format!("Enter to {}; Esc to cancel.", prompt.primary.to_lowercase()),
            ],
            scroll: 0,
            kind: ModalKind::ConfirmAction { action },
            input: Input::default(),
        });
    }

    pub(in crate::tui_shell) fn open_text_input_modal(
        &mut self,
        title: impl Into<String>,
        prompt: impl Into<String>,
        action: TextInputAction,
        initial: Option<String>,
        mut lines: Vec<String>,
    ) {
        lines.push(String::new());
        lines.push("Enter to continue; Esc to cancel.".to_string());

        let mut input = Input {
            secret: matches!(action, TextInputAction::LoginPassword),
            ..Input::default()
        };
        if let Some(s) = initial {
            input.set(s);
        }

        self.modal = Some(Modal {
            title: title.into(),
            lines,
            scroll: 0,
            kind: ModalKind::TextInput {
                action,
                prompt: prompt.into(),
            },
            input,
        });
    }

    pub(in crate::tui_shell) fn open_choice_modal(
        &mut self,
        title: impl Into<String>,
        action: ChoiceAction,
        options: Vec<String>,
        lines: Vec<String>,
    ) {
        self.modal = Some(Modal {
            title: title.into(),
            lines,
            scroll: 0,
            kind: ModalKind::Choice {
                action,
                options,
                selected: 0,
            },
            input: Input::default(),
        });
    }

    pub(in crate::tui_shell) fn modal_mut(&mut self) -> Option<&mut Modal> {
        self.modal.as_mut()
    }

    pub(in crate::tui_shell) fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Drops any half-finished wizard along with the modal.
    pub(in crate::tui_shell) fn cancel_modal(&mut self) {
        self.modal = None;
        self.create_wizard = None;
        self.login_wizard = None;
    }
}
