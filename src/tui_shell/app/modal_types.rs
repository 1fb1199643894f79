use crate::actions::TagChoice;
use crate::model::{ParticleId, ParticleKind};

use super::Input;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum PendingAction {
    Destroy(ParticleId),
    Logout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum TextInputAction {
    TagName { particle: ParticleId },

    LoginEmail,
    LoginPassword,
    OtpEmail,
    OtpCode,
    OAuthCode,

    CreateContent,
    CreateTitle,
    CreateDescription,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum ChoiceAction {
    Tag {
        particle: ParticleId,
        choices: Vec<TagChoice>,
    },
    CreateKind { kinds: Vec<ParticleKind> },
    CreatePublic,
}

#[derive(Clone, Debug)]
pub(in crate::tui_shell) enum ModalKind {
    Viewer,
    ConfirmAction {
        action: PendingAction,
    },
    TextInput {
        action: TextInputAction,
        prompt: String,
    },
    Choice {
        action: ChoiceAction,
        options: Vec<String>,
        selected: usize,
    },
}

#[derive(Clone, Debug)]
pub(in crate::tui_shell) struct Modal {
    pub(in crate::tui_shell) title: String,
    pub(in crate::tui_shell) lines: Vec<String>,
    pub(in crate::tui_shell) scroll: usize,
    pub(in crate::tui_shell) kind: ModalKind,
    pub(in crate::tui_shell) input: Input,
}
