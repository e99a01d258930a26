use crate::composer::KeyCode;
use crate::outbound::SubmitOutcome;

/// Discrete input events a host forwards to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatEvent {
    ToggleChat,
    ShowNameForm,
    CancelNameForm,
    /// Rename button; the new name is read from the username input surface.
    CommitName,
    UsernameKeyDown(KeyCode),
    ComposerKeyDown(KeyCode),
    SubmitClicked,
    ComposerFocus,
    ComposerBlur,
}

/// Controller verdict for one event.
#[derive(Debug, Default)]
pub struct EventResponse {
    /// The host must suppress the event's built-in effect.
    pub prevent_default: bool,
    /// Set when the event reached the outbound pipeline.
    pub submitted: Option<SubmitOutcome>,
}

impl EventResponse {
    pub fn allow() -> Self {
        Self::default()
    }

    pub fn prevent() -> Self {
        Self {
            prevent_default: true,
            submitted: None,
        }
    }

    pub(crate) fn with_submission(mut self, outcome: SubmitOutcome) -> Self {
        self.submitted = Some(outcome);
        self
    }
}
