use crate::config::ComposerLimits;

/// DOM-style `keyCode` of a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACKSPACE: Self = Self(8);
    pub const ENTER: Self = Self(13);
    pub const SHIFT: Self = Self(16);
    pub const CTRL: Self = Self(17);
    pub const ALT: Self = Self(18);
    pub const ESCAPE: Self = Self(27);
    pub const SPACE: Self = Self(32);
    pub const ARROW_LEFT: Self = Self(37);
    pub const ARROW_UP: Self = Self(38);
    pub const ARROW_RIGHT: Self = Self(39);
    pub const ARROW_DOWN: Self = Self(40);
    pub const DELETE: Self = Self(46);
    pub const META: Self = Self(91);
    /// Keys with no legacy code (most punctuation and non-ASCII input).
    pub const UNIDENTIFIED: Self = Self(0);

    /// Keys that still work when the composer is full.
    pub const PASS_THROUGH: [Self; 10] = [
        Self::ARROW_LEFT,
        Self::ARROW_UP,
        Self::ARROW_RIGHT,
        Self::ARROW_DOWN,
        Self::SHIFT,
        Self::META,
        Self::CTRL,
        Self::ALT,
        Self::DELETE,
        Self::BACKSPACE,
    ];

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Code a keyboard reports for a typed character.
    pub fn for_char(character: char) -> Self {
        match character {
            'a'..='z' | 'A'..='Z' | '0'..='9' => Self(character.to_ascii_uppercase() as u32),
            ' ' => Self::SPACE,
            '\n' => Self::ENTER,
            _ => Self::UNIDENTIFIED,
        }
    }

    pub fn is_pass_through(self) -> bool {
        Self::PASS_THROUGH.contains(&self)
    }

    /// Only Shift and Ctrl arm a soft newline; Alt does not.
    pub fn arms_soft_newline(self) -> bool {
        self == Self::SHIFT || self == Self::CTRL
    }
}

/// Interpretation state between two keydown events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComposerState {
    #[default]
    Idle,
    /// A modifier was the previous key; the next Enter inserts a line break.
    ModifierArmed,
}

/// What the host should do with the keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    /// Hand the trimmed composer text to the outbound pipeline.
    Submit(String),
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningUpdate {
    Unchanged,
    Show(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDecision {
    pub action: ComposerAction,
    /// Suppress the browser's built-in effect (newline or character insert).
    pub prevent_default: bool,
    pub warning: WarningUpdate,
}

impl KeyDecision {
    fn submit(text: &str) -> Self {
        Self {
            action: ComposerAction::Submit(text.to_string()),
            prevent_default: true,
            warning: WarningUpdate::Unchanged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Composer {
    state: ComposerState,
    limits: ComposerLimits,
}

impl Composer {
    pub fn new(limits: ComposerLimits) -> Self {
        Self {
            state: ComposerState::Idle,
            limits,
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    pub fn limits(&self) -> ComposerLimits {
        self.limits
    }

    pub fn reset(&mut self) {
        self.transition(ComposerState::Idle);
    }

    /// Characters left before the limit; negative once over it.
    pub fn chars_left(&self, current_value: &str) -> i64 {
        self.limits.max_message_length as i64 - current_value.trim().chars().count() as i64
    }

    /// Interprets one keydown against the composer text as it was before
    /// the key took effect.
    pub fn handle_keydown(&mut self, key: KeyCode, current_value: &str) -> KeyDecision {
        let current = current_value.trim();
        let chars_left = self.chars_left(current);

        if key == KeyCode::ENTER {
            match self.state {
                ComposerState::Idle => return KeyDecision::submit(current),
                ComposerState::ModifierArmed => self.transition(ComposerState::Idle),
            }
        } else {
            self.transition(ComposerState::Idle);
        }

        if key.arms_soft_newline() {
            self.transition(ComposerState::ModifierArmed);
        }

        if chars_left <= self.limits.warn_threshold as i64 {
            KeyDecision {
                action: ComposerAction::Continue,
                prevent_default: chars_left <= 0 && !key.is_pass_through(),
                warning: WarningUpdate::Show(format!("{chars_left} chars left")),
            }
        } else {
            KeyDecision {
                action: ComposerAction::Continue,
                prevent_default: false,
                warning: WarningUpdate::Clear,
            }
        }
    }

    fn transition(&mut self, next: ComposerState) {
        if self.state != next {
            tracing::trace!(from = ?self.state, to = ?next, "composer transition");
        }
        self.state = next;
    }
}
