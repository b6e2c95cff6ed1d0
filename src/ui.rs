//! Character selection and the win/loss modal
//!
//! Pure UI state; the browser host mirrors it into the DOM.

use crate::sim::{Outcome, Sprite};

/// Characters offered on the selection screen
pub const CHARACTERS: [Sprite; 4] = [
    Sprite::CharBoy,
    Sprite::CharCatGirl,
    Sprite::CharHornGirl,
    Sprite::CharPinkGirl,
];

/// Text shown in the modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: &'static str,
    pub status: &'static str,
    pub score: u32,
}

impl ModalContent {
    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won { score, .. } => Self {
                title: "Congratulations",
                status: "won",
                score,
            },
            Outcome::Lost { score } => Self {
                title: "Game Over",
                status: "lost",
                score,
            },
        }
    }
}

/// What the player clicked in the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Reset the game and close
    PlayAgain,
    Close,
}

/// Opens the modal a short delay after a win or loss
#[derive(Debug, Clone, Default)]
pub struct ModalController {
    delay: f32,
    pending: Option<(f32, ModalContent)>,
    visible: Option<ModalContent>,
}

impl ModalController {
    pub fn new(delay: f32) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Queue the modal for `outcome`; a newer outcome replaces a queued one
    pub fn notify(&mut self, outcome: Outcome) {
        self.pending = Some((self.delay, ModalContent::for_outcome(outcome)));
    }

    /// Count down a queued modal. Returns the content when it opens.
    pub fn advance(&mut self, dt: f32) -> Option<&ModalContent> {
        let (remaining, _) = self.pending.as_mut()?;
        *remaining -= dt;
        if *remaining > 0.0 {
            return None;
        }
        let (_, content) = self.pending.take()?;
        self.visible = Some(content);
        self.visible.as_ref()
    }

    pub fn visible(&self) -> Option<&ModalContent> {
        self.visible.as_ref()
    }

    /// Hide the modal. Returns true if the game should reset.
    pub fn act(&mut self, action: ModalAction) -> bool {
        self.visible = None;
        action == ModalAction::PlayAgain
    }
}
