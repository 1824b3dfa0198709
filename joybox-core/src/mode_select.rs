//! Runtime mode selection from held button combinations.

use joybox_proto::{InputField, InputState};

use crate::modes::ModeKind;

/// What a recognised combination asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeAction {
    /// Replace the primary backend's game mode.
    SetMode(ModeKind),
    /// Start sending keyboard reports (USB only).
    KeyboardOn,
    /// Stop sending keyboard reports.
    KeyboardOff,
}

/// Combination table, checked in order; the first full match wins.
pub const COMBOS: &[(&[InputField], ModeAction)] = &[
    (
        &[InputField::ModX, InputField::Start, InputField::L],
        ModeAction::SetMode(ModeKind::Melee),
    ),
    (
        &[InputField::ModX, InputField::Start, InputField::Left],
        ModeAction::SetMode(ModeKind::Rivals2),
    ),
    (
        &[InputField::ModY, InputField::Start, InputField::L],
        ModeAction::KeyboardOn,
    ),
    (
        &[InputField::ModY, InputField::Start, InputField::Left],
        ModeAction::KeyboardOff,
    ),
];

/// Watches the primary backend's inputs for mode combinations.
///
/// An action fires on the frame its combination becomes fully held and not
/// again until the combination changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeSelector {
    held: Option<ModeAction>,
}

impl ModeSelector {
    #[must_use]
    pub const fn new() -> Self {
        Self { held: None }
    }

    /// Check `inputs` and return an action to apply this frame, if any.
    pub fn select(&mut self, inputs: &InputState) -> Option<ModeAction> {
        let combo = COMBOS
            .iter()
            .find(|(fields, _)| inputs.all_held(fields))
            .map(|(_, action)| *action);
        let fired = combo.filter(|action| self.held != Some(*action));
        self.held = combo;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(fields: &[InputField]) -> InputState {
        let mut inputs = InputState::neutral();
        for field in fields {
            inputs.set(*field, true);
        }
        inputs
    }

    #[test]
    fn test_combo_fires_once_per_hold() {
        let mut selector = ModeSelector::new();
        let combo = held(&[InputField::ModX, InputField::Start, InputField::Left]);
        assert_eq!(
            selector.select(&combo),
            Some(ModeAction::SetMode(ModeKind::Rivals2))
        );
        assert_eq!(selector.select(&combo), None);
        assert_eq!(selector.select(&InputState::neutral()), None);
        assert_eq!(
            selector.select(&combo),
            Some(ModeAction::SetMode(ModeKind::Rivals2))
        );
    }

    #[test]
    fn test_partial_combo_does_nothing() {
        let mut selector = ModeSelector::new();
        assert_eq!(
            selector.select(&held(&[InputField::ModX, InputField::Start])),
            None
        );
    }

    #[test]
    fn test_keyboard_combos() {
        let mut selector = ModeSelector::new();
        assert_eq!(
            selector.select(&held(&[InputField::ModY, InputField::Start, InputField::L])),
            Some(ModeAction::KeyboardOn)
        );
        assert_eq!(
            selector.select(&held(&[
                InputField::ModY,
                InputField::Start,
                InputField::Left
            ])),
            Some(ModeAction::KeyboardOff)
        );
    }

    #[test]
    fn test_switching_combos_without_release() {
        let mut selector = ModeSelector::new();
        let melee = held(&[InputField::ModX, InputField::Start, InputField::L]);
        let both = held(&[
            InputField::ModX,
            InputField::Start,
            InputField::L,
            InputField::Left,
        ]);
        assert_eq!(
            selector.select(&melee),
            Some(ModeAction::SetMode(ModeKind::Melee))
        );
        // Melee combo still matches first
        assert_eq!(selector.select(&both), None);
    }
}
