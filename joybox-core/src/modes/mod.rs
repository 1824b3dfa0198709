//! Game modes: per-title remapping of a cleaned input snapshot.
//!
//! A game mode owns its SOCD cleaner, cleans the raw snapshot with it and then
//! builds a console-facing [`OutputState`]. Adding a title means adding a new
//! type here and a variant to [`AnyGameMode`]; backends and input sources are
//! unaffected.

mod keyboard;
mod melee;
mod rivals2;

pub use keyboard::{KeyMapping, KeyboardMode, DEFAULT_KEYBOARD_LAYOUT};
pub use melee::Melee20Button;
pub use rivals2::Rivals2;

use joybox_proto::{InputField, InputState, OutputState, ANALOG_NEUTRAL};

use crate::socd::{SocdCleaner, SocdType};

/// Opposing pairs cleaned by every mode in this crate.
pub const DIRECTION_PAIRS: [(InputField, InputField); 4] = [
    (InputField::Left, InputField::Right),
    (InputField::Down, InputField::Up),
    (InputField::CLeft, InputField::CRight),
    (InputField::CDown, InputField::CUp),
];

/// Per-title remapping with an owned SOCD policy.
pub trait GameMode {
    /// Which title this mode targets.
    fn kind(&self) -> ModeKind;

    /// The SOCD cleaner applied before [`GameMode::remap`].
    fn socd(&mut self) -> &mut SocdCleaner;

    /// Build outputs from an already cleaned snapshot.
    fn remap(&self, clean: &InputState) -> OutputState;

    /// Clean `inputs` and remap them.
    fn update_outputs(&mut self, inputs: &InputState) -> OutputState {
        let mut clean = *inputs;
        self.socd().clean(&mut clean);
        self.remap(&clean)
    }
}

/// Supported titles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeKind {
    Melee,
    Rivals2,
}

impl ModeKind {
    /// SOCD policy a title uses unless told otherwise.
    #[must_use]
    pub const fn default_socd(self) -> SocdType {
        match self {
            ModeKind::Melee => SocdType::SecondInputPriorityNoReactivation,
            ModeKind::Rivals2 => SocdType::SecondInputPriority,
        }
    }

    /// Build a fresh mode with the title's default SOCD policy.
    #[must_use]
    pub fn build(self) -> AnyGameMode {
        self.build_with(self.default_socd())
    }

    /// Build a fresh mode with an explicit SOCD policy.
    #[must_use]
    pub fn build_with(self, socd: SocdType) -> AnyGameMode {
        match self {
            ModeKind::Melee => AnyGameMode::Melee(Melee20Button::new(socd)),
            ModeKind::Rivals2 => AnyGameMode::Rivals2(Rivals2::new(socd)),
        }
    }
}

/// Closed set of game modes, dispatched without allocation.
#[derive(Clone, Debug)]
pub enum AnyGameMode {
    Melee(Melee20Button),
    Rivals2(Rivals2),
}

impl GameMode for AnyGameMode {
    fn kind(&self) -> ModeKind {
        match self {
            AnyGameMode::Melee(mode) => mode.kind(),
            AnyGameMode::Rivals2(mode) => mode.kind(),
        }
    }

    fn socd(&mut self) -> &mut SocdCleaner {
        match self {
            AnyGameMode::Melee(mode) => mode.socd(),
            AnyGameMode::Rivals2(mode) => mode.socd(),
        }
    }

    fn remap(&self, clean: &InputState) -> OutputState {
        match self {
            AnyGameMode::Melee(mode) => mode.remap(clean),
            AnyGameMode::Rivals2(mode) => mode.remap(clean),
        }
    }
}

impl From<Melee20Button> for AnyGameMode {
    fn from(mode: Melee20Button) -> Self {
        AnyGameMode::Melee(mode)
    }
}

impl From<Rivals2> for AnyGameMode {
    fn from(mode: Rivals2) -> Self {
        AnyGameMode::Rivals2(mode)
    }
}

/// Stick modifier layer currently held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Modifier {
    None,
    X,
    Y,
}

impl Modifier {
    /// Holding both modifiers cancels them; the pair is used for the d-pad
    /// layer instead.
    pub(crate) fn from_inputs(inputs: &InputState) -> Self {
        match (inputs.mod_x, inputs.mod_y) {
            (true, false) => Modifier::X,
            (false, true) => Modifier::Y,
            _ => Modifier::None,
        }
    }
}

/// Direction of one cleaned pair: -1, 0 or 1.
pub(crate) fn direction(negative: bool, positive: bool) -> i8 {
    i8::from(positive) - i8::from(negative)
}

/// Signed offset from centre to a wire axis value.
pub(crate) fn axis(offset: i16) -> u8 {
    (i16::from(ANALOG_NEUTRAL) + offset).clamp(0, 255) as u8
}

/// Stick magnitudes for one modifier layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StickProfile {
    pub horizontal: u8,
    pub vertical: u8,
    pub diagonal: (u8, u8),
}

impl StickProfile {
    /// Stick position for a direction, as wire axis values.
    pub(crate) fn apply(&self, x: i8, y: i8) -> (u8, u8) {
        let (mx, my) = match (x, y) {
            (0, 0) => (0, 0),
            (_, 0) => (self.horizontal, 0),
            (0, _) => (0, self.vertical),
            _ => self.diagonal,
        };
        (
            axis(i16::from(x) * i16::from(mx)),
            axis(i16::from(y) * i16::from(my)),
        )
    }
}

/// Outputs every mode passes straight through.
pub(crate) fn common_buttons(clean: &InputState) -> OutputState {
    OutputState {
        a: clean.a,
        b: clean.b,
        x: clean.x,
        y: clean.y,
        start: clean.start,
        select: clean.select,
        home: clean.home,
        ..OutputState::neutral()
    }
}

/// With both modifiers held the C buttons drive the d-pad.
///
/// Returns `true` if the d-pad layer is active.
pub(crate) fn apply_dpad_layer(clean: &InputState, out: &mut OutputState) -> bool {
    if !(clean.mod_x && clean.mod_y) {
        return false;
    }
    out.dpad_left = clean.c_left;
    out.dpad_right = clean.c_right;
    out.dpad_down = clean.c_down;
    out.dpad_up = clean.c_up;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_profile_directions() {
        let profile = StickProfile {
            horizontal: 80,
            vertical: 70,
            diagonal: (56, 50),
        };
        assert_eq!(profile.apply(0, 0), (128, 128));
        assert_eq!(profile.apply(1, 0), (208, 128));
        assert_eq!(profile.apply(0, -1), (128, 58));
        assert_eq!(profile.apply(-1, 1), (72, 178));
    }

    #[test]
    fn test_axis_clamps() {
        assert_eq!(axis(200), 255);
        assert_eq!(axis(-200), 0);
    }

    #[test]
    fn test_both_modifiers_cancel() {
        let inputs = InputState {
            mod_x: true,
            mod_y: true,
            ..InputState::neutral()
        };
        assert_eq!(Modifier::from_inputs(&inputs), Modifier::None);
    }

    #[test]
    fn test_build_uses_default_socd() {
        let mut melee = ModeKind::Melee.build();
        assert_eq!(melee.kind(), ModeKind::Melee);
        assert!(melee
            .socd()
            .pairs()
            .all(|pair| pair.policy == SocdType::SecondInputPriorityNoReactivation));

        let mut rivals = ModeKind::Rivals2.build();
        assert!(rivals
            .socd()
            .pairs()
            .all(|pair| pair.policy == SocdType::SecondInputPriority));
    }
}
