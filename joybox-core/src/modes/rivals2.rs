//! Rivals of Aether II.
//!
//! Uses the full stick range (100 units from centre). Holding Mod X turns the
//! C buttons into half-strength tilts.

use joybox_proto::{InputState, OutputState};

use super::{
    apply_dpad_layer, common_buttons, direction, GameMode, ModeKind, Modifier, StickProfile,
    DIRECTION_PAIRS,
};
use crate::socd::{SocdCleaner, SocdType};

pub const RIVALS_FULL: u8 = 100;

const PLAIN: StickProfile = StickProfile {
    horizontal: RIVALS_FULL,
    vertical: RIVALS_FULL,
    diagonal: (71, 71),
};

/// Walk speed and shallow wavedash angle.
const MOD_X: StickProfile = StickProfile {
    horizontal: 66,
    vertical: 44,
    diagonal: (71, 35),
};

/// Steep angles and vertical tilts.
const MOD_Y: StickProfile = StickProfile {
    horizontal: 44,
    vertical: 67,
    diagonal: (35, 71),
};

const C_STICK: StickProfile = StickProfile {
    horizontal: RIVALS_FULL,
    vertical: RIVALS_FULL,
    diagonal: (71, 71),
};

const C_TILT: StickProfile = StickProfile {
    horizontal: 50,
    vertical: 50,
    diagonal: (35, 35),
};

#[derive(Clone, Debug)]
pub struct Rivals2 {
    socd: SocdCleaner,
}

impl Rivals2 {
    #[must_use]
    pub fn new(socd: SocdType) -> Self {
        Self {
            socd: SocdCleaner::uniform(&DIRECTION_PAIRS, socd),
        }
    }
}

impl GameMode for Rivals2 {
    fn kind(&self) -> ModeKind {
        ModeKind::Rivals2
    }

    fn socd(&mut self) -> &mut SocdCleaner {
        &mut self.socd
    }

    fn remap(&self, clean: &InputState) -> OutputState {
        let mut out = common_buttons(clean);
        out.button_r = clean.z;
        out.button_l = clean.lightshield;
        out.select |= clean.midshield;

        let modifier = Modifier::from_inputs(clean);
        let profile = match modifier {
            Modifier::None => PLAIN,
            Modifier::X => MOD_X,
            Modifier::Y => MOD_Y,
        };
        let (lx, ly) = profile.apply(
            direction(clean.left, clean.right),
            direction(clean.down, clean.up),
        );
        out.left_stick_x = lx;
        out.left_stick_y = ly;

        if !apply_dpad_layer(clean, &mut out) {
            let c_profile = if modifier == Modifier::X {
                C_TILT
            } else {
                C_STICK
            };
            let (cx, cy) = c_profile.apply(
                direction(clean.c_left, clean.c_right),
                direction(clean.c_down, clean.c_up),
            );
            out.right_stick_x = cx;
            out.right_stick_y = cy;
        }

        out.trigger_l_digital = clean.l;
        out.trigger_r_digital = clean.r;
        out.trigger_l_analog = if clean.l { u8::MAX } else { 0 };
        out.trigger_r_analog = if clean.r { u8::MAX } else { 0 };

        out
    }
}
